// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Internal messages and the accounts able to send them.

use async_trait::async_trait;
use counter_base::data_types::Amount;
use num_bigint::BigUint;
use tonlib_core::{
    cell::{ArcCell, Cell, TonCellError, EMPTY_ARC_CELL},
    tlb_types::{
        block::{
            coins::{CurrencyCollection, Grams},
            message::{CommonMsgInfo, IntMsgInfo, Message},
            msg_address::MsgAddress,
            state_init::StateInit,
        },
        primitives::either::{EitherRef, EitherRefLayout},
        tlb::TLB as _,
    },
    TonAddress,
};

use crate::Error;

/// A message from a wallet to a contract.
#[derive(Clone, Debug, PartialEq)]
pub struct InternalMessage {
    pub to: TonAddress,
    pub value: Amount,
    pub bounce: bool,
    pub init: Option<StateInit>,
    pub body: Option<ArcCell>,
}

impl InternalMessage {
    /// Encodes the message with an `int_msg_info` header. The source address, fees and
    /// logical time are left for the sending wallet and the validators to fill in.
    ///
    /// The state init and the body are always stored by reference.
    pub fn to_cell(&self) -> Result<Cell, TonCellError> {
        let info = CommonMsgInfo::Int(IntMsgInfo {
            ihr_disabled: true,
            bounce: self.bounce,
            bounced: false,
            src: MsgAddress::NONE,
            dest: self.to.to_msg_address(),
            value: CurrencyCollection::new(BigUint::from(self.value.nanos())),
            ihr_fee: Grams::new(BigUint::from(0u8)),
            fwd_fee: Grams::new(BigUint::from(0u8)),
            created_lt: 0,
            created_at: 0,
        });
        let body = match &self.body {
            Some(body) => EitherRef {
                value: body.clone(),
                layout: EitherRefLayout::ToRef,
            },
            // An empty inline body.
            None => EitherRef {
                value: EMPTY_ARC_CELL.clone(),
                layout: EitherRefLayout::ToCell,
            },
        };
        let message = Message {
            info,
            init: self.init.clone().map(|init| EitherRef {
                value: init,
                layout: EitherRefLayout::ToRef,
            }),
            body,
        };
        message.to_cell()
    }
}

/// An account that can sign and send internal messages.
#[async_trait]
pub trait Sender: Send + Sync {
    /// The address messages are sent from.
    fn address(&self) -> TonAddress;

    /// Signs and broadcasts `message`.
    async fn send(&self, message: InternalMessage) -> Result<(), Error>;
}

/// The address of the contract initialized with `init`, in `workchain`.
pub fn state_init_address(init: &StateInit, workchain: i32) -> Result<TonAddress, TonCellError> {
    Ok(TonAddress::new(workchain, init.cell_hash()?))
}
