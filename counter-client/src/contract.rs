// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A counter contract instance, identified by its address.

use counter_base::data_types::{Amount, CounterValue};
use counter_rpc::client::TonQueries;
use serde_json::Value;
use tonlib_core::{
    cell::{ArcCell, CellBuilder, TonCellError},
    tlb_types::block::state_init::StateInit,
    TonAddress,
};
use tracing::{debug, info, instrument};

use crate::{
    config::{DEFAULT_WORKCHAIN, DEPLOY_VALUE},
    getter::decode_unsigned,
    messages::{CounterMessage, IncrementRequest},
    sender::{state_init_address, InternalMessage, Sender},
    Error,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Counter {
    address: TonAddress,
    init: Option<StateInit>,
}

impl Counter {
    /// The already deployed counter at `address`.
    pub fn new(address: TonAddress) -> Self {
        Self {
            address,
            init: None,
        }
    }

    /// A new counter running `code`, starting at `initial_value`.
    pub fn for_deploy(code: ArcCell, initial_value: u64) -> Result<Self, TonCellError> {
        let mut data = CellBuilder::new();
        data.store_u64(64, initial_value)?;
        let init = StateInit::new(code, data.build()?.to_arc());
        let address = state_init_address(&init, DEFAULT_WORKCHAIN)?;
        Ok(Self {
            address,
            init: Some(init),
        })
    }

    pub fn address(&self) -> &TonAddress {
        &self.address
    }

    pub fn state_init(&self) -> Option<&StateInit> {
        self.init.as_ref()
    }

    /// Calls the get-method `method`, returning the counter.
    #[instrument(level = "debug", skip(self, rpc), fields(address = %self.address))]
    pub async fn get_counter<Q>(&self, rpc: &Q, method: &str) -> Result<CounterValue, Error>
    where
        Q: TonQueries + Send + Sync,
    {
        let result = rpc.run_get_method(&self.address, method).await?;
        let value = CounterValue(decode_unsigned(method, &result)?);
        debug!(%value, "counter read");
        Ok(value)
    }

    /// Sends the message of `request` through `sender`.
    #[instrument(level = "debug", skip_all, fields(address = %self.address, kind = ?request.kind()))]
    pub async fn send_increment(
        &self,
        sender: &dyn Sender,
        request: &IncrementRequest,
    ) -> Result<(), Error> {
        let body = request.message.to_cell()?;
        sender
            .send(InternalMessage {
                to: self.address.clone(),
                value: request.value,
                bounce: request.bounce,
                init: None,
                body: Some(body.to_arc()),
            })
            .await
    }

    /// Sends an untyped message, as accepted by the Tact bindings, with `value` attached.
    /// Nothing is sent unless the message is recognized.
    pub async fn send_json(
        &self,
        sender: &dyn Sender,
        message: &Value,
        value: Amount,
    ) -> Result<(), Error> {
        let message = CounterMessage::try_from(message)?;
        self.send_increment(sender, &IncrementRequest::new(message, value))
            .await
    }

    /// Deploys the counter, attaching its state init and some value for storage rent.
    #[instrument(level = "debug", skip_all, fields(address = %self.address))]
    pub async fn send_deploy(&self, sender: &dyn Sender) -> Result<(), Error> {
        let init = self
            .init
            .clone()
            .ok_or_else(|| Error::NotDeployable(self.address.clone()))?;
        sender
            .send(InternalMessage {
                to: self.address.clone(),
                value: DEPLOY_VALUE,
                bounce: false,
                init: Some(init),
                body: None,
            })
            .await?;
        info!("deployment of {} sent", self.address);
        Ok(())
    }
}
