// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The standard v4r2 wallet contract, used to sign and send messages.

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use counter_base::{boc, crypto::KeyPair};
use counter_rpc::client::TonQueries;
use num_traits::ToPrimitive as _;
use tonlib_core::{
    cell::{ArcCell, Cell},
    message::TonMessageError,
    wallet::{
        ton_wallet::TonWallet, version_helper::VersionHelper, versioned::DEFAULT_WALLET_ID,
        wallet_version::WalletVersion,
    },
    TonAddress,
};
use tracing::{info, instrument};

use crate::{
    error::DecodeError,
    getter::decode_unsigned,
    sender::{InternalMessage, Sender},
    Error,
};

/// How long a signed transfer stays valid.
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(60);

const SEQNO_GETTER: &str = "seqno";

/// A v4r2 wallet controlled by a key-pair.
#[derive(Debug)]
pub struct WalletV4 {
    inner: TonWallet,
}

impl WalletV4 {
    /// The wallet of `key_pair` in `workchain`. Its id is the default one plus the
    /// workchain.
    pub fn new(key_pair: KeyPair, workchain: i32) -> Result<Self, Error> {
        let wallet_id = DEFAULT_WALLET_ID.wrapping_add(workchain);
        let inner = TonWallet::new_with_params(WalletVersion::V4R2, key_pair, workchain, wallet_id)?;
        Ok(Self { inner })
    }

    pub fn address(&self) -> &TonAddress {
        &self.inner.address
    }

    pub fn public_key(&self) -> &[u8] {
        &self.inner.key_pair.public_key
    }

    pub fn wallet_id(&self) -> i32 {
        self.inner.wallet_id
    }

    /// The code shared by all v4r2 wallets.
    pub fn code() -> Result<&'static ArcCell, Error> {
        Ok(VersionHelper::get_code(WalletVersion::V4R2)?)
    }

    /// Builds the signed external message asking the wallet to forward `message`, with
    /// send mode 3: fees paid separately, errors ignored.
    pub fn create_transfer(
        &self,
        seqno: u32,
        valid_until: u32,
        message: &InternalMessage,
    ) -> Result<Cell, TonMessageError> {
        let message = message.to_cell()?.to_arc();
        self.inner
            .create_external_msg(valid_until, seqno, false, [message])
    }
}

/// A [`WalletV4`] sending through a TON node.
pub struct WalletSender<Q> {
    wallet: WalletV4,
    rpc: Arc<Q>,
}

impl<Q> WalletSender<Q>
where
    Q: TonQueries + Send + Sync,
{
    pub fn new(wallet: WalletV4, rpc: Arc<Q>) -> Self {
        Self { wallet, rpc }
    }

    pub fn wallet(&self) -> &WalletV4 {
        &self.wallet
    }

    /// Reads the sequence number expected by the wallet for its next transfer.
    pub async fn seqno(&self) -> Result<u32, Error> {
        let result = self
            .rpc
            .run_get_method(self.wallet.address(), SEQNO_GETTER)
            .await?;
        let seqno = decode_unsigned(SEQNO_GETTER, &result)?;
        seqno.to_u32().ok_or_else(|| {
            DecodeError::OutOfRange {
                method: SEQNO_GETTER.to_string(),
                value: seqno.into(),
            }
            .into()
        })
    }
}

#[async_trait]
impl<Q> Sender for WalletSender<Q>
where
    Q: TonQueries + Send + Sync,
{
    fn address(&self) -> TonAddress {
        self.wallet.address().clone()
    }

    #[instrument(level = "debug", skip_all, fields(to = %message.to, value = %message.value))]
    async fn send(&self, message: InternalMessage) -> Result<(), Error> {
        let seqno = self.seqno().await?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let valid_until = u32::try_from((now + TRANSFER_TIMEOUT).as_secs()).unwrap_or(u32::MAX);
        let external = self.wallet.create_transfer(seqno, valid_until, &message)?;
        self.rpc.send_boc(&boc::serialize(&external)?).await?;
        info!(seqno, "transfer sent from {}", self.wallet.address());
        Ok(())
    }
}
