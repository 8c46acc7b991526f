// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Mutex;

use async_trait::async_trait;
use counter_base::crypto::key_pair_from_seed;
use tonlib_core::TonAddress;

use crate::{
    sender::{InternalMessage, Sender},
    wallet::WalletV4,
    Error,
};

/// A sender that records messages instead of signing them.
pub struct RecordingSender {
    address: TonAddress,
    sent: Mutex<Vec<InternalMessage>>,
}

impl RecordingSender {
    pub fn new(address: TonAddress) -> Self {
        Self {
            address,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// The messages sent so far.
    pub fn sent(&self) -> Vec<InternalMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sender for RecordingSender {
    fn address(&self) -> TonAddress {
        self.address.clone()
    }

    async fn send(&self, message: InternalMessage) -> Result<(), Error> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// A wallet with a fixed key, in workchain 0.
pub fn test_wallet(seed: u8) -> WalletV4 {
    WalletV4::new(key_pair_from_seed(&[seed; 32]), 0).unwrap()
}
