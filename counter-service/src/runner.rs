// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The commands of the `counter` binary, run against a TON node.

use std::{path::Path, sync::Arc};

use anyhow::{Context as _, Result};
use counter_base::{boc, crypto::KeyPair, data_types::CounterValue};
use counter_client::{
    config::{ConfigError, CounterConfig},
    confirmation::{Outcome, Submitter},
    contract::Counter,
    getter::Getter,
    sender::Sender as _,
    wallet::{WalletSender, WalletV4},
};
use counter_rpc::client::TonQueries;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::options::Command;

/// Runs commands on one counter, sending from the wallet of `key_pair` if one is given.
pub struct Runner<Q> {
    config: CounterConfig,
    rpc: Arc<Q>,
    key_pair: Option<KeyPair>,
    cancellation: CancellationToken,
}

impl<Q> Runner<Q>
where
    Q: TonQueries + Send + Sync,
{
    pub fn new(
        config: CounterConfig,
        rpc: Arc<Q>,
        key_pair: Option<KeyPair>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            config,
            rpc,
            key_pair,
            cancellation,
        }
    }

    /// Runs `command`. Without a command, the counter is read and then incremented; a
    /// failed read is logged and the increment still runs.
    pub async fn run(&self, command: Option<Command>) -> Result<()> {
        match command {
            Some(Command::Get) => {
                self.get().await?;
            }
            Some(Command::Increment) => {
                self.increment().await?;
            }
            Some(Command::Deploy {
                code,
                initial_value,
            }) => self.deploy(&code, initial_value).await?,
            None => {
                if let Err(error) = self.get().await {
                    error!("failed to read the counter: {error:#}");
                }
                self.increment().await?;
            }
        }
        Ok(())
    }

    fn wallet_sender(&self) -> Result<WalletSender<Q>> {
        let key_pair = self
            .key_pair
            .clone()
            .ok_or(ConfigError::MissingMnemonic)?;
        let wallet = WalletV4::new(key_pair, self.config.workchain)?;
        info!("sending from wallet {}", wallet.address());
        Ok(WalletSender::new(wallet, self.rpc.clone()))
    }

    pub async fn get(&self) -> Result<CounterValue> {
        let value = Getter::new(&self.config, self.rpc.clone()).get().await?;
        info!(%value, "counter value");
        Ok(value)
    }

    pub async fn increment(&self) -> Result<Outcome> {
        let submitter = Submitter::new(&self.config, self.rpc.clone(), self.wallet_sender()?);
        let outcome = submitter.run(&self.cancellation).await?;
        match &outcome {
            Outcome::Confirmed {
                attempts,
                before,
                value,
            } => info!(attempts, %before, %value, "counter incremented"),
            Outcome::Aborted { reason } => warn!("increment aborted: {reason}"),
        }
        Ok(outcome)
    }

    /// Deploys a counter whose code is the first root of the bag of cells at `code_path`.
    pub async fn deploy(&self, code_path: &Path, initial_value: u64) -> Result<()> {
        let bytes = std::fs::read(code_path)
            .with_context(|| format!("reading contract code from {}", code_path.display()))?;
        let code = boc::deserialize_first(&bytes)
            .with_context(|| format!("decoding contract code from {}", code_path.display()))?;
        let counter = Counter::for_deploy(code, initial_value)?;
        let sender = self.wallet_sender()?;
        if !self.rpc.is_contract_deployed(&sender.address()).await? {
            warn!("wallet {} is not deployed, nothing sent", sender.address());
            return Ok(());
        }
        counter.send_deploy(&sender).await?;
        info!(initial_value, "counter {} is being deployed", counter.address());
        Ok(())
    }
}
