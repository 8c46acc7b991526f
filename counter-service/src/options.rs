// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use counter_base::crypto::{key_pair_from_mnemonic, KeyPair};
use counter_client::{
    config::{ConfigError, CounterConfig, RetryPolicy, Revision},
    messages::CounterMessage,
};
use serde_json::{json, Value};
use tonlib_core::TonAddress;

use crate::util;

/// Options for running the counter client.
#[derive(clap::Parser, Debug, Clone)]
#[command(
    name = "counter",
    about = "Reads and increments a counter contract on TON",
    version
)]
pub struct CounterOptions {
    /// The toncenter JSON-RPC endpoint, e.g. `https://testnet.toncenter.com/api/v2/jsonRPC`.
    #[arg(long, env = "TON_CENTER_ENDPOINT")]
    pub endpoint: String,

    /// The toncenter API key.
    #[arg(long, env = "TON_CENTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// The 24 words of the sending wallet.
    #[arg(long, env = "WALLET_MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// The contract revision: `func` or `tact`.
    #[arg(long, env = "COUNTER_REVISION", default_value_t = Revision::FunC)]
    pub revision: Revision,

    /// The counter address, instead of the revision's default one.
    #[arg(long, env = "COUNTER_ADDRESS")]
    pub address: Option<TonAddress>,

    /// Sends `Add { amount }` to a Tact counter.
    #[arg(long, env = "COUNTER_AMOUNT")]
    pub amount: Option<u32>,

    /// The message sent to a Tact counter, as JSON or as the `increment` text comment.
    #[arg(long, env = "COUNTER_MESSAGE", conflicts_with = "amount")]
    pub message: Option<String>,

    /// Delay between two reads of the counter (ms)
    #[arg(long = "poll-interval-ms",
          default_value = "2000",
          value_parser = util::parse_millis,
          env = "COUNTER_POLL_INTERVAL")]
    pub poll_interval: Duration,

    /// The number of unchanged reads after which an increment is given up.
    #[arg(long, default_value = "150", env = "COUNTER_MAX_ATTEMPTS")]
    pub max_attempts: u32,

    /// Polls until the increment is observed or the process is interrupted.
    #[arg(long)]
    pub unbounded: bool,

    /// Gives up waiting this long after the increment was sent (ms)
    #[arg(long = "deadline-ms", value_parser = util::parse_millis, env = "COUNTER_DEADLINE")]
    pub deadline: Option<Duration>,

    /// The number of Tokio worker threads to use.
    #[arg(long, env = "COUNTER_TOKIO_THREADS")]
    pub tokio_threads: Option<usize>,

    /// Reads then increments the counter if omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reads the counter.
    Get,

    /// Sends one increment and waits until it is observed.
    Increment,

    /// Deploys a new counter from its compiled code.
    Deploy {
        /// The bag of cells holding the contract code.
        #[arg(long)]
        code: PathBuf,

        /// The initial value of the counter.
        #[arg(long, default_value = "0")]
        initial_value: u64,
    },
}

impl CounterOptions {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            poll_interval: self.poll_interval,
            max_attempts: (!self.unbounded).then_some(self.max_attempts),
            deadline: self.deadline,
        }
    }

    /// The message given on the command line, if any.
    pub fn counter_message(&self) -> Result<Option<CounterMessage>> {
        if let Some(message) = &self.message {
            let value = serde_json::from_str(message)
                .unwrap_or_else(|_| Value::String(message.trim().to_string()));
            return Ok(Some(CounterMessage::try_from(value)?));
        }
        self.amount
            .map(|amount| CounterMessage::try_from(json!({ "$$type": "Add", "amount": amount })))
            .transpose()
            .map_err(Into::into)
    }

    pub fn counter_config(&self) -> Result<CounterConfig> {
        let mut config = CounterConfig::new(self.revision, self.address.clone())?;
        if let Some(message) = self.counter_message()? {
            config = config.with_message(message)?;
        }
        Ok(config.with_retry(self.retry_policy()))
    }

    pub fn key_pair(&self) -> Result<KeyPair> {
        let mnemonic = self.mnemonic.as_ref().ok_or(ConfigError::MissingMnemonic)?;
        Ok(key_pair_from_mnemonic(mnemonic)?)
    }
}
