// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named configurations of the two counter contract revisions.

use std::{fmt, str::FromStr, time::Duration};

use counter_base::data_types::Amount;
use thiserror::Error;
use tonlib_core::{TonAddress, TonHash};

use crate::messages::{CounterMessage, IncrementRequest, MessageKind};

/// The account id of the counter deployed from the FunC sources, in the basechain.
pub const FUNC_COUNTER_HASH: [u8; 32] = [
    0x63, 0x65, 0xff, 0x94, 0x65, 0xac, 0xfa, 0x61, 0x04, 0xe4, 0x1c, 0x9d, 0xc4, 0x07, 0x12, 0x69,
    0x82, 0x1e, 0x86, 0x44, 0xec, 0x68, 0x79, 0xc4, 0x66, 0xde, 0xf5, 0x4d, 0x72, 0x77, 0x30, 0x1c,
];

/// The counter deployed from the FunC sources,
/// `EQBjZf-UZaz6YQTkHJ3EBxJpgh6GROxoecRm3vVNcncwHNy9`.
pub fn func_counter_address() -> TonAddress {
    TonAddress::new(0, TonHash::from(FUNC_COUNTER_HASH))
}

/// The workchain of the wallet and of deployed counters.
pub const DEFAULT_WORKCHAIN: i32 = 0;
/// The name of the get-method returning the counter.
pub const COUNTER_GETTER: &str = "counter";
/// The value attached to a deployment, for storage rent.
pub const DEPLOY_VALUE: Amount = Amount::from_millis(10);
/// The delay between two polls of the getter.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
/// The number of unchanged polls tolerated before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 150;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown contract revision {0:?}, expected `func` or `tact`")]
    UnknownRevision(String),
    #[error("the {0} revision has no default contract address, one must be given")]
    MissingAddress(Revision),
    #[error("a wallet mnemonic is required to send messages")]
    MissingMnemonic,
    #[error("the {revision} revision does not accept {kind:?} messages")]
    UnsupportedMessage {
        revision: Revision,
        kind: MessageKind,
    },
}

/// One of the two deployed revisions of the counter contract. They differ in address,
/// message format and attached value, and are never mixed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Revision {
    /// The FunC contract, incremented by `op = 1` messages.
    #[default]
    FunC,
    /// The Tact contract, accepting `Add` messages and `"increment"` text comments.
    Tact,
}

impl Revision {
    /// The address of the contract of this revision, if it is known.
    pub fn default_address(self) -> Option<TonAddress> {
        match self {
            Revision::FunC => Some(func_counter_address()),
            Revision::Tact => None,
        }
    }

    /// The value attached to increment messages, for gas.
    pub fn increment_value(self) -> Amount {
        match self {
            Revision::FunC => Amount::from_millis(2),
            Revision::Tact => Amount::from_millis(50),
        }
    }

    /// The message sent when none is configured.
    pub fn default_message(self) -> CounterMessage {
        match self {
            Revision::FunC => CounterMessage::Increment { query_id: 0 },
            Revision::Tact => CounterMessage::Add { amount: 1 },
        }
    }

    /// Whether the contract of this revision understands messages of this kind.
    pub fn supports(self, kind: MessageKind) -> bool {
        matches!(
            (self, kind),
            (Revision::FunC, MessageKind::Increment)
                | (Revision::Tact, MessageKind::Add)
                | (Revision::Tact, MessageKind::IncrementText)
        )
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::FunC => write!(f, "func"),
            Revision::Tact => write!(f, "tact"),
        }
    }
}

impl FromStr for Revision {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "func" => Ok(Revision::FunC),
            "tact" => Ok(Revision::Tact),
            _ => Err(ConfigError::UnknownRevision(s.to_string())),
        }
    }
}

/// How long to wait for a submitted increment to become visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// The delay between two polls.
    pub poll_interval: Duration,
    /// The number of unchanged polls after which confirmation fails. `None` polls forever.
    pub max_attempts: Option<u32>,
    /// The time after submission after which confirmation fails.
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            deadline: None,
        }
    }
}

impl RetryPolicy {
    /// Polls forever, until cancelled.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            ..Self::default()
        }
    }

    /// Whether `attempts` unchanged polls exhaust the attempt budget.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Everything needed to talk to one counter contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterConfig {
    /// The contract revision.
    pub revision: Revision,
    /// The address of the counter contract.
    pub address: TonAddress,
    /// The get-method returning the counter.
    pub getter: String,
    /// The workchain of the sending wallet.
    pub workchain: i32,
    /// The increment to submit.
    pub request: IncrementRequest,
    /// How to wait for confirmation.
    pub retry: RetryPolicy,
}

impl CounterConfig {
    /// The configuration of `revision`, targeting `address` or the revision's default
    /// contract, with the revision's default message.
    pub fn new(revision: Revision, address: Option<TonAddress>) -> Result<Self, ConfigError> {
        let address = address
            .or_else(|| revision.default_address())
            .ok_or(ConfigError::MissingAddress(revision))?;
        Ok(Self {
            revision,
            address,
            getter: COUNTER_GETTER.to_string(),
            workchain: DEFAULT_WORKCHAIN,
            request: IncrementRequest::new(revision.default_message(), revision.increment_value()),
            retry: RetryPolicy::default(),
        })
    }

    /// Replaces the message to submit, which must be understood by the revision.
    pub fn with_message(mut self, message: CounterMessage) -> Result<Self, ConfigError> {
        let kind = message.kind();
        if !self.revision.supports(kind) {
            return Err(ConfigError::UnsupportedMessage {
                revision: self.revision,
                kind,
            });
        }
        self.request.message = message;
        Ok(self)
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
