// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use counter_base::boc::BocError;
use counter_rpc::common::RpcError;
use num_bigint::BigInt;
use thiserror::Error;
use tonlib_core::{cell::TonCellError, message::TonMessageError, TonAddress};

use crate::config::ConfigError;

/// A get-method result that does not carry the expected value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("get-method {method} failed with exit code {exit_code}")]
    ExitCode { method: String, exit_code: i32 },
    #[error("get-method {method} returned an empty stack")]
    EmptyStack { method: String },
    #[error("get-method {method} returned a {kind} entry instead of an integer")]
    NotAnInteger { method: String, kind: String },
    #[error("get-method {method} returned a negative value: {value}")]
    Negative { method: String, value: BigInt },
    #[error("get-method {method} returned an out-of-range value: {value}")]
    OutOfRange { method: String, value: BigInt },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("wallet {0} is not deployed")]
    UndeployedWallet(TonAddress),
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    #[error("counter {0} has no state init to deploy")]
    NotDeployable(TonAddress),
    #[error("counter did not change after {attempts} polls")]
    ConfirmationTimeout { attempts: u32 },
    #[error("confirmation cancelled after {attempts} polls")]
    Cancelled { attempts: u32 },
    #[error("cell error: {0}")]
    Cell(#[from] TonCellError),
    #[error("external message error: {0}")]
    Message(#[from] TonMessageError),
    #[error(transparent)]
    Boc(#[from] BocError),
}
