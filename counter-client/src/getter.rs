// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use counter_base::data_types::CounterValue;
use counter_rpc::{
    client::TonQueries,
    common::{GetMethodResult, StackEntry},
};
use num_bigint::BigUint;

use crate::{config::CounterConfig, contract::Counter, error::DecodeError, Error};

/// Reads the first stack entry of a get-method result as a non-negative integer.
///
/// TVM exit codes 0 and 1 both denote success.
pub fn decode_unsigned(method: &str, result: &GetMethodResult) -> Result<BigUint, DecodeError> {
    if !matches!(result.exit_code, 0 | 1) {
        return Err(DecodeError::ExitCode {
            method: method.to_string(),
            exit_code: result.exit_code,
        });
    }
    match result.stack.first() {
        None => Err(DecodeError::EmptyStack {
            method: method.to_string(),
        }),
        Some(StackEntry::Other { kind, .. }) => Err(DecodeError::NotAnInteger {
            method: method.to_string(),
            kind: kind.clone(),
        }),
        Some(StackEntry::Num(value)) => {
            value.to_biguint().ok_or_else(|| DecodeError::Negative {
                method: method.to_string(),
                value: value.clone(),
            })
        }
    }
}

/// Reads the current value of one counter.
pub struct Getter<Q> {
    counter: Counter,
    method: String,
    rpc: Arc<Q>,
}

impl<Q> Getter<Q>
where
    Q: TonQueries + Send + Sync,
{
    pub fn new(config: &CounterConfig, rpc: Arc<Q>) -> Self {
        Self {
            counter: Counter::new(config.address.clone()),
            method: config.getter.clone(),
            rpc,
        }
    }

    pub fn counter(&self) -> &Counter {
        &self.counter
    }

    /// Returns the current counter value. Failures are reported as they are.
    pub async fn get(&self) -> Result<CounterValue, Error> {
        self.counter
            .get_counter(self.rpc.as_ref(), &self.method)
            .await
    }
}
