// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use num_bigint::BigInt;
use num_traits::Num as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TonQueryError {
    /// The response id should match the request id
    #[error("response id {found} does not match request id {expected}")]
    IdIsNotMatching { expected: u64, found: String },

    /// Wrong jsonrpc version
    #[error("wrong jsonrpc version: {0}")]
    WrongJsonRpcVersion(String),

    /// A successful response without a result
    #[error("response to {0} carries no result")]
    MissingResult(String),
}

/// Failures to reach the endpoint or to get a usable answer from it.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    TonQueryError(#[from] TonQueryError),

    /// The endpoint answered with an error object or `ok: false`
    #[error("endpoint error {code:?} in {method}: {message}")]
    Endpoint {
        method: String,
        code: Option<i64>,
        message: String,
    },

    /// The endpoint answered with an HTTP error status and no JSON-RPC body
    #[error("HTTP status {status} from endpoint: {body}")]
    HttpStatus { status: u16, body: String },

    /// `serde_json` error
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// Reqwest error
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
}

/// The state of an account, as reported by `getAddressState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountState {
    Active,
    Uninitialized,
    Frozen,
    #[serde(other)]
    Unknown,
}

/// One entry of a TVM stack, as returned by `runGetMethod`.
#[derive(Clone, Debug, PartialEq)]
pub enum StackEntry {
    /// An integer, sent over the wire as `["num", "0x.."]`.
    Num(BigInt),
    /// Any other entry, kept undecoded.
    Other { kind: String, value: Value },
}

impl StackEntry {
    /// The integer carried by this entry, if any.
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            StackEntry::Num(value) => Some(value),
            StackEntry::Other { .. } => None,
        }
    }
}

impl<'de> Deserialize<'de> for StackEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (kind, value) = <(String, Value)>::deserialize(deserializer)?;
        if kind == "num" {
            if let Some(number) = value.as_str().and_then(parse_hex_int) {
                return Ok(StackEntry::Num(number));
            }
        }
        Ok(StackEntry::Other { kind, value })
    }
}

/// Parses toncenter integers: `0x` hexadecimal, possibly negated.
pub fn parse_hex_int(input: &str) -> Option<BigInt> {
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let digits = digits.strip_prefix("0x")?;
    let value = BigInt::from_str_radix(digits, 16).ok()?;
    Some(if negative { -value } else { value })
}

/// The result of running a get-method of a contract.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GetMethodResult {
    #[serde(default)]
    pub gas_used: u64,
    pub exit_code: i32,
    #[serde(default)]
    pub stack: Vec<StackEntry>,
}

/// The envelope of a toncenter JSON-RPC response.
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl JsonRpcResponse {
    /// Whether `body` is a JSON object carrying one of the envelope fields `ok`, `error`
    /// or `result`.
    pub(crate) fn is_envelope(body: &[u8]) -> bool {
        serde_json::from_slice::<serde_json::Map<String, Value>>(body).is_ok_and(|object| {
            ["ok", "error", "result"]
                .iter()
                .any(|field| object.contains_key(*field))
        })
    }

    /// Extracts the result, checking the envelope against the request.
    pub(crate) fn into_result(self, method: &str, expected_id: u64) -> Result<Value, RpcError> {
        if self.ok == Some(false) || self.error.is_some() {
            let (code, message) = match self.error {
                Some(Value::Object(object)) => (
                    object.get("code").and_then(Value::as_i64).or(self.code),
                    object
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| Value::Object(object.clone()).to_string()),
                ),
                Some(Value::String(message)) => (self.code, message),
                Some(other) => (self.code, other.to_string()),
                None => (self.code, "request failed".to_string()),
            };
            return Err(RpcError::Endpoint {
                method: method.to_string(),
                code,
                message,
            });
        }
        if let Some(version) = self.jsonrpc {
            if version != "2.0" {
                return Err(TonQueryError::WrongJsonRpcVersion(version).into());
            }
        }
        if let Some(id) = self.id {
            if id.as_u64() != Some(expected_id) {
                return Err(TonQueryError::IdIsNotMatching {
                    expected: expected_id,
                    found: id.to_string(),
                }
                .into());
            }
        }
        self.result
            .ok_or_else(|| TonQueryError::MissingResult(method.to_string()).into())
    }
}
