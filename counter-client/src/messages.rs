// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The messages understood by the counter contracts, and their cell encodings.

use counter_base::data_types::Amount;
use serde_json::Value;
use tonlib_core::cell::{Cell, CellBuilder, TonCellError};

use crate::Error;

/// The op code of the FunC increment message.
pub const INCREMENT_OP: u32 = 1;
/// The tag of the Tact `Add` message, derived from its declaration.
pub const ADD_MESSAGE_TAG: u32 = 2278832834;
/// The op code announcing a text comment.
pub const TEXT_COMMENT_OP: u32 = 0;
/// The text comment incrementing the Tact counter.
pub const INCREMENT_TEXT: &str = "increment";

/// The wire format of a message, independently of its fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Increment,
    Add,
    IncrementText,
}

/// A message incrementing a counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CounterMessage {
    /// `increment#00000001 query_id:uint64`, for the FunC contract.
    Increment { query_id: u64 },
    /// `Add#87d43ac2 amount:uint32`, for the Tact contract.
    Add { amount: u32 },
    /// The text comment `"increment"`, for the Tact contract.
    IncrementText,
}

impl CounterMessage {
    /// The wire format of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            CounterMessage::Increment { .. } => MessageKind::Increment,
            CounterMessage::Add { .. } => MessageKind::Add,
            CounterMessage::IncrementText => MessageKind::IncrementText,
        }
    }

    /// How much the counter grows when the message is processed.
    pub fn amount(&self) -> u32 {
        match self {
            CounterMessage::Add { amount } => *amount,
            CounterMessage::Increment { .. } | CounterMessage::IncrementText => 1,
        }
    }

    /// Encodes the message as an internal message body.
    pub fn to_cell(&self) -> Result<Cell, TonCellError> {
        let mut builder = CellBuilder::new();
        match self {
            CounterMessage::Increment { query_id } => {
                builder
                    .store_u32(32, INCREMENT_OP)?
                    .store_u64(64, *query_id)?;
            }
            CounterMessage::Add { amount } => {
                builder
                    .store_u32(32, ADD_MESSAGE_TAG)?
                    .store_u32(32, *amount)?;
            }
            CounterMessage::IncrementText => {
                builder
                    .store_u32(32, TEXT_COMMENT_OP)?
                    .store_string(INCREMENT_TEXT)?;
            }
        }
        builder.build()
    }
}

impl TryFrom<&Value> for CounterMessage {
    type Error = Error;

    /// Accepts the untyped messages of the Tact bindings: `{"$$type": "Add", "amount": n}`
    /// or the string `"increment"`. `{"$$type": "Increment", "queryId": n}` selects the
    /// FunC message.
    fn try_from(value: &Value) -> Result<Self, Error> {
        let invalid = || Error::InvalidMessage(value.to_string());
        match value {
            Value::String(text) if text == INCREMENT_TEXT => Ok(CounterMessage::IncrementText),
            Value::Object(fields) => match fields.get("$$type").and_then(Value::as_str) {
                Some("Add") => {
                    let amount = fields
                        .get("amount")
                        .and_then(json_u64)
                        .and_then(|amount| u32::try_from(amount).ok())
                        .filter(|amount| *amount > 0)
                        .ok_or_else(invalid)?;
                    Ok(CounterMessage::Add { amount })
                }
                Some("Increment") => {
                    let query_id = match fields.get("queryId") {
                        None => 0,
                        Some(query_id) => json_u64(query_id).ok_or_else(invalid)?,
                    };
                    Ok(CounterMessage::Increment { query_id })
                }
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<Value> for CounterMessage {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Error> {
        CounterMessage::try_from(&value)
    }
}

/// Integers may be given as JSON numbers or as decimal strings.
fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

/// A message to submit, with the value attached to pay for its processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncrementRequest {
    pub message: CounterMessage,
    pub value: Amount,
    pub bounce: bool,
}

impl IncrementRequest {
    /// A non-bouncing request.
    pub fn new(message: CounterMessage, value: Amount) -> Self {
        Self {
            message,
            value,
            bounce: false,
        }
    }

    /// The wire format of the message.
    pub fn kind(&self) -> MessageKind {
        self.message.kind()
    }

    /// How much the counter grows when the request is processed.
    pub fn amount(&self) -> u32 {
        self.message.amount()
    }
}
