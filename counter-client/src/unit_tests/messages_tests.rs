// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;
use counter_base::data_types::Amount;
use serde_json::{json, Value};
use test_case::test_case;
use tonlib_core::{TonAddress, TonHash};

use crate::{
    contract::Counter,
    messages::{CounterMessage, IncrementRequest, MessageKind, ADD_MESSAGE_TAG},
    test_utils::RecordingSender,
    Error,
};

fn some_address(byte: u8) -> TonAddress {
    TonAddress::new(0, TonHash::from([byte; 32]))
}

#[test]
fn test_add_message_layout() {
    let cell = CounterMessage::Add { amount: 10 }.to_cell().unwrap();
    assert_eq!(cell.bit_len(), 64);
    assert_eq!(hex::encode(cell.data()), "87d43ac20000000a");

    let mut parser = cell.parser();
    assert_eq!(parser.load_u32(32).unwrap(), ADD_MESSAGE_TAG);
    assert_eq!(parser.load_u32(32).unwrap(), 10);
    assert_eq!(parser.remaining_bits(), 0);
}

#[test]
fn test_increment_message_layout() {
    let cell = CounterMessage::Increment { query_id: 0 }.to_cell().unwrap();
    assert_eq!(hex::encode(cell.data()), "000000010000000000000000");
    assert_eq!(
        cell.cell_hash().to_hex(),
        "baf83886d4d41304bb31f7739fe8519de146524267513a062e8627beccec4a81"
    );
}

#[test]
fn test_increment_text_layout() {
    let cell = CounterMessage::IncrementText.to_cell().unwrap();
    assert_eq!(hex::encode(cell.data()), "00000000696e6372656d656e74");
    let mut parser = cell.parser();
    assert_eq!(parser.load_u32(32).unwrap(), 0);
    assert_eq!(parser.load_utf8(9).unwrap(), "increment");
    parser.ensure_empty().unwrap();
}

#[test_case(json!({"$$type": "Add", "amount": 10}), CounterMessage::Add { amount: 10 }; "add")]
#[test_case(json!({"$$type": "Add", "amount": "7"}), CounterMessage::Add { amount: 7 }; "add with decimal string")]
#[test_case(json!("increment"), CounterMessage::IncrementText; "text")]
#[test_case(json!({"$$type": "Increment"}), CounterMessage::Increment { query_id: 0 }; "increment")]
#[test_case(json!({"$$type": "Increment", "queryId": 5}), CounterMessage::Increment { query_id: 5 }; "increment with query id")]
fn test_message_from_json(value: Value, expected: CounterMessage) {
    assert_eq!(CounterMessage::try_from(&value).unwrap(), expected);
}

#[test_case(json!("decrement"); "unknown text")]
#[test_case(json!({"$$type": "Sub", "amount": 1}); "unknown type")]
#[test_case(json!({"amount": 1}); "missing type")]
#[test_case(json!({"$$type": "Add"}); "missing amount")]
#[test_case(json!({"$$type": "Add", "amount": 0}); "zero amount")]
#[test_case(json!({"$$type": "Add", "amount": -1}); "negative amount")]
#[test_case(json!({"$$type": "Add", "amount": 4294967296u64}); "amount beyond 32 bits")]
#[test_case(json!(10); "number")]
#[test_case(Value::Null; "null")]
fn test_invalid_messages(value: Value) {
    assert_matches!(
        CounterMessage::try_from(value),
        Err(Error::InvalidMessage(_))
    );
}

#[test]
fn test_request_accessors() {
    let request = IncrementRequest::new(CounterMessage::Add { amount: 10 }, Amount::from_millis(50));
    assert_eq!(request.kind(), MessageKind::Add);
    assert_eq!(request.amount(), 10);
    assert!(!request.bounce);
    assert_eq!(CounterMessage::IncrementText.amount(), 1);
}

#[tokio::test]
async fn test_invalid_message_is_never_sent() {
    let counter = Counter::new(some_address(3));
    let sender = RecordingSender::new(some_address(4));
    let result = counter
        .send_json(&sender, &json!({"$$type": "Reset"}), Amount::from_millis(50))
        .await;
    assert_matches!(result, Err(Error::InvalidMessage(_)));
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn test_json_message_is_sent_non_bouncing() {
    let counter_address = some_address(3);
    let counter = Counter::new(counter_address.clone());
    let sender = RecordingSender::new(some_address(4));
    counter
        .send_json(&sender, &json!({"$$type": "Add", "amount": 10}), Amount::from_millis(50))
        .await
        .unwrap();
    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, counter_address);
    assert_eq!(sent[0].value, Amount::from_millis(50));
    assert!(!sent[0].bounce);
    assert!(sent[0].init.is_none());
    assert_eq!(
        sent[0].body.as_ref().map(|body| body.cell_hash()),
        Some(CounterMessage::Add { amount: 10 }.to_cell().unwrap().cell_hash())
    );
}
