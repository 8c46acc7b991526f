// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use assert_matches::assert_matches;
use counter_base::data_types::CounterValue;
use counter_rpc::{
    common::RpcError,
    test_utils::{MockReply, MockTonRpc},
};
use num_bigint::{BigInt, BigUint};
use serde_json::json;
use test_case::test_case;

use crate::{
    config::{func_counter_address, CounterConfig, Revision, COUNTER_GETTER},
    getter::Getter,
    DecodeError, Error,
};

fn getter_with(replies: Vec<MockReply>) -> (Getter<MockTonRpc>, Arc<MockTonRpc>) {
    let rpc = Arc::new(MockTonRpc::new());
    for reply in replies {
        rpc.push_get_method(&func_counter_address(), COUNTER_GETTER, reply);
    }
    let config = CounterConfig::new(Revision::FunC, None).unwrap();
    (Getter::new(&config, rpc.clone()), rpc)
}

#[test_case(BigUint::from(0u8); "zero")]
#[test_case(BigUint::from(1u8); "one")]
#[test_case(BigUint::from(u64::MAX); "largest u64")]
#[test_case(BigUint::from(1u8) << 200; "beyond 64 bits")]
#[tokio::test]
async fn test_getter_returns_the_encoded_integer(value: BigUint) {
    let (getter, _) = getter_with(vec![MockReply::num(BigInt::from(value.clone()))]);
    assert_eq!(getter.get().await.unwrap(), CounterValue(value));
}

#[tokio::test]
async fn test_getter_reads_are_idempotent() {
    let (getter, rpc) = getter_with(vec![MockReply::num(42)]);
    let first = getter.get().await.unwrap();
    let second = getter.get().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, CounterValue::from(42));
    assert_eq!(rpc.requests(), vec!["runGetMethod", "runGetMethod"]);
}

#[tokio::test]
async fn test_getter_uses_the_first_stack_entry() {
    let (getter, _) = getter_with(vec![MockReply::Stack(vec![
        json!(["num", "0x7"]),
        json!(["num", "0x8"]),
    ])]);
    assert_eq!(getter.get().await.unwrap(), CounterValue::from(7));
}

#[tokio::test]
async fn test_getter_decode_errors() {
    let (getter, _) = getter_with(vec![MockReply::Stack(Vec::new())]);
    assert_matches!(
        getter.get().await,
        Err(Error::Decode(DecodeError::EmptyStack { method })) if method == "counter"
    );

    let (getter, _) = getter_with(vec![MockReply::Stack(vec![json!(["cell", {}])])]);
    assert_matches!(
        getter.get().await,
        Err(Error::Decode(DecodeError::NotAnInteger { kind, .. })) if kind == "cell"
    );

    let (getter, _) = getter_with(vec![MockReply::Stack(vec![json!(["num", "1234"])])]);
    assert_matches!(
        getter.get().await,
        Err(Error::Decode(DecodeError::NotAnInteger { kind, .. })) if kind == "num"
    );

    let (getter, _) = getter_with(vec![MockReply::num(-3)]);
    assert_matches!(
        getter.get().await,
        Err(Error::Decode(DecodeError::Negative { value, .. })) if value == BigInt::from(-3)
    );

    let (getter, _) = getter_with(vec![MockReply::ExitCode(-13)]);
    assert_matches!(
        getter.get().await,
        Err(Error::Decode(DecodeError::ExitCode { exit_code: -13, .. }))
    );
}

#[tokio::test]
async fn test_getter_reports_rpc_errors() {
    let (getter, _) = getter_with(vec![MockReply::Error("Ratelimit exceed".to_string())]);
    assert_matches!(
        getter.get().await,
        Err(Error::Rpc(RpcError::Endpoint { message, .. })) if message == "Ratelimit exceed"
    );
}
