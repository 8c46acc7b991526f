// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint::BigInt;
use serde_json::{json, Value};
use tonlib_core::{TonAddress, TonAddressParseError};

use crate::{client::JsonRpcClient, common::RpcError};

/// A scripted answer to a `runGetMethod` request.
#[derive(Clone, Debug)]
pub enum MockReply {
    /// A successful run returning this stack.
    Stack(Vec<Value>),
    /// A run that failed with this TVM exit code.
    ExitCode(i32),
    /// An endpoint error with this message.
    Error(String),
}

impl MockReply {
    /// A successful run returning a single integer.
    pub fn num(value: impl Into<BigInt>) -> Self {
        MockReply::Stack(vec![json!(["num", format!("{:#x}", value.into())])])
    }
}

#[derive(Default)]
struct MockState {
    active: HashSet<TonAddress>,
    get_methods: HashMap<(TonAddress, String), VecDeque<MockReply>>,
    sent: Vec<Vec<u8>>,
    requests: Vec<String>,
    send_error: Option<String>,
}

/// An in-memory toncenter endpoint answering from scripted replies.
///
/// Each get-method has a queue of replies; the last reply of a queue is repeated forever.
#[derive(Default)]
pub struct MockTonRpc {
    state: Mutex<MockState>,
    id: async_lock::Mutex<u64>,
}

impl MockTonRpc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the account at `address` as an active contract.
    pub fn set_active(&self, address: &TonAddress) {
        self.state.lock().unwrap().active.insert(address.clone());
    }

    /// Queues a reply for the get-method `method` of `address`.
    pub fn push_get_method(&self, address: &TonAddress, method: &str, reply: MockReply) {
        self.state
            .lock()
            .unwrap()
            .get_methods
            .entry((address.clone(), method.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Makes every following `sendBoc` fail with `message`.
    pub fn fail_sends(&self, message: &str) {
        self.state.lock().unwrap().send_error = Some(message.to_string());
    }

    /// The external messages received so far.
    pub fn sent_bocs(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().sent.clone()
    }

    /// The methods requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    fn answer(&self, method: &str, params: &Value) -> Result<Value, String> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(method.to_string());
        match method {
            "runGetMethod" => {
                let address = parse_address(params)?;
                let name = params["method"].as_str().unwrap_or_default().to_string();
                let queue = state
                    .get_methods
                    .get_mut(&(address.clone(), name.clone()))
                    .ok_or_else(|| format!("no reply for {name} on {address}"))?;
                let reply = if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                };
                match reply {
                    Some(MockReply::Stack(stack)) => Ok(run_result(stack, 0)),
                    Some(MockReply::ExitCode(exit_code)) => Ok(run_result(Vec::new(), exit_code)),
                    Some(MockReply::Error(message)) => Err(message),
                    None => Err(format!("no reply for {name} on {address}")),
                }
            }
            "getAddressState" => {
                let address = parse_address(params)?;
                let account_state = if state.active.contains(&address) {
                    "active"
                } else {
                    "uninitialized"
                };
                Ok(json!(account_state))
            }
            "sendBoc" => {
                if let Some(message) = &state.send_error {
                    return Err(message.clone());
                }
                let boc = STANDARD
                    .decode(params["boc"].as_str().unwrap_or_default())
                    .map_err(|error| error.to_string())?;
                state.sent.push(boc);
                Ok(json!({ "@type": "ok" }))
            }
            method => Err(format!("unknown method {method}")),
        }
    }
}

fn parse_address(params: &Value) -> Result<TonAddress, String> {
    params["address"]
        .as_str()
        .unwrap_or_default()
        .parse()
        .map_err(|error: TonAddressParseError| error.to_string())
}

fn run_result(stack: Vec<Value>, exit_code: i32) -> Value {
    json!({
        "@type": "smc.runResult",
        "gas_used": 0,
        "stack": stack,
        "exit_code": exit_code,
    })
}

#[async_trait]
impl JsonRpcClient for MockTonRpc {
    async fn get_id(&self) -> u64 {
        let mut id = self.id.lock().await;
        *id += 1;
        *id
    }

    async fn request_inner(&self, payload: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let request: Value = serde_json::from_slice(&payload)?;
        let method = request["method"].as_str().unwrap_or_default();
        let response = match self.answer(method, &request["params"]) {
            Ok(result) => json!({
                "ok": true,
                "result": result,
                "jsonrpc": "2.0",
                "id": request["id"],
            }),
            Err(error) => json!({
                "ok": false,
                "error": error,
                "code": 500,
                "jsonrpc": "2.0",
                "id": request["id"],
            }),
        };
        Ok(serde_json::to_vec(&response)?)
    }
}
