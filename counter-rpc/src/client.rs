// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tonlib_core::TonAddress;
use tracing::{debug, instrument};

use crate::common::{AccountState, GetMethodResult, JsonRpcResponse, RpcError};

#[derive(Serialize)]
struct JsonRpcRequest<'a, T> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: T,
}

/// A JSON-RPC 2.0 transport: something that can post a request payload and return the raw
/// response body.
#[async_trait]
pub trait JsonRpcClient {
    /// Returns a fresh request id.
    async fn get_id(&self) -> u64;

    /// Posts `payload` and returns the response body.
    async fn request_inner(&self, payload: Vec<u8>) -> Result<Vec<u8>, RpcError>;

    /// Sends a request for `method` and decodes its result.
    async fn request<T, R>(&self, method: &str, params: T) -> Result<R, RpcError>
    where
        T: Serialize + Send,
        R: DeserializeOwned + Send,
    {
        let id = self.get_id().await;
        let payload = serde_json::to_vec(&JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })?;
        let body = self.request_inner(payload).await?;
        let response: JsonRpcResponse = serde_json::from_slice(&body)?;
        let result = response.into_result(method, id)?;
        Ok(serde_json::from_value(result)?)
    }
}

/// The queries the counter client needs from a TON node.
#[async_trait]
pub trait TonQueries {
    /// Runs the get-method `method` of the contract at `address`, with an empty stack.
    async fn run_get_method(
        &self,
        address: &TonAddress,
        method: &str,
    ) -> Result<GetMethodResult, RpcError>;

    /// Returns the state of the account at `address`.
    async fn get_address_state(&self, address: &TonAddress) -> Result<AccountState, RpcError>;

    /// Returns whether the account at `address` holds an active contract.
    async fn is_contract_deployed(&self, address: &TonAddress) -> Result<bool, RpcError> {
        Ok(self.get_address_state(address).await? == AccountState::Active)
    }

    /// Broadcasts a serialized external message.
    async fn send_boc(&self, boc: &[u8]) -> Result<(), RpcError>;
}

#[async_trait]
impl<C> TonQueries for C
where
    C: JsonRpcClient + Send + Sync,
{
    #[instrument(level = "debug", skip(self))]
    async fn run_get_method(
        &self,
        address: &TonAddress,
        method: &str,
    ) -> Result<GetMethodResult, RpcError> {
        let params = json!({
            "address": address.to_string(),
            "method": method,
            "stack": Vec::<Value>::new(),
        });
        let result: GetMethodResult = self.request("runGetMethod", params).await?;
        debug!(exit_code = result.exit_code, gas_used = result.gas_used, "get-method done");
        Ok(result)
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_address_state(&self, address: &TonAddress) -> Result<AccountState, RpcError> {
        let params = json!({ "address": address.to_string() });
        self.request("getAddressState", params).await
    }

    #[instrument(level = "debug", skip_all, fields(len = boc.len()))]
    async fn send_boc(&self, boc: &[u8]) -> Result<(), RpcError> {
        let params = json!({ "boc": STANDARD.encode(boc) });
        let _: Value = self.request("sendBoc", params).await?;
        Ok(())
    }
}
