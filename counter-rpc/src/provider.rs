// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_lock::Mutex;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};

use crate::{
    client::JsonRpcClient,
    common::{JsonRpcResponse, RpcError},
};

/// The header carrying the toncenter API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A toncenter JSON-RPC endpoint, e.g. `https://toncenter.com/api/v2/jsonRPC`.
pub struct TonCenterClient {
    pub url: String,
    api_key: Option<String>,
    client: Client,
    pub id: Mutex<u64>,
}

#[async_trait]
impl JsonRpcClient for TonCenterClient {
    async fn get_id(&self) -> u64 {
        let mut id = self.id.lock().await;
        *id += 1;
        *id
    }

    async fn request_inner(&self, payload: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let mut request = self
            .client
            .post(&self.url)
            .body(payload)
            .header(CONTENT_TYPE, "application/json");
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        check_status(status, body)
    }
}

/// Passes on the body of an error status only if it is a JSON-RPC envelope describing the
/// failure, as toncenter sends for rate limits and rejected messages.
pub(crate) fn check_status(status: StatusCode, body: Vec<u8>) -> Result<Vec<u8>, RpcError> {
    if status.is_success() || JsonRpcResponse::is_envelope(&body) {
        return Ok(body);
    }
    Err(RpcError::HttpStatus {
        status: status.as_u16(),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

impl TonCenterClient {
    /// Creates a client for the endpoint at `url`, authenticated by `api_key` if given.
    pub fn new(url: String, api_key: Option<String>) -> Result<Self, RpcError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let api_key = api_key.filter(|key| !key.is_empty());
        Ok(Self {
            url,
            api_key,
            client,
            id: Mutex::new(0),
        })
    }
}
