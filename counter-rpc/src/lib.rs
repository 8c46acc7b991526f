// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module provides access to a TON node through the JSON-RPC API of a toncenter
//! endpoint.

pub mod client;
pub mod common;
pub mod provider;

/// Helper types for tests.
#[cfg(any(test, feature = "test"))]
pub mod test_utils;
