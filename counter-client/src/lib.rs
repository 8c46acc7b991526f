// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module provides a client for a counter contract on TON: reading the counter,
//! encoding the messages of its two revisions, and submitting increments from a v4r2
//! wallet until they are observed on chain.

pub mod config;
pub mod confirmation;
pub mod contract;
mod error;
pub mod getter;
pub mod messages;
pub mod sender;
pub mod wallet;

/// Helper types for tests.
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

#[cfg(test)]
mod unit_tests;

pub use error::{DecodeError, Error};
