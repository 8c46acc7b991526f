// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Basic types shared by the TON counter client: token amounts, counter values, wallet
//! keys and checked bag-of-cells decoding on top of `tonlib-core`.

#![deny(missing_docs)]

pub mod boc;
pub mod crypto;
pub mod data_types;
mod error;
pub mod tracing;


#[doc(hidden)]
pub use error::*;
