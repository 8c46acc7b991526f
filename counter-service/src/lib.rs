// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Options and helpers of the `counter` binary.

pub mod options;
pub mod runner;
pub mod util;
