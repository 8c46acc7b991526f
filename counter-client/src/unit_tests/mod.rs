// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

mod getter_tests;
mod messages_tests;
mod wallet_tests;
