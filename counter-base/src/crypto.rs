// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wallet keys derived from TON mnemonics.

pub use tonlib_core::wallet::{error::MnemonicError, mnemonic::KeyPair};
use tonlib_core::wallet::mnemonic::Mnemonic;

/// Derives the key-pair of a wallet from its 24-word mnemonic, without password.
///
/// Words may be separated by any whitespace and are matched case-insensitively.
pub fn key_pair_from_mnemonic(phrase: &str) -> Result<KeyPair, MnemonicError> {
    let words = phrase.split_whitespace().collect::<Vec<_>>();
    Mnemonic::new(words, &None)?.to_key_pair()
}

/// Builds the key-pair of a 32-byte Ed25519 seed. Use with care.
pub fn key_pair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let key_pair = nacl::sign::generate_keypair(seed);
    KeyPair {
        public_key: key_pair.pkey.to_vec(),
        secret_key: key_pair.skey.to_vec(),
    }
}
