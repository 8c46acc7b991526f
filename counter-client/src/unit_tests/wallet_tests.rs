// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use assert_matches::assert_matches;
use counter_base::{
    boc,
    crypto::{key_pair_from_mnemonic, key_pair_from_seed},
    data_types::Amount,
};
use counter_rpc::test_utils::{MockReply, MockTonRpc};
use num_bigint::BigUint;
use tonlib_core::{
    cell::{ArcCell, Cell, CellBuilder},
    tlb_types::tlb,
    TonAddress, TonHash,
};

use crate::{
    contract::Counter,
    messages::CounterMessage,
    sender::{InternalMessage, Sender as _},
    test_utils::{test_wallet, RecordingSender},
    wallet::{WalletSender, WalletV4},
    Error,
};

const SECRET: &str = "d0a3c2aaace0274a3392e118f7f40f56aa66ef7ad5085e284e4d86e4e9beba45";
const DEFAULT_WALLET_ID: i32 = 698983191;

fn reference_wallet() -> WalletV4 {
    let secret: [u8; 32] = hex::decode(SECRET).unwrap().try_into().unwrap();
    WalletV4::new(key_pair_from_seed(&secret), 0).unwrap()
}

fn increment_body() -> ArcCell {
    CounterMessage::Increment { query_id: 0 }
        .to_cell()
        .unwrap()
        .to_arc()
}

fn some_address(byte: u8) -> TonAddress {
    TonAddress::new(0, TonHash::from([byte; 32]))
}

/// Checks the `ext_in_msg_info` header of a transfer and returns its signature and the
/// signed body.
fn open_transfer(external: &Cell, wallet: &TonAddress) -> (Vec<u8>, Cell) {
    let mut parser = external.parser();
    assert_eq!(parser.load_u8(2).unwrap(), 0b10);
    assert_eq!(parser.load_address().unwrap(), TonAddress::NULL);
    assert_eq!(&parser.load_address().unwrap(), wallet);
    assert_eq!(parser.load_coins().unwrap(), BigUint::from(0u8));
    assert!(!parser.load_bit().unwrap()); // no state init
    let signed_body = parser.load_either_cell_or_cell_ref().unwrap();

    let mut parser = signed_body.parser();
    let signature = parser.load_bytes(64).unwrap();
    (signature, parser.load_remaining().unwrap())
}

#[test]
fn test_wallet_code() {
    assert_eq!(
        WalletV4::code().unwrap().cell_hash().to_hex(),
        "feb5ff6820e2ff0d9483e7e0d62c817d846789fb4ae580c878866d959dabd5c0"
    );
}

#[test]
fn test_wallet_address() {
    let wallet = reference_wallet();
    assert_eq!(
        hex::encode(wallet.public_key()),
        "597b56a6824c679b64f8080516921c8f6a6d84d2c13397948a542ddc9ac16118"
    );
    assert_eq!(wallet.wallet_id(), DEFAULT_WALLET_ID);
    assert_eq!(
        wallet.address().to_hex(),
        "0:e8adcbf0b190b419cfae248cf51526af9d868eacc5bb9170c905faa93f11b939"
    );
    assert_eq!(
        wallet.address().to_base64_url_flags(true, false),
        "UQDorcvwsZC0Gc-uJIz1FSavnYaOrMW7kXDJBfqpPxG5OVln"
    );
}

#[test]
fn test_wallet_of_mnemonic() {
    let key_pair = key_pair_from_mnemonic(
        "fancy carpet hello mandate penalty trial consider property top vicious exit rebuild \
         tragic profit urban major total month holiday sudden rib gather media vicious",
    )
    .unwrap();
    let wallet = WalletV4::new(key_pair, 0).unwrap();
    assert_eq!(
        wallet.address().to_string(),
        "EQCDM_QGggZ3qMa_f3lRPk4_qLDnLTqdi6OkMAV2NB9r5TG3"
    );
}

#[test]
fn test_wallet_data() {
    let wallet = reference_wallet();
    let mut data = CellBuilder::new();
    data.store_u32(32, 0) // seqno
        .unwrap()
        .store_i32(32, DEFAULT_WALLET_ID)
        .unwrap()
        .store_slice(wallet.public_key())
        .unwrap()
        .store_bit(false) // plugins
        .unwrap();
    let data = data.build().unwrap().to_arc();
    let code = WalletV4::code().unwrap().clone();
    assert_eq!(
        &TonAddress::derive(0, code, data).unwrap(),
        wallet.address()
    );

    let masterchain = WalletV4::new(key_pair_from_seed(&[1; 32]), -1).unwrap();
    assert_eq!(masterchain.wallet_id(), DEFAULT_WALLET_ID - 1);
    assert_eq!(masterchain.address().workchain, -1);
}

#[test]
fn test_internal_message_layout() {
    let to = some_address(9);
    let message = InternalMessage {
        to: to.clone(),
        value: Amount::from_millis(2),
        bounce: false,
        init: None,
        body: Some(increment_body()),
    };
    let cell = message.to_cell().unwrap();
    let mut parser = cell.parser();
    assert!(!parser.load_bit().unwrap()); // int_msg_info
    assert!(parser.load_bit().unwrap()); // ihr_disabled
    assert!(!parser.load_bit().unwrap()); // bounce
    assert!(!parser.load_bit().unwrap()); // bounced
    assert_eq!(parser.load_address().unwrap(), TonAddress::NULL);
    assert_eq!(parser.load_address().unwrap(), to);
    assert_eq!(parser.load_coins().unwrap(), BigUint::from(2_000_000u32));
    assert!(!parser.load_bit().unwrap()); // extra currencies
    assert_eq!(parser.load_coins().unwrap(), BigUint::from(0u8));
    assert_eq!(parser.load_coins().unwrap(), BigUint::from(0u8));
    assert_eq!(parser.load_u64(64).unwrap(), 0);
    assert_eq!(parser.load_u32(32).unwrap(), 0);
    assert!(!parser.load_bit().unwrap()); // no state init
    assert!(parser.load_bit().unwrap()); // body by reference
    assert_eq!(
        parser.next_reference().unwrap().cell_hash(),
        increment_body().cell_hash()
    );
    assert_eq!(parser.remaining_bits(), 0);
}

#[test]
fn test_transfer_is_signed_by_the_wallet() {
    let wallet = reference_wallet();
    let message = InternalMessage {
        to: some_address(9),
        value: Amount::from_millis(50),
        bounce: false,
        init: None,
        body: Some(increment_body()),
    };
    let external = wallet.create_transfer(12, 1_700_000_060, &message).unwrap();
    let (signature, body) = open_transfer(&external, wallet.address());
    assert!(nacl::sign::verify(
        &signature,
        body.cell_hash().as_slice(),
        wallet.public_key()
    )
    .unwrap());

    let mut parser = body.parser();
    assert_eq!(parser.load_i32(32).unwrap(), wallet.wallet_id());
    assert_eq!(parser.load_u32(32).unwrap(), 1_700_000_060);
    assert_eq!(parser.load_u32(32).unwrap(), 12);
    assert_eq!(parser.load_u8(8).unwrap(), 0); // simple send
    assert_eq!(parser.load_u8(8).unwrap(), 3); // send mode
    assert_eq!(
        parser.next_reference().unwrap().cell_hash(),
        message.to_cell().unwrap().cell_hash()
    );
}

#[tokio::test]
async fn test_wallet_sender_uses_the_current_seqno() {
    let wallet = test_wallet(1);
    let address = wallet.address().clone();
    let rpc = Arc::new(MockTonRpc::new());
    rpc.push_get_method(&address, "seqno", MockReply::num(5));
    let sender = WalletSender::new(wallet, rpc.clone());
    assert_eq!(sender.address(), address);
    assert_eq!(sender.seqno().await.unwrap(), 5);

    let message = InternalMessage {
        to: some_address(9),
        value: Amount::from_millis(2),
        bounce: false,
        init: None,
        body: Some(increment_body()),
    };
    sender.send(message).await.unwrap();
    let sent = rpc.sent_bocs();
    assert_eq!(sent.len(), 1);
    let external = boc::deserialize_first(&sent[0]).unwrap();
    let (_, body) = open_transfer(&external, &address);
    let mut parser = body.parser();
    parser.load_i32(32).unwrap();
    parser.load_u32(32).unwrap();
    assert_eq!(parser.load_u32(32).unwrap(), 5);
}

#[tokio::test]
async fn test_out_of_range_seqno() {
    let wallet = test_wallet(2);
    let rpc = Arc::new(MockTonRpc::new());
    rpc.push_get_method(wallet.address(), "seqno", MockReply::num(1u64 << 40));
    let sender = WalletSender::new(wallet, rpc);
    assert_matches!(
        sender.seqno().await,
        Err(Error::Decode(crate::DecodeError::OutOfRange { .. }))
    );
}

#[test]
fn test_counter_for_deploy() {
    let code = increment_body();
    let counter = Counter::for_deploy(code.clone(), 1).unwrap();
    assert_eq!(
        counter.address().hash_part.to_hex(),
        "b5b7f9cfb8bfca737e6d995fdc48fdf9634b3e509c6d06abaeca9d4977f0b49d"
    );
    assert_eq!(counter.address().workchain, 0);
    let init = counter.state_init().unwrap();
    assert_eq!(init.code.as_deref(), Some(&code));
    let data = init.data.as_deref().unwrap();
    assert_eq!(data.parser().load_u64(64).unwrap(), 1);
}

#[tokio::test]
async fn test_send_deploy() {
    let counter = Counter::for_deploy(increment_body(), 0).unwrap();
    let sender = RecordingSender::new(some_address(4));
    counter.send_deploy(&sender).await.unwrap();
    let sent = sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(&sent[0].to, counter.address());
    assert_eq!(sent[0].value, Amount::from_millis(10));
    assert!(!sent[0].bounce);
    assert_eq!(sent[0].init.as_ref(), counter.state_init());
    assert!(sent[0].body.is_none());

    // The state init travels by reference, the empty body inline.
    let cell = sent[0].to_cell().unwrap();
    assert_eq!(cell.references().len(), 1);
    assert_eq!(
        cell.references()[0].cell_hash(),
        tlb::TLB::cell_hash(counter.state_init().unwrap()).unwrap()
    );

    let deployed = Counter::new(counter.address().clone());
    assert_matches!(
        deployed.send_deploy(&sender).await,
        Err(Error::NotDeployable(address)) if &address == counter.address()
    );
}
