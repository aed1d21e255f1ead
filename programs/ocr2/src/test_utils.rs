//! Shared test fixtures: signing oracles, a ready feed, encoded instruction data

use crate::instructions::{
    process_initialize, process_set_config, CommitteeMember, InitializeArgs, InitializeKeys,
    SetConfigArgs, SetConfigOutcome,
};
use crate::report::{encode, report_hash};
use crate::signature::signer_key;
use crate::state::{RingBuffer, SignerKey, State, Transmission, TransmissionsHeader};
use bytemuck::Zeroable;
use ocr2_common::interfaces::{AccessController, MAX_ACCESS_LIST};
use pinocchio::pubkey::Pubkey;

pub const FEED: Pubkey = [0xF0; 32];
pub const TRANSMISSIONS: Pubkey = [0xF1; 32];
pub const OWNER: Pubkey = [0x01; 32];
pub const MINT: Pubkey = [0x02; 32];
pub const VAULT: Pubkey = [0x03; 32];
pub const REQUESTER_AC: Pubkey = [0x04; 32];
pub const BILLING_AC: Pubkey = [0x05; 32];

/// An oracle with a real secp256k1 key
pub struct TestOracle {
    secret: libsecp256k1::SecretKey,
    pub transmitter: Pubkey,
}

impl TestOracle {
    pub fn new(seed: u8) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        bytes[31] = seed;
        let mut transmitter = [0xEE; 32];
        transmitter[0] = seed;
        Self {
            secret: libsecp256k1::SecretKey::parse(&bytes).unwrap(),
            transmitter,
        }
    }

    pub fn committee(n: usize) -> Vec<Self> {
        (1..=n as u8).map(Self::new).collect()
    }

    pub fn signer_key(&self) -> SignerKey {
        let public = libsecp256k1::PublicKey::from_secret_key(&self.secret).serialize();
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&public[1..]);
        signer_key(&raw)
    }

    pub fn member(&self) -> CommitteeMember {
        CommitteeMember { signer: self.signer_key(), transmitter: self.transmitter }
    }

    pub fn sign(&self, hash: &[u8; 32]) -> [u8; 65] {
        let (sig, recovery_id) =
            libsecp256k1::sign(&libsecp256k1::Message::parse(hash), &self.secret);
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&sig.serialize());
        out[64] = recovery_id.serialize();
        out
    }
}

/// Access controller account data, kept 8-aligned for zero-copy loads
pub struct ControllerBytes(Box<AccessController>);

impl core::ops::Deref for ControllerBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        bytemuck::bytes_of(&*self.0)
    }
}

pub fn access_controller_bytes(members: &[Pubkey]) -> ControllerBytes {
    assert!(members.len() <= MAX_ACCESS_LIST);
    let mut controller = Box::new(AccessController::zeroed());
    controller.owner = OWNER;
    controller.access_list[..members.len()].copy_from_slice(members);
    controller.access_list_len = members.len() as u64;
    ControllerBytes(controller)
}

pub fn initialize_args_bytes(
    vault_nonce: u8,
    min_answer: i128,
    max_answer: i128,
    decimals: u8,
    description: &[u8],
) -> Vec<u8> {
    let mut data = vec![vault_nonce];
    data.extend_from_slice(&min_answer.to_le_bytes());
    data.extend_from_slice(&max_answer.to_le_bytes());
    data.push(decimals);
    data.extend_from_slice(&(description.len() as u32).to_le_bytes());
    data.extend_from_slice(description);
    data
}

pub fn set_config_args(oracles: &[TestOracle], f: u8) -> SetConfigArgs {
    SetConfigArgs { f, members: oracles.iter().map(TestOracle::member).collect() }
}

pub fn set_config_bytes(oracles: &[TestOracle], f: u8) -> Vec<u8> {
    let mut data = vec![f, oracles.len() as u8];
    for oracle in oracles {
        data.extend_from_slice(&oracle.signer_key().0);
        data.extend_from_slice(&oracle.transmitter);
    }
    data
}

/// Transmit instruction data signed by `signers` (indices into `oracles`)
pub fn transmit_bytes(
    config_digest: &[u8; 32],
    oracles: &[TestOracle],
    signers: &[usize],
    epoch: u32,
    round: u8,
    median: i128,
) -> Vec<u8> {
    let observers: Vec<u8> = signers.iter().map(|i| *i as u8).collect();
    let context = encode::context(config_digest, epoch, round);
    let report = encode::report(1_700_000_000, &observers, median, 5_000);
    let hash = report_hash(&report, &context);

    let mut data = vec![0u8];
    data.extend_from_slice(&context);
    data.extend_from_slice(&report);
    for i in signers {
        data.extend_from_slice(&oracles[*i].sign(&hash));
    }
    data
}

/// An initialized feed: answers in [1, 1000], 18 decimals, "ETH/BTC"
pub struct Fixture {
    pub state: Box<State>,
    pub history_header: TransmissionsHeader,
    pub history_records: Vec<Transmission>,
    pub keys: InitializeKeys,
}

impl Fixture {
    pub fn default_keys() -> InitializeKeys {
        InitializeKeys {
            transmissions: TRANSMISSIONS,
            owner: OWNER,
            token_mint: MINT,
            token_vault: VAULT,
            requester_access_controller: REQUESTER_AC,
            billing_access_controller: BILLING_AC,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(8)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut fx = Self {
            state: Box::new(State::zeroed()),
            history_header: TransmissionsHeader::zeroed(),
            history_records: vec![Transmission::zeroed(); capacity],
            keys: Self::default_keys(),
        };
        let data = initialize_args_bytes(255, 1, 1000, 18, b"ETH/BTC");
        let args = InitializeArgs::parse(&data).unwrap();
        let keys = fx.keys;
        process_initialize(
            &FEED,
            &mut fx.state,
            &mut fx.history_header,
            &mut fx.history_records,
            &keys,
            &args,
        )
        .unwrap();
        fx
    }

    /// Initialized feed with `n` oracles at fault tolerance `f`
    pub fn with_committee(n: usize, f: u8) -> (Self, Vec<TestOracle>) {
        let mut fx = Self::new();
        let oracles = TestOracle::committee(n);
        fx.set_committee(&oracles, f);
        (fx, oracles)
    }

    pub fn set_committee(&mut self, oracles: &[TestOracle], f: u8) -> SetConfigOutcome {
        process_set_config(&mut self.state, &FEED, &OWNER, &set_config_args(oracles, f), 10)
            .unwrap()
    }

    pub fn digest(&self) -> [u8; 32] {
        self.state.config.latest_config_digest
    }

    pub fn history(&mut self) -> RingBuffer<'_> {
        RingBuffer::new(&mut self.history_header, &mut self.history_records).unwrap()
    }

    /// Split borrow of the feed record and its history
    pub fn parts(&mut self) -> (&mut State, RingBuffer<'_>) {
        let history = RingBuffer::new(&mut self.history_header, &mut self.history_records).unwrap();
        (&mut self.state, history)
    }
}
