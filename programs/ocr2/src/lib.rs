//! OCR2 Feed Program
//!
//! A committee of oracles agrees off-chain on an answer; any one of them
//! submits it with a quorum of secp256k1 signatures. The program verifies the
//! report, keeps a bounded round history and accounts for oracle payments.
//!
//! ## Instructions
//!
//! - **Initialize** (0): Create a feed and its round history
//! - **BeginOffchainConfig** (1) / **WriteOffchainConfig** (2) /
//!   **CommitOffchainConfig** (3) / **ResetPendingOffchainConfig** (4):
//!   Stage and publish the offchain config blob
//! - **SetConfig** (5): Rotate the committee (owner only)
//! - **SetPayees** (6): Register payout token accounts
//! - **SetBilling** (7): Change per-round payments
//! - **SetValidatorConfig** (8): Wire up the deviation-flagging validator
//! - **Transmit** (9): Submit a signed report
//! - **WithdrawFunds** (10): Withdraw funds not owed to oracles
//! - **PayRemaining** (11) / **PayOracles** (12): Pay leftover and current balances
//! - **Query** (13): Project state into a scratch account
//! - **TransferOwnership** (14) / **AcceptOwnership** (15): Two-step owner change
//! - **RequestNewRound** (16): Ask the committee for a fresh report
//!
//! ## Account Structure
//!
//! ```text
//! State (11 232 bytes):
//!   magic, version, vault_nonce
//!   transmissions: Pubkey  - Round history account
//!   config                 - Owner, bounds, digest, epoch/round, billing
//!   oracles                - [Oracle; 19] + len, with per-slot accrual
//!   leftover_payments      - [LeftoverPayment; 19] + len
//!   offchain_config        - Committed blob (4 096 bytes)
//!   pending_offchain_config- Blob being staged
//!   validator              - Validator account + flagging threshold
//!
//! Transmissions:
//!   header (64 bytes)      - magic, capacity, latest round id, cursor, feed
//!   [Transmission; capacity] (56 bytes each)
//! ```

#![cfg_attr(target_os = "solana", no_std)]

pub mod constants;
pub mod state;
pub mod instructions;
pub mod access;
pub mod digest;
pub mod report;
pub mod signature;
pub mod events;
pub mod pda;
pub mod cpi;

// Always expose entrypoint for testing
pub mod entrypoint;

#[cfg(test)]
pub(crate) mod test_utils;

// Panic handler for no_std builds (only for Solana BPF)
#[cfg(all(target_os = "solana", not(test)))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

pub use state::*;
pub use instructions::*;

pinocchio_pubkey::declare_id!("FeedocR2Txns8ridge3ePortsAnswers111111111111");
