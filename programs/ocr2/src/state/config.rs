//! Feed configuration record

use crate::constants::DESCRIPTION_LEN;
use bytemuck::{Pod, Zeroable};
use ocr2_common::PodI128;
use pinocchio::pubkey::Pubkey;

/// Per-round payment amounts, in token base units
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Billing {
    /// Credited to every oracle whose signature counted toward the quorum
    pub observation_payment: u32,
    /// Credited once more to the oracle that submitted the transaction
    pub transmission_payment: u32,
}

/// Deviation-flagging validator wiring
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ValidatorConfig {
    /// Validator state account; all zeros = no validator
    pub validator: Pubkey,
    /// Parts per 100_000 of change between rounds before a flag is raised
    pub flagging_threshold: u32,
    pub _padding: [u8; 4],
}

impl ValidatorConfig {
    pub fn is_enabled(&self) -> bool {
        self.validator != Pubkey::default()
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Config {
    pub owner: Pubkey,
    /// Pending owner of a two-step transfer; all zeros = none
    pub proposed_owner: Pubkey,
    pub token_mint: Pubkey,
    pub token_vault: Pubkey,
    pub requester_access_controller: Pubkey,
    pub billing_access_controller: Pubkey,
    pub min_answer: PodI128,
    pub max_answer: PodI128,
    /// UTF-8, zero padded
    pub description: [u8; DESCRIPTION_LEN],
    pub latest_config_digest: [u8; 32],
    /// Slot of the last digest change
    pub latest_config_slot: u64,
    /// Number of distinct configurations this feed has had
    pub config_count: u32,
    /// Latest accepted epoch under the current digest
    pub epoch: u32,
    pub decimals: u8,
    pub f: u8,
    /// Latest accepted round within `epoch`
    pub round: u8,
    pub _padding0: [u8; 1],
    pub billing: Billing,
    pub _padding1: [u8; 4],
}

impl Config {
    /// Whether a committee has been set and a digest published
    pub fn is_configured(&self) -> bool {
        self.config_count > 0
    }

    /// Signatures needed for a report to be accepted
    pub fn quorum(&self) -> usize {
        3 * self.f as usize + 1
    }

    pub fn answer_in_range(&self, answer: i128) -> bool {
        answer >= self.min_answer.get() && answer <= self.max_answer.get()
    }

    pub fn description(&self) -> &[u8] {
        let len = self
            .description
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(DESCRIPTION_LEN);
        &self.description[..len]
    }
}
