//! Feed instruction handlers
//!
//! Each handler works on already-loaded records and plain keys so it can be
//! exercised without a runtime. Account validation, token transfers and the
//! validator call happen in the entrypoint.

pub mod initialize;
pub mod offchain_config;
pub mod set_config;
pub mod payees;
pub mod billing;
pub mod validator;
pub mod transmit;
pub mod query;
pub mod ownership;
pub mod request_new_round;

pub use initialize::*;
pub use offchain_config::*;
pub use set_config::*;
pub use payees::*;
pub use billing::*;
pub use validator::*;
pub use transmit::*;
pub use query::*;
pub use ownership::*;
pub use request_new_round::*;

use ocr2_common::OcrError;

/// Instruction discriminator
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ocr2Instruction {
    /// Create the feed and its round history
    Initialize = 0,
    /// Start staging an offchain config blob
    BeginOffchainConfig = 1,
    /// Append a chunk to the staged blob
    WriteOffchainConfig = 2,
    /// Publish the staged blob
    CommitOffchainConfig = 3,
    /// Abandon the staged blob
    ResetPendingOffchainConfig = 4,
    /// Rotate the committee
    SetConfig = 5,
    /// Register payout token accounts for the committee
    SetPayees = 6,
    /// Change per-round payments
    SetBilling = 7,
    /// Wire up the deviation-flagging validator
    SetValidatorConfig = 8,
    /// Submit a signed report
    Transmit = 9,
    /// Move unowed funds out of the vault
    WithdrawFunds = 10,
    /// Pay out and clear the leftover list
    PayRemaining = 11,
    /// Pay out current committee accruals
    PayOracles = 12,
    /// Project read-only state into a buffer account
    Query = 13,
    /// Propose a new owner
    TransferOwnership = 14,
    /// Proposed owner takes over
    AcceptOwnership = 15,
    /// Ask the committee for a fresh round
    RequestNewRound = 16,
}

impl TryFrom<u8> for Ocr2Instruction {
    type Error = OcrError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Initialize,
            1 => Self::BeginOffchainConfig,
            2 => Self::WriteOffchainConfig,
            3 => Self::CommitOffchainConfig,
            4 => Self::ResetPendingOffchainConfig,
            5 => Self::SetConfig,
            6 => Self::SetPayees,
            7 => Self::SetBilling,
            8 => Self::SetValidatorConfig,
            9 => Self::Transmit,
            10 => Self::WithdrawFunds,
            11 => Self::PayRemaining,
            12 => Self::PayOracles,
            13 => Self::Query,
            14 => Self::TransferOwnership,
            15 => Self::AcceptOwnership,
            16 => Self::RequestNewRound,
            _ => return Err(OcrError::InvalidInstruction),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminators_roundtrip() {
        for tag in 0u8..=16 {
            let ix = Ocr2Instruction::try_from(tag).unwrap();
            assert_eq!(ix as u8, tag);
        }
        assert_eq!(Ocr2Instruction::try_from(17), Err(OcrError::InvalidInstruction));
    }
}
