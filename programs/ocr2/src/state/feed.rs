//! Feed state account
//!
//! One zero-copy record holds the configuration, the committee with its
//! accruals, the leftover list, both offchain config buffers and the
//! validator wiring. Round history lives in a separate transmissions account.

use super::{Config, LeftoverPayments, OffchainConfig, Oracles, StagingState, ValidatorConfig};
use bytemuck::{Pod, Zeroable};
use ocr2_common::OcrError;
use pinocchio::pubkey::Pubkey;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct State {
    /// Magic bytes: "OCR2FEED"
    pub magic: u64,
    pub version: u8,
    /// Bump of the vault authority PDA
    pub vault_nonce: u8,
    pub _padding0: [u8; 6],
    /// Transmissions account paired with this feed
    pub transmissions: Pubkey,
    pub config: Config,
    pub oracles: Oracles,
    pub leftover_payments: LeftoverPayments,
    pub offchain_config: OffchainConfig,
    pub pending_offchain_config: OffchainConfig,
    pub validator: ValidatorConfig,
}

impl State {
    pub const MAGIC: &'static [u8; 8] = b"OCR2FEED";
    pub const VERSION: u8 = 1;
    pub const LEN: usize = core::mem::size_of::<Self>();

    pub fn is_initialized(&self) -> bool {
        self.magic == u64::from_le_bytes(*Self::MAGIC) && self.version == Self::VERSION
    }

    /// Fail unless the record was written by `initialize`
    pub fn validate(&self) -> Result<(), OcrError> {
        if !self.is_initialized() {
            return Err(OcrError::Uninitialized);
        }
        Ok(())
    }

    /// Write a fresh feed record over zeroed account data
    pub fn initialize_in_place(&mut self, transmissions: Pubkey, vault_nonce: u8, config: Config) {
        // Zero in place; a temporary State would not fit the SBF stack
        bytemuck::bytes_of_mut(self).fill(0);
        self.magic = u64::from_le_bytes(*Self::MAGIC);
        self.version = Self::VERSION;
        self.vault_nonce = vault_nonce;
        self.transmissions = transmissions;
        self.config = config;
    }

    pub fn staging_state(&self) -> StagingState {
        if self.pending_offchain_config.version != 0 {
            StagingState::Staging {
                version: self.pending_offchain_config.version,
                len: self.pending_offchain_config.len(),
            }
        } else if self.offchain_config.version != 0 {
            StagingState::Committed { version: self.offchain_config.version }
        } else {
            StagingState::Idle
        }
    }

    /// Accrued plus leftover balances still owed to oracles
    pub fn total_owed(&self) -> u128 {
        self.oracles.total_owed() + self.leftover_payments.total()
    }

    /// Vault balance not already owed to oracles; negative when underfunded
    pub fn link_available_for_payment(&self, vault_balance: u64) -> i128 {
        vault_balance as i128 - self.total_owed() as i128
    }

    /// Owner check for owner-only instructions
    pub fn require_owner(&self, authority: &Pubkey) -> Result<(), OcrError> {
        if &self.config.owner != authority {
            return Err(OcrError::Unauthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LeftoverPayment, Oracle, SignerKey};

    #[test]
    fn test_state_size() {
        assert_eq!(State::LEN, 11_232);
    }

    #[test]
    fn test_initialize_in_place() {
        let mut state: Box<State> = Box::new(State::zeroed());
        assert!(!state.is_initialized());
        assert_eq!(state.validate(), Err(OcrError::Uninitialized));

        let mut config = Config::zeroed();
        config.owner = [7; 32];
        state.initialize_in_place([9; 32], 254, config);

        assert!(state.is_initialized());
        assert_eq!(state.vault_nonce, 254);
        assert_eq!(state.transmissions, [9; 32]);
        assert!(state.oracles.is_empty());
        assert_eq!(state.staging_state(), StagingState::Idle);
        assert!(state.require_owner(&[7; 32]).is_ok());
        assert_eq!(state.require_owner(&[8; 32]), Err(OcrError::Unauthorized));
    }

    #[test]
    fn test_link_available_subtracts_all_owed() {
        let mut state: Box<State> = Box::new(State::zeroed());
        let mut oracle = Oracle::new(SignerKey([1; 20]), [1; 32]);
        oracle.payment = 30;
        state.oracles.replace(&[oracle]);
        state
            .leftover_payments
            .push(LeftoverPayment { payee: [2; 32], amount: 20 })
            .unwrap();

        assert_eq!(state.total_owed(), 50);
        assert_eq!(state.link_available_for_payment(100), 50);
        assert_eq!(state.link_available_for_payment(10), -40);
    }
}
