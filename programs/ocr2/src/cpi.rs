//! Calls into the token program and the deviation-flagging validator

use crate::constants::{VALIDATOR_SEED, VAULT_SEED};
use crate::instructions::ValidatorCall;
use crate::pda::{authority_seeds, signer};
use ocr2_common::{interfaces::encode_validate, OcrError};
use pinocchio::{
    account_info::AccountInfo,
    cpi::invoke_signed,
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    ProgramResult,
};
use pinocchio_token::{instructions::Transfer, state::TokenAccount};

/// Token accounts and authority needed to move funds out of the vault
pub struct Vault<'a> {
    pub feed: &'a Pubkey,
    pub nonce: u8,
    pub vault: &'a AccountInfo,
    pub authority: &'a AccountInfo,
}

impl Vault<'_> {
    pub fn balance(&self) -> Result<u64, ProgramError> {
        Ok(TokenAccount::from_account_info(self.vault)?.amount())
    }

    /// Transfer `amount` from the vault to `to`, signed by the vault authority
    pub fn transfer(&self, to: &AccountInfo, amount: u64) -> ProgramResult {
        if amount == 0 {
            return Ok(());
        }
        let bump = [self.nonce];
        let seeds = authority_seeds(VAULT_SEED, self.feed, &bump);
        Transfer { from: self.vault, to, authority: self.authority, amount }
            .invoke_signed(&[signer(&seeds)])
    }
}

/// Fail unless `account` is a token account of `mint`
pub fn require_token_account(account: &AccountInfo, mint: &Pubkey) -> Result<(), ProgramError> {
    let token = TokenAccount::from_account_info(account)?;
    if token.mint() != mint {
        return Err(OcrError::TokenAccountMismatch.into());
    }
    Ok(())
}

/// Accounts of the validator call
pub struct Validator<'a> {
    pub program: &'a AccountInfo,
    pub state: &'a AccountInfo,
    pub authority: &'a AccountInfo,
    pub access_controller: &'a AccountInfo,
}

impl Validator<'_> {
    /// Forward a flagged round; any failure aborts the enclosing transmit
    pub fn validate(&self, feed: &Pubkey, bump: u8, call: &ValidatorCall) -> ProgramResult {
        if self.state.key() != &call.validator || !self.state.is_owned_by(self.program.key()) {
            return Err(OcrError::ValidatorMismatch.into());
        }
        let data = encode_validate(
            call.previous_round_id,
            call.previous_answer,
            call.round_id,
            call.answer,
        );
        let metas = [
            AccountMeta::writable(self.state.key()),
            AccountMeta::readonly_signer(self.authority.key()),
            AccountMeta::readonly(self.access_controller.key()),
        ];
        let instruction = Instruction {
            program_id: self.program.key(),
            data: &data,
            accounts: &metas,
        };
        let bump = [bump];
        let seeds = authority_seeds(VALIDATOR_SEED, feed, &bump);
        invoke_signed(
            &instruction,
            &[self.state, self.authority, self.access_controller],
            &[signer(&seeds)],
        )
    }
}
