//! Program-derived authorities
//!
//! The vault authority signs token transfers out of the feed's vault; the
//! validator authority signs deviation notifications. Both are unique to one
//! feed because the feed key is part of the seeds.

use crate::constants::{VALIDATOR_SEED, VAULT_SEED};
use ocr2_common::OcrError;
use pinocchio::{
    instruction::{Seed, Signer},
    pubkey::Pubkey,
};

/// Address of the `prefix` authority of `feed` for a stored bump
///
/// The bump is trusted as stored; the result is not checked to be off-curve.
pub fn derive_authority(program_id: &Pubkey, prefix: &[u8], feed: &Pubkey, bump: u8) -> Pubkey {
    #[cfg(target_os = "solana")]
    {
        pinocchio_pubkey::derive_address(&[prefix, feed.as_ref()], Some(bump), program_id)
    }
    #[cfg(not(target_os = "solana"))]
    {
        pinocchio_pubkey::derive_address_const(&[prefix, feed.as_ref()], Some(bump), program_id)
    }
}

/// Check that `expected` is the vault authority for `feed`
pub fn verify_vault_authority(
    program_id: &Pubkey,
    feed: &Pubkey,
    nonce: u8,
    expected: &Pubkey,
) -> Result<(), OcrError> {
    if &derive_authority(program_id, VAULT_SEED, feed, nonce) != expected {
        return Err(OcrError::InvalidAccount);
    }
    Ok(())
}

/// Check that `expected` is the validator authority for `feed`
pub fn verify_validator_authority(
    program_id: &Pubkey,
    feed: &Pubkey,
    bump: u8,
    expected: &Pubkey,
) -> Result<(), OcrError> {
    if &derive_authority(program_id, VALIDATOR_SEED, feed, bump) != expected {
        return Err(OcrError::InvalidAccount);
    }
    Ok(())
}

/// Seeds for signing as a feed authority; `bump` must outlive the signer
pub fn authority_seeds<'a>(prefix: &'a [u8], feed: &'a Pubkey, bump: &'a [u8; 1]) -> [Seed<'a>; 3] {
    [Seed::from(prefix), Seed::from(feed.as_ref()), Seed::from(bump.as_ref())]
}

pub fn signer<'a>(seeds: &'a [Seed<'a>; 3]) -> Signer<'a, 'a> {
    Signer::from(seeds)
}
