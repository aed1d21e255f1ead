//! Report signature recovery
//!
//! Oracles sign with secp256k1. Their on-chain identity is the 20-byte
//! address derived from the uncompressed public key: the low 20 bytes of
//! its Keccak-256 hash.

use crate::constants::SIGNATURE_LEN;
use crate::state::SignerKey;
use ocr2_common::OcrError;
use sha3::{Digest, Keccak256};
use solana_secp256k1_recover::secp256k1_recover;

/// Derive the signer key from a 64-byte uncompressed public key (no 0x04 prefix)
pub fn signer_key(public_key: &[u8; 64]) -> SignerKey {
    let hash = Keccak256::digest(public_key);
    let mut key = [0u8; 20];
    key.copy_from_slice(&hash[12..]);
    SignerKey(key)
}

/// Recover who signed `hash` from a 65-byte (signature, recovery id) tuple
pub fn recover_signer(hash: &[u8; 32], signature: &[u8]) -> Result<SignerKey, OcrError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(OcrError::InvalidReport);
    }
    let recovery_id = signature[64];
    let public_key = secp256k1_recover(hash, recovery_id, &signature[..64])
        .map_err(|_| OcrError::SignatureRecoveryFailed)?;
    Ok(signer_key(&public_key.to_bytes()))
}
