//! Config digest
//!
//! Binds a report to one feed, one ordered committee, one fault tolerance
//! and one committed offchain config version. Any other field of the feed
//! can change without invalidating in-flight reports.

use crate::constants::DIGEST_PREFIX;
use crate::state::Oracle;
use pinocchio::pubkey::Pubkey;
use sha2::{Digest, Sha256};

pub fn config_digest(
    feed: &Pubkey,
    oracles: &[Oracle],
    f: u8,
    offchain_config_version: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(feed);
    hasher.update([oracles.len() as u8]);
    for oracle in oracles {
        hasher.update(oracle.signer.0);
    }
    for oracle in oracles {
        hasher.update(oracle.transmitter);
    }
    hasher.update([f]);
    hasher.update(offchain_config_version.to_be_bytes());

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest[..2].copy_from_slice(&DIGEST_PREFIX.to_be_bytes());
    digest
}
