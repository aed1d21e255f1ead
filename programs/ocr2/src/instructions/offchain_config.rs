//! Offchain config staging - begin, write, commit, reset
//!
//! The blob can exceed a single transaction, so it is assembled in the
//! pending buffer over several calls and published by `commit`. Readers
//! only ever see the committed buffer.

use super::set_config::refresh_config_digest;
use crate::state::{StagingState, State};
use ocr2_common::OcrError;
use pinocchio::{msg, pubkey::Pubkey};

/// Start a staging session for `version`
///
/// Any unfinished session is discarded. `version` must exceed the committed one.
pub fn process_begin_offchain_config(
    state: &mut State,
    authority: &Pubkey,
    version: u64,
) -> Result<(), OcrError> {
    state.require_owner(authority)?;
    if version == 0 || version <= state.offchain_config.version {
        msg!("Error: Offchain config version must increase");
        return Err(OcrError::InvalidOffchainConfigVersion);
    }
    state.pending_offchain_config.clear();
    state.pending_offchain_config.version = version;
    Ok(())
}

/// Append `chunk` to the staged blob
pub fn process_write_offchain_config(
    state: &mut State,
    authority: &Pubkey,
    chunk: &[u8],
) -> Result<usize, OcrError> {
    state.require_owner(authority)?;
    if !matches!(state.staging_state(), StagingState::Staging { .. }) {
        return Err(OcrError::OffchainConfigNotStaging);
    }
    state.pending_offchain_config.extend(chunk)?;
    Ok(state.pending_offchain_config.len())
}

/// Result of publishing a staged blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub version: u64,
    pub len: usize,
    pub digest_changed: bool,
}

/// Publish the staged blob and bind its version into the digest
///
/// Before the first committee exists there is no digest to refresh; the
/// version is picked up by the first `set_config`.
pub fn process_commit_offchain_config(
    state: &mut State,
    feed: &Pubkey,
    authority: &Pubkey,
    slot: u64,
) -> Result<CommitOutcome, OcrError> {
    state.require_owner(authority)?;
    let StagingState::Staging { version, len } = state.staging_state() else {
        return Err(OcrError::OffchainConfigNotStaging);
    };

    // Field-wise copy keeps the 4KB buffer off the stack
    state.offchain_config.xs.copy_from_slice(&state.pending_offchain_config.xs);
    state.offchain_config.len = len as u64;
    state.offchain_config.version = version;
    state.pending_offchain_config.clear();

    let digest_changed = if state.oracles.is_empty() {
        false
    } else {
        refresh_config_digest(state, feed, slot)?
    };
    Ok(CommitOutcome { version, len, digest_changed })
}

/// Abandon the staging session, if any
pub fn process_reset_pending_offchain_config(
    state: &mut State,
    authority: &Pubkey,
) -> Result<(), OcrError> {
    state.require_owner(authority)?;
    if !matches!(state.staging_state(), StagingState::Staging { .. }) {
        return Err(OcrError::OffchainConfigNotStaging);
    }
    state.pending_offchain_config.clear();
    Ok(())
}
