//! Authorization against the owner and the external access controllers

use crate::state::State;
use ocr2_common::{interfaces, OcrError};
use pinocchio::pubkey::Pubkey;

/// Allow the feed owner, or anyone on the configured access controller's list
///
/// `controller_key` must be the controller recorded in the feed; a different
/// controller account cannot grant access even if it lists the caller.
pub fn require_owner_or_access(
    owner: &Pubkey,
    authority: &Pubkey,
    expected_controller: &Pubkey,
    controller_key: &Pubkey,
    controller_data: &[u8],
) -> Result<(), OcrError> {
    if authority == owner {
        return Ok(());
    }
    if controller_key != expected_controller {
        return Err(OcrError::InvalidAccount);
    }
    if !interfaces::has_access(controller_data, authority)? {
        return Err(OcrError::AccessDenied);
    }
    Ok(())
}

/// Who is calling, with the access controller account they brought along
///
/// The controller is only read when the caller is not the owner.
#[derive(Debug, Clone, Copy)]
pub struct Caller<'a> {
    pub authority: &'a Pubkey,
    pub controller_key: &'a Pubkey,
    pub controller_data: &'a [u8],
}

impl<'a> Caller<'a> {
    /// A caller that brings no controller account
    pub fn bare(authority: &'a Pubkey) -> Self {
        const NONE: Pubkey = [0; 32];
        Self { authority, controller_key: &NONE, controller_data: &[] }
    }
}

/// Owner, or listed on the billing access controller
pub fn require_billing_access(state: &State, caller: &Caller) -> Result<(), OcrError> {
    require_owner_or_access(
        &state.config.owner,
        caller.authority,
        &state.config.billing_access_controller,
        caller.controller_key,
        caller.controller_data,
    )
}

/// Owner, or listed on the requester access controller
pub fn require_requester_access(state: &State, caller: &Caller) -> Result<(), OcrError> {
    require_owner_or_access(
        &state.config.owner,
        caller.authority,
        &state.config.requester_access_controller,
        caller.controller_key,
        caller.controller_data,
    )
}
