//! Two-step ownership transfer

use crate::state::State;
use ocr2_common::OcrError;
use pinocchio::pubkey::Pubkey;

/// Propose `proposed` as the next owner; the current owner stays in charge
/// until the proposal is accepted
pub fn process_transfer_ownership(
    state: &mut State,
    authority: &Pubkey,
    proposed: &Pubkey,
) -> Result<(), OcrError> {
    state.require_owner(authority)?;
    if proposed == &Pubkey::default() {
        return Err(OcrError::InvalidInput);
    }
    state.config.proposed_owner = *proposed;
    Ok(())
}

pub fn process_accept_ownership(state: &mut State, authority: &Pubkey) -> Result<(), OcrError> {
    let config = &mut state.config;
    if config.proposed_owner == Pubkey::default() || &config.proposed_owner != authority {
        return Err(OcrError::Unauthorized);
    }
    config.owner = config.proposed_owner;
    config.proposed_owner = Pubkey::default();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Fixture, OWNER};

    #[test]
    fn test_transfer_then_accept() {
        let mut fx = Fixture::new();
        let next = [0x42; 32];
        process_transfer_ownership(&mut fx.state, &OWNER, &next).unwrap();
        assert_eq!(fx.state.config.owner, OWNER);

        assert_eq!(process_accept_ownership(&mut fx.state, &[0x43; 32]), Err(OcrError::Unauthorized));
        process_accept_ownership(&mut fx.state, &next).unwrap();
        assert_eq!(fx.state.config.owner, next);
        assert_eq!(fx.state.config.proposed_owner, Pubkey::default());

        // Old owner lost control
        assert_eq!(
            process_transfer_ownership(&mut fx.state, &OWNER, &OWNER),
            Err(OcrError::Unauthorized)
        );
    }

    #[test]
    fn test_accept_without_proposal() {
        let mut fx = Fixture::new();
        assert_eq!(
            process_accept_ownership(&mut fx.state, &Pubkey::default()),
            Err(OcrError::Unauthorized)
        );
    }
}
