//! RequestNewRound instruction - ask the committee for a fresh report

use crate::access::{require_requester_access, Caller};
use crate::state::State;
use ocr2_common::OcrError;

/// Round the request is made against, for the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRequest {
    pub config_digest: [u8; 32],
    pub epoch: u32,
    pub round: u8,
}

pub fn process_request_new_round(state: &State, caller: &Caller) -> Result<RoundRequest, OcrError> {
    require_requester_access(state, caller)?;
    if !state.config.is_configured() {
        return Err(OcrError::NoConfig);
    }
    Ok(RoundRequest {
        config_digest: state.config.latest_config_digest,
        epoch: state.config.epoch,
        round: state.config.round,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{access_controller_bytes, Fixture, OWNER, REQUESTER_AC};

    #[test]
    fn test_requester_can_request() {
        let (mut fx, _) = Fixture::with_committee(4, 1);
        fx.state.config.epoch = 2;
        fx.state.config.round = 5;
        let requester = [0x61; 32];
        let data = access_controller_bytes(&[requester]);
        let caller = Caller { authority: &requester, controller_key: &REQUESTER_AC, controller_data: &data };
        let request = process_request_new_round(&fx.state, &caller).unwrap();
        assert_eq!(request, RoundRequest { config_digest: fx.digest(), epoch: 2, round: 5 });
    }

    #[test]
    fn test_unlisted_and_unconfigured() {
        let (fx, _) = Fixture::with_committee(4, 1);
        let data = access_controller_bytes(&[]);
        let stranger = [0x62; 32];
        let caller = Caller { authority: &stranger, controller_key: &REQUESTER_AC, controller_data: &data };
        assert_eq!(process_request_new_round(&fx.state, &caller), Err(OcrError::AccessDenied));

        let fresh = Fixture::new();
        assert_eq!(
            process_request_new_round(&fresh.state, &Caller::bare(&OWNER)),
            Err(OcrError::NoConfig)
        );
    }
}
