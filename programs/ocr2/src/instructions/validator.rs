//! SetValidatorConfig instruction

use crate::state::{State, ValidatorConfig};
use ocr2_common::{InstructionReader, OcrError};
use pinocchio::pubkey::Pubkey;

/// Instruction data: validator: [u8; 32] (zeros = disable), flagging_threshold: u32
pub fn parse_validator_config(data: &[u8]) -> Result<ValidatorConfig, OcrError> {
    let mut reader = InstructionReader::new(data);
    let config = ValidatorConfig {
        validator: reader.read_bytes::<32>()?,
        flagging_threshold: reader.read_u32()?,
        _padding: [0; 4],
    };
    reader.finish()?;
    Ok(config)
}

pub fn process_set_validator_config(
    state: &mut State,
    authority: &Pubkey,
    config: ValidatorConfig,
) -> Result<(), OcrError> {
    state.require_owner(authority)?;
    state.validator = config;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Fixture, OWNER};

    #[test]
    fn test_set_and_disable_validator() {
        let mut fx = Fixture::new();
        let mut data = [0x55u8; 32].to_vec();
        data.extend_from_slice(&1_000u32.to_le_bytes());
        let config = parse_validator_config(&data).unwrap();
        process_set_validator_config(&mut fx.state, &OWNER, config).unwrap();
        assert!(fx.state.validator.is_enabled());
        assert_eq!(fx.state.validator.flagging_threshold, 1_000);

        let data = [0u8; 36];
        let config = parse_validator_config(&data).unwrap();
        process_set_validator_config(&mut fx.state, &OWNER, config).unwrap();
        assert!(!fx.state.validator.is_enabled());
    }

    #[test]
    fn test_owner_only() {
        let mut fx = Fixture::new();
        let config = parse_validator_config(&[1u8; 36]).unwrap();
        assert_eq!(
            process_set_validator_config(&mut fx.state, &[2; 32], config),
            Err(OcrError::Unauthorized)
        );
    }
}
