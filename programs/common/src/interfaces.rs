//! Binary boundary of the external collaborator programs
//!
//! The feed program never links against the access-controller or validator
//! programs. It reads the access controller's account directly and builds the
//! validator's instruction bytes by hand, so both layouts are pinned here.

use crate::error::OcrError;
use bytemuck::{Pod, Zeroable};
use pinocchio::pubkey::Pubkey;

/// Access list capacity of an access-controller account
pub const MAX_ACCESS_LIST: usize = 64;

/// Account layout of the access-controller program
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct AccessController {
    /// Account discriminator written by the controller program
    pub discriminator: [u8; 8],
    pub owner: Pubkey,
    pub proposed_owner: Pubkey,
    pub access_list: [Pubkey; MAX_ACCESS_LIST],
    pub access_list_len: u64,
}

impl AccessController {
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// Members currently on the list
    pub fn members(&self) -> &[Pubkey] {
        let len = (self.access_list_len as usize).min(MAX_ACCESS_LIST);
        &self.access_list[..len]
    }

    pub fn has_access(&self, address: &Pubkey) -> bool {
        self.members().iter().any(|member| member == address)
    }
}

/// Check `address` against raw access-controller account data
pub fn has_access(controller_data: &[u8], address: &Pubkey) -> Result<bool, OcrError> {
    let controller = crate::account::load::<AccessController>(controller_data)?;
    Ok(controller.has_access(address))
}

/// Instruction tag of the validator's `validate` entry
pub const VALIDATE_TAG: u8 = 0;

/// tag + previous round id + previous answer + round id + answer
pub const VALIDATE_DATA_LEN: usize = 1 + 4 + 16 + 4 + 16;

/// Encode a `validate` call for the deviation-flagging validator
pub fn encode_validate(
    previous_round_id: u32,
    previous_answer: i128,
    round_id: u32,
    answer: i128,
) -> [u8; VALIDATE_DATA_LEN] {
    let mut data = [0u8; VALIDATE_DATA_LEN];
    data[0] = VALIDATE_TAG;
    data[1..5].copy_from_slice(&previous_round_id.to_le_bytes());
    data[5..21].copy_from_slice(&previous_answer.to_le_bytes());
    data[21..25].copy_from_slice(&round_id.to_le_bytes());
    data[25..41].copy_from_slice(&answer.to_le_bytes());
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_with(members: &[Pubkey]) -> Box<AccessController> {
        let mut controller: Box<AccessController> = Box::new(Zeroable::zeroed());
        controller.access_list[..members.len()].copy_from_slice(members);
        controller.access_list_len = members.len() as u64;
        controller
    }

    #[test]
    fn test_has_access() {
        let allowed = [1u8; 32];
        let controller = controller_with(&[[9u8; 32], allowed]);
        assert!(controller.has_access(&allowed));
        assert!(!controller.has_access(&[2u8; 32]));
    }

    #[test]
    fn test_has_access_ignores_entries_past_len() {
        let mut controller = controller_with(&[[1u8; 32]]);
        controller.access_list[5] = [5u8; 32];
        assert!(!controller.has_access(&[5u8; 32]));
    }

    #[test]
    fn test_has_access_from_raw_data() {
        let controller = controller_with(&[[3u8; 32]]);
        let bytes = bytemuck::bytes_of(controller.as_ref());
        assert_eq!(has_access(bytes, &[3u8; 32]), Ok(true));
        assert_eq!(has_access(&bytes[..10], &[3u8; 32]), Err(OcrError::InvalidAccount));
    }

    #[test]
    fn test_encode_validate() {
        let data = encode_validate(4, -1, 5, 722);
        assert_eq!(data[0], VALIDATE_TAG);
        assert_eq!(u32::from_le_bytes(data[1..5].try_into().unwrap()), 4);
        assert_eq!(i128::from_le_bytes(data[5..21].try_into().unwrap()), -1);
        assert_eq!(u32::from_le_bytes(data[21..25].try_into().unwrap()), 5);
        assert_eq!(i128::from_le_bytes(data[25..41].try_into().unwrap()), 722);
    }
}
