//! Initialize instruction - create an empty-committee feed

use crate::constants::DESCRIPTION_LEN;
use crate::state::{Config, RingBuffer, State, Transmission, TransmissionsHeader};
use bytemuck::Zeroable;
use ocr2_common::{InstructionReader, OcrError};
use pinocchio::pubkey::Pubkey;

/// Initialize arguments
///
/// Instruction data:
/// - vault_nonce: u8
/// - min_answer: i128
/// - max_answer: i128
/// - decimals: u8
/// - description: u32 length + bytes (<= 32)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializeArgs<'a> {
    pub vault_nonce: u8,
    pub min_answer: i128,
    pub max_answer: i128,
    pub decimals: u8,
    pub description: &'a [u8],
}

impl<'a> InitializeArgs<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, OcrError> {
        let mut reader = InstructionReader::new(data);
        let args = Self {
            vault_nonce: reader.read_u8()?,
            min_answer: reader.read_i128()?,
            max_answer: reader.read_i128()?,
            decimals: reader.read_u8()?,
            description: reader.read_vec()?,
        };
        reader.finish()?;
        Ok(args)
    }
}

/// Keys recorded in the new feed
#[derive(Debug, Clone, Copy)]
pub struct InitializeKeys {
    pub transmissions: Pubkey,
    pub owner: Pubkey,
    pub token_mint: Pubkey,
    pub token_vault: Pubkey,
    pub requester_access_controller: Pubkey,
    pub billing_access_controller: Pubkey,
}

/// Process initialize instruction
///
/// Writes a fresh feed record and an empty round history. Both targets must
/// be untouched; nothing is written unless every check passes.
pub fn process_initialize(
    feed: &Pubkey,
    state: &mut State,
    history_header: &mut TransmissionsHeader,
    history_records: &mut [Transmission],
    keys: &InitializeKeys,
    args: &InitializeArgs,
) -> Result<(), OcrError> {
    if bytemuck::bytes_of(state).iter().any(|b| *b != 0) || history_header.magic != 0 {
        return Err(OcrError::AlreadyInitialized);
    }
    if args.min_answer > args.max_answer {
        return Err(OcrError::InvalidInput);
    }
    if args.description.len() > DESCRIPTION_LEN {
        return Err(OcrError::DescriptionTooLong);
    }

    RingBuffer::initialize(history_header, history_records, *feed)?;

    let mut config = Config::zeroed();
    config.owner = keys.owner;
    config.token_mint = keys.token_mint;
    config.token_vault = keys.token_vault;
    config.requester_access_controller = keys.requester_access_controller;
    config.billing_access_controller = keys.billing_access_controller;
    config.min_answer = args.min_answer.into();
    config.max_answer = args.max_answer.into();
    config.decimals = args.decimals;
    config.description[..args.description.len()].copy_from_slice(args.description);

    state.initialize_in_place(keys.transmissions, args.vault_nonce, config);
    Ok(())
}
