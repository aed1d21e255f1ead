//! Query instruction - read-only projections for off-chain readers
//!
//! Each scope has a fixed little-endian layout. The projection is built in a
//! local buffer first so an undersized destination is never half-written.

use crate::state::{RingBuffer, State, Transmission};
use ocr2_common::{ByteWriter, InstructionReader, OcrError};

/// digest, config_count, latest_config_slot, f, n, min, max, decimals, description
pub const LATEST_CONFIG_LEN: usize = 32 + 4 + 8 + 1 + 1 + 16 + 16 + 1 + 32;
pub const LINK_AVAILABLE_LEN: usize = 16;
/// round_id, answer, slot, timestamp, observations_timestamp, epoch, round,
/// observer_count, juels_per_lamport
pub const ROUND_DATA_LEN: usize = 4 + 16 + 8 + 8 + 4 + 4 + 1 + 1 + 8;
pub const OWNER_LEN: usize = 32;
pub const MAX_PROJECTION_LEN: usize = LATEST_CONFIG_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    LatestConfig,
    LinkAvailableForPayment,
    LatestRoundData,
    RoundData { round_id: u32 },
    Owner,
}

impl QueryScope {
    /// Instruction data: scope: u8, then round_id: u32 for `RoundData`
    pub fn parse(data: &[u8]) -> Result<Self, OcrError> {
        let mut reader = InstructionReader::new(data);
        let scope = match reader.read_u8()? {
            0 => Self::LatestConfig,
            1 => Self::LinkAvailableForPayment,
            2 => Self::LatestRoundData,
            3 => Self::RoundData { round_id: reader.read_u32()? },
            4 => Self::Owner,
            _ => return Err(OcrError::InvalidScope),
        };
        reader.finish()?;
        Ok(scope)
    }

    pub fn projection_len(&self) -> usize {
        match self {
            Self::LatestConfig => LATEST_CONFIG_LEN,
            Self::LinkAvailableForPayment => LINK_AVAILABLE_LEN,
            Self::LatestRoundData | Self::RoundData { .. } => ROUND_DATA_LEN,
            Self::Owner => OWNER_LEN,
        }
    }
}

fn write_round(w: &mut ByteWriter, t: &Transmission) -> Result<(), OcrError> {
    w.write_u32(t.round_id)?;
    w.write_i128(t.answer.get())?;
    w.write_u64(t.slot)?;
    w.write_i64(t.timestamp)?;
    w.write_u32(t.observations_timestamp)?;
    w.write_u32(t.epoch)?;
    w.write_u8(t.round)?;
    w.write_u8(t.observer_count)?;
    w.write_u64(t.juels_per_lamport)
}

/// Process query instruction
///
/// Writes the projection for `scope` to the front of `out` and returns its
/// length. `vault_balance` is only read by `LinkAvailableForPayment`.
pub fn process_query(
    state: &State,
    history: &RingBuffer,
    vault_balance: u64,
    scope: QueryScope,
    out: &mut [u8],
) -> Result<usize, OcrError> {
    let mut buf = [0u8; MAX_PROJECTION_LEN];
    let mut w = ByteWriter::new(&mut buf);
    match scope {
        QueryScope::LatestConfig => {
            let config = &state.config;
            if !config.is_configured() {
                return Err(OcrError::NoConfig);
            }
            w.write_bytes(&config.latest_config_digest)?;
            w.write_u32(config.config_count)?;
            w.write_u64(config.latest_config_slot)?;
            w.write_u8(config.f)?;
            w.write_u8(state.oracles.len() as u8)?;
            w.write_i128(config.min_answer.get())?;
            w.write_i128(config.max_answer.get())?;
            w.write_u8(config.decimals)?;
            w.write_bytes(&config.description)?;
        }
        QueryScope::LinkAvailableForPayment => {
            w.write_i128(state.link_available_for_payment(vault_balance))?;
        }
        QueryScope::LatestRoundData => {
            if !state.config.is_configured() {
                return Err(OcrError::NoConfig);
            }
            let latest = history.latest().ok_or(OcrError::NoTransmissions)?;
            write_round(&mut w, latest)?;
        }
        QueryScope::RoundData { round_id } => {
            let round = history.get_round(round_id).ok_or(OcrError::NoTransmissions)?;
            write_round(&mut w, round)?;
        }
        QueryScope::Owner => {
            w.write_bytes(&state.config.owner)?;
        }
    }

    let len = w.position();
    let dst = out.get_mut(..len).ok_or(OcrError::BufferTooSmall)?;
    dst.copy_from_slice(&buf[..len]);
    Ok(len)
}
