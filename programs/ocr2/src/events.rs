//! Program log events
//!
//! Each event is one `sol_log_data` entry: an 8-byte tag followed by a fixed
//! little-endian body, plus a human-readable log line.

use crate::instructions::{CommitOutcome, RoundRequest, SetConfigOutcome, TransmitOutcome};
use crate::state::{Billing, State};
use ocr2_common::{ByteWriter, OcrError};
use pinocchio::log::sol_log_data;
use pinocchio_log::log;

pub const SET_CONFIG_TAG: [u8; 8] = *b"setcnfg\0";
pub const SET_BILLING_TAG: [u8; 8] = *b"setbill\0";
pub const NEW_TRANSMISSION_TAG: [u8; 8] = *b"newtrans";
pub const ROUND_REQUESTED_TAG: [u8; 8] = *b"rndreq\0\0";
pub const OFFCHAIN_CONFIG_TAG: [u8; 8] = *b"offchcfg";

/// digest, config_count, f, n
pub fn set_config_body(outcome: &SetConfigOutcome, state: &State) -> Result<[u8; 38], OcrError> {
    let mut body = [0u8; 38];
    let mut w = ByteWriter::new(&mut body);
    w.write_bytes(&outcome.config_digest)?;
    w.write_u32(outcome.config_count)?;
    w.write_u8(state.config.f)?;
    w.write_u8(state.oracles.len() as u8)?;
    Ok(body)
}

/// round_id, answer, transmitter index, epoch, round, observations timestamp,
/// juels per lamport, config digest
pub fn new_transmission_body(outcome: &TransmitOutcome) -> Result<[u8; 70], OcrError> {
    let mut body = [0u8; 70];
    let mut w = ByteWriter::new(&mut body);
    w.write_u32(outcome.round_id)?;
    w.write_i128(outcome.answer)?;
    w.write_u8(outcome.transmitter_index as u8)?;
    w.write_u32(outcome.epoch)?;
    w.write_u8(outcome.round)?;
    w.write_u32(outcome.observations_timestamp)?;
    w.write_u64(outcome.juels_per_lamport)?;
    w.write_bytes(&outcome.config_digest)?;
    Ok(body)
}

pub fn emit_set_config(outcome: &SetConfigOutcome, state: &State) -> Result<(), OcrError> {
    let body = set_config_body(outcome, state)?;
    sol_log_data(&[&SET_CONFIG_TAG, &body]);
    log!(
        "SetConfig: config_count={} f={} n={} leftovers_added={}",
        outcome.config_count,
        state.config.f,
        state.oracles.len(),
        outcome.leftovers_added
    );
    Ok(())
}

pub fn emit_set_billing(billing: &Billing) {
    let mut body = [0u8; 8];
    body[..4].copy_from_slice(&billing.observation_payment.to_le_bytes());
    body[4..].copy_from_slice(&billing.transmission_payment.to_le_bytes());
    sol_log_data(&[&SET_BILLING_TAG, &body]);
    log!(
        "SetBilling: observation_payment={} transmission_payment={}",
        billing.observation_payment,
        billing.transmission_payment
    );
}

pub fn emit_new_transmission(outcome: &TransmitOutcome) -> Result<(), OcrError> {
    let body = new_transmission_body(outcome)?;
    sol_log_data(&[&NEW_TRANSMISSION_TAG, &body]);
    log!(
        "NewTransmission: round_id={} epoch={} round={}",
        outcome.round_id,
        outcome.epoch,
        outcome.round
    );
    Ok(())
}

pub fn emit_round_requested(request: &RoundRequest) {
    let mut body = [0u8; 37];
    body[..32].copy_from_slice(&request.config_digest);
    body[32..36].copy_from_slice(&request.epoch.to_le_bytes());
    body[36] = request.round;
    sol_log_data(&[&ROUND_REQUESTED_TAG, &body]);
    log!("RoundRequested: epoch={} round={}", request.epoch, request.round);
}

pub fn emit_offchain_config_committed(outcome: &CommitOutcome) {
    let mut body = [0u8; 17];
    body[..8].copy_from_slice(&outcome.version.to_le_bytes());
    body[8..16].copy_from_slice(&(outcome.len as u64).to_le_bytes());
    body[16] = outcome.digest_changed as u8;
    sol_log_data(&[&OFFCHAIN_CONFIG_TAG, &body]);
    log!("OffchainConfigCommitted: version={} len={}", outcome.version, outcome.len);
}
