//! Transmit instruction - verify and record a signed report
//!
//! Verification order: transmitter membership, config digest, `(epoch, round)`
//! freshness, report shape and answer bounds, then signatures. All checks and
//! payment arithmetic finish before the first write, so a rejected report
//! leaves the feed and its history untouched.

use crate::constants::{
    MAX_ORACLES, REPORT_CONTEXT_LEN, REPORT_LEN, SIGNATURE_LEN, THRESHOLD_MULTIPLIER,
};
use crate::report::{report_hash, Report, ReportContext};
use crate::signature::recover_signer;
use crate::state::{RingBuffer, State, Transmission, ValidatorConfig};
use ocr2_common::{InstructionReader, OcrError, PodI128};
use pinocchio::{msg, pubkey::Pubkey};

/// Transmit arguments
///
/// Instruction data:
/// - validator_bump: u8
/// - report_context: [u8; 96]
/// - report: [u8; 61]
/// - signatures: k x [u8; 65]
#[derive(Debug, Clone, Copy)]
pub struct TransmitArgs<'a> {
    pub validator_bump: u8,
    pub report_context: &'a [u8],
    pub report: &'a [u8],
    pub signatures: &'a [u8],
}

impl<'a> TransmitArgs<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, OcrError> {
        let mut reader = InstructionReader::new(data);
        let validator_bump = reader.read_u8()?;
        let report_context = reader.read_slice(REPORT_CONTEXT_LEN)?;
        let report = reader.read_slice(REPORT_LEN)?;
        let signatures = reader.rest();
        if signatures.len() % SIGNATURE_LEN != 0 {
            return Err(OcrError::InvalidReport);
        }
        Ok(Self { validator_bump, report_context, report, signatures })
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len() / SIGNATURE_LEN
    }
}

/// Deviation notification owed to the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorCall {
    pub validator: Pubkey,
    pub previous_round_id: u32,
    pub previous_answer: i128,
    pub round_id: u32,
    pub answer: i128,
}

/// What an accepted report changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitOutcome {
    pub round_id: u32,
    pub answer: i128,
    pub config_digest: [u8; 32],
    pub epoch: u32,
    pub round: u8,
    pub observations_timestamp: u32,
    pub juels_per_lamport: u64,
    pub transmitter_index: usize,
    pub validator_call: Option<ValidatorCall>,
}

/// Whether moving from `previous` to `current` exceeds `threshold` parts per
/// 100_000 of `previous`. A zero previous answer never flags.
pub fn exceeds_deviation(previous: i128, current: i128, threshold: u32) -> bool {
    if previous == 0 {
        return false;
    }
    let diff = previous.abs_diff(current);
    match diff.checked_mul(THRESHOLD_MULTIPLIER) {
        Some(scaled) => scaled / previous.unsigned_abs() > threshold as u128,
        None => true,
    }
}

fn validator_call(
    validator: &ValidatorConfig,
    previous: Option<&Transmission>,
    round_id: u32,
    answer: i128,
) -> Option<ValidatorCall> {
    if !validator.is_enabled() {
        return None;
    }
    let previous = previous?;
    let previous_answer = previous.answer.get();
    if !exceeds_deviation(previous_answer, answer, validator.flagging_threshold) {
        return None;
    }
    Some(ValidatorCall {
        validator: validator.validator,
        previous_round_id: previous.round_id,
        previous_answer,
        round_id,
        answer,
    })
}

/// Recover the first `quorum` signatures and map them to committee slots
///
/// Returns a bitmask of the slots that signed.
fn verify_signatures(
    state: &State,
    hash: &[u8; 32],
    signatures: &[u8],
    quorum: usize,
) -> Result<u32, OcrError> {
    let mut signed: u32 = 0;
    for signature in signatures.chunks_exact(SIGNATURE_LEN).take(quorum) {
        let signer = recover_signer(hash, signature)?;
        let index = state.oracles.find_signer(&signer).ok_or(OcrError::UnknownSigner)?;
        let bit = 1u32 << index;
        if signed & bit != 0 {
            return Err(OcrError::DuplicateSignature);
        }
        signed |= bit;
    }
    Ok(signed)
}

/// Process transmit instruction
pub fn process_transmit(
    state: &mut State,
    history: &mut RingBuffer,
    transmitter: &Pubkey,
    args: &TransmitArgs,
    slot: u64,
    timestamp: i64,
) -> Result<TransmitOutcome, OcrError> {
    let transmitter_index = state
        .oracles
        .find_transmitter(transmitter)
        .ok_or(OcrError::UnauthorizedTransmitter)?;
    if !state.config.is_configured() {
        return Err(OcrError::NoConfig);
    }

    let context = ReportContext::parse(args.report_context)?;
    if context.config_digest != state.config.latest_config_digest {
        msg!("Error: Report was signed for another config");
        return Err(OcrError::DigestMismatch);
    }
    let latest = ((state.config.epoch as u64) << 8) | state.config.round as u64;
    if context.epoch_and_round() <= latest {
        return Err(OcrError::StaleReport);
    }

    let report = Report::parse(args.report)?;
    let n = state.oracles.len();
    if report.observer_count as usize > report.observers.len()
        || report.observer_indices().iter().any(|i| *i as usize >= n)
    {
        return Err(OcrError::InvalidReport);
    }
    if !state.config.answer_in_range(report.median) {
        return Err(OcrError::AnswerOutOfRange);
    }

    let quorum = state.config.quorum();
    if args.signature_count() < quorum {
        return Err(OcrError::NotEnoughSignatures);
    }
    let hash = report_hash(args.report, args.report_context);
    let signed = verify_signatures(state, &hash, args.signatures, quorum)?;

    // Settle every credit before writing any of them
    let billing = state.config.billing;
    let mut credits = [0u64; MAX_ORACLES];
    for (i, (credit, oracle)) in credits.iter_mut().zip(state.oracles.as_slice()).enumerate() {
        let mut amount = 0u64;
        if signed & (1 << i) != 0 {
            amount = billing.observation_payment as u64;
        }
        if i == transmitter_index {
            amount += billing.transmission_payment as u64;
        }
        *credit = oracle.payment.checked_add(amount).ok_or(OcrError::Overflow)?;
    }

    let round_id = history.next_round_id()?;
    let call = validator_call(&state.validator, history.latest(), round_id, report.median);

    history.push(Transmission {
        answer: PodI128::from(report.median),
        juels_per_lamport: report.juels_per_lamport,
        slot,
        timestamp,
        observations_timestamp: report.observations_timestamp,
        epoch: context.epoch,
        round_id,
        round: context.round,
        observer_count: report.observer_count,
        _padding: [0; 2],
    })?;
    for (oracle, credit) in state.oracles.as_mut_slice().iter_mut().zip(credits) {
        oracle.payment = credit;
    }
    state.config.epoch = context.epoch;
    state.config.round = context.round;

    Ok(TransmitOutcome {
        round_id,
        answer: report.median,
        config_digest: context.config_digest,
        epoch: context.epoch,
        round: context.round,
        observations_timestamp: report.observations_timestamp,
        juels_per_lamport: report.juels_per_lamport,
        transmitter_index,
        validator_call: call,
    })
}

// Exclude test module from BPF builds
#[cfg(all(test, not(target_os = "solana")))]
#[path = "transmit_test.rs"]
mod transmit_test;
