//! SetPayees instruction - register payout token accounts

use crate::constants::MAX_ORACLES;
use crate::state::State;
use arrayvec::ArrayVec;
use ocr2_common::{InstructionReader, OcrError};
use pinocchio::pubkey::Pubkey;

/// Instruction data: n: u8, then n payee keys in committee order
pub fn parse_payees(data: &[u8]) -> Result<ArrayVec<Pubkey, MAX_ORACLES>, OcrError> {
    let mut reader = InstructionReader::new(data);
    let n = reader.read_u8()? as usize;
    if n > MAX_ORACLES {
        return Err(OcrError::TooManyOracles);
    }
    let mut payees = ArrayVec::new();
    for _ in 0..n {
        payees.push(reader.read_bytes::<32>()?);
    }
    reader.finish()?;
    Ok(payees)
}

/// Process set payees instruction
///
/// One payee per committee slot, in order. A payee, once set, can only be
/// re-submitted unchanged; moving it needs a rotation.
pub fn process_set_payees(
    state: &mut State,
    authority: &Pubkey,
    payees: &[Pubkey],
) -> Result<(), OcrError> {
    state.require_owner(authority)?;
    if payees.len() != state.oracles.len() {
        return Err(OcrError::PayeeCountMismatch);
    }
    let conflict = state
        .oracles
        .as_slice()
        .iter()
        .zip(payees)
        .any(|(oracle, payee)| oracle.payee != Pubkey::default() && &oracle.payee != payee);
    if conflict {
        return Err(OcrError::PayeeAlreadySet);
    }
    for (oracle, payee) in state.oracles.as_mut_slice().iter_mut().zip(payees) {
        oracle.payee = *payee;
    }
    Ok(())
}
