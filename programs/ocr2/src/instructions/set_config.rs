//! SetConfig instruction - rotate the committee

use crate::constants::MAX_ORACLES;
use crate::digest::config_digest;
use crate::state::{LeftoverPayment, Oracle, SignerKey, State};
use arrayvec::ArrayVec;
use ocr2_common::{InstructionReader, OcrError};
use pinocchio::{msg, pubkey::Pubkey};

/// One incoming committee entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitteeMember {
    pub signer: SignerKey,
    pub transmitter: Pubkey,
}

/// SetConfig arguments
///
/// Instruction data:
/// - f: u8
/// - n: u8
/// - n x (signer [u8; 20], transmitter [u8; 32])
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetConfigArgs {
    pub f: u8,
    pub members: ArrayVec<CommitteeMember, MAX_ORACLES>,
}

impl SetConfigArgs {
    pub fn parse(data: &[u8]) -> Result<Self, OcrError> {
        let mut reader = InstructionReader::new(data);
        let f = reader.read_u8()?;
        let n = reader.read_u8()? as usize;
        if n > MAX_ORACLES {
            return Err(OcrError::TooManyOracles);
        }
        let mut members = ArrayVec::new();
        for _ in 0..n {
            members.push(CommitteeMember {
                signer: SignerKey(reader.read_bytes::<20>()?),
                transmitter: reader.read_bytes::<32>()?,
            });
        }
        reader.finish()?;
        Ok(Self { f, members })
    }
}

/// Outcome of a committee rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetConfigOutcome {
    pub config_digest: [u8; 32],
    pub config_count: u32,
    pub digest_changed: bool,
    /// Unpaid balances moved to the leftover list by this rotation
    pub leftovers_added: usize,
}

fn check_committee(members: &[CommitteeMember], f: u8) -> Result<(), OcrError> {
    if members.len() > MAX_ORACLES {
        return Err(OcrError::TooManyOracles);
    }
    if members.is_empty() || members.len() < 3 * f as usize + 1 {
        return Err(OcrError::InvalidFaultTolerance);
    }
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            if a.signer == b.signer {
                return Err(OcrError::DuplicateSigner);
            }
            if a.transmitter == b.transmitter {
                return Err(OcrError::DuplicateTransmitter);
            }
        }
    }
    Ok(())
}

/// Whether slot `i` keeps the same oracle across the rotation
fn retained(current: &Oracle, members: &[CommitteeMember], i: usize) -> bool {
    members
        .get(i)
        .map_or(false, |m| m.signer == current.signer && m.transmitter == current.transmitter)
}

/// Process set config instruction
///
/// Replaces the committee. A slot that keeps the same signer and transmitter
/// keeps its payee and accrual; every other non-zero accrual moves to the
/// leftover list. The operation fails without mutation if the leftover list
/// cannot take all of them.
pub fn process_set_config(
    state: &mut State,
    feed: &Pubkey,
    authority: &Pubkey,
    args: &SetConfigArgs,
    slot: u64,
) -> Result<SetConfigOutcome, OcrError> {
    state.require_owner(authority)?;
    check_committee(&args.members, args.f)?;

    let members = args.members.as_slice();
    let migrating = state
        .oracles
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(i, o)| o.payment != 0 && !retained(o, members, *i))
        .count();
    if migrating > state.leftover_payments.remaining_capacity() {
        msg!("Error: Leftover payment list is full, pay remaining first");
        return Err(OcrError::LeftoverPaymentsFull);
    }

    for (i, oracle) in state.oracles.as_slice().iter().enumerate() {
        if oracle.payment != 0 && !retained(oracle, members, i) {
            state.leftover_payments.push(LeftoverPayment {
                payee: oracle.payee(),
                amount: oracle.payment,
            })?;
        }
    }

    let mut next: ArrayVec<Oracle, MAX_ORACLES> = ArrayVec::new();
    for (i, member) in members.iter().enumerate() {
        match state.oracles.as_slice().get(i) {
            Some(current) if retained(current, members, i) => next.push(*current),
            _ => next.push(Oracle::new(member.signer, member.transmitter)),
        }
    }
    state.oracles.replace(&next);
    state.config.f = args.f;

    let digest_changed = refresh_config_digest(state, feed, slot)?;
    Ok(SetConfigOutcome {
        config_digest: state.config.latest_config_digest,
        config_count: state.config.config_count,
        digest_changed,
        leftovers_added: migrating,
    })
}

/// Recompute the digest from the committee, `f` and the committed offchain
/// config version. A new digest bumps `config_count` and restarts the
/// `(epoch, round)` sequence. Returns whether the digest changed.
pub fn refresh_config_digest(state: &mut State, feed: &Pubkey, slot: u64) -> Result<bool, OcrError> {
    let digest = config_digest(
        feed,
        state.oracles.as_slice(),
        state.config.f,
        state.offchain_config.version,
    );
    let config = &mut state.config;
    if config.is_configured() && config.latest_config_digest == digest {
        return Ok(false);
    }
    config.config_count = config.config_count.checked_add(1).ok_or(OcrError::Overflow)?;
    config.latest_config_digest = digest;
    config.latest_config_slot = slot;
    config.epoch = 0;
    config.round = 0;
    Ok(true)
}

// Exclude test module from BPF builds
#[cfg(all(test, not(target_os = "solana")))]
#[path = "set_config_test.rs"]
mod set_config_test;
