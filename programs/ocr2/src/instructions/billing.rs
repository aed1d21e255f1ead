//! Billing instructions - payment rates, withdrawals and payouts
//!
//! Token movement goes through the `transfer` callback so the ledger logic
//! runs the same with a real CPI or a test double. Balances are only cleared
//! once every transfer in the call has succeeded.

use crate::access::{require_billing_access, Caller};
use crate::constants::MAX_ORACLES;
use crate::state::{Billing, State};
use arrayvec::ArrayVec;
use ocr2_common::{InstructionReader, OcrError};
use pinocchio::{msg, pubkey::Pubkey};

/// Instruction data: observation_payment: u32, transmission_payment: u32
pub fn parse_billing(data: &[u8]) -> Result<Billing, OcrError> {
    let mut reader = InstructionReader::new(data);
    let billing = Billing {
        observation_payment: reader.read_u32()?,
        transmission_payment: reader.read_u32()?,
    };
    reader.finish()?;
    Ok(billing)
}

/// A token account offered as a payout destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutAccount {
    pub key: Pubkey,
    /// Token-level owner of the account
    pub owner: Pubkey,
}

impl PayoutAccount {
    /// `payee` is either this token account or the wallet that owns it
    pub fn pays(&self, payee: &Pubkey) -> bool {
        &self.key == payee || &self.owner == payee
    }
}

/// Process set billing instruction
///
/// New rates apply to transmissions accepted after this call.
pub fn process_set_billing(
    state: &mut State,
    caller: &Caller,
    billing: Billing,
) -> Result<(), OcrError> {
    require_billing_access(state, caller)?;
    state.config.billing = billing;
    Ok(())
}

/// Process withdraw funds instruction
///
/// Only the part of the vault not owed to oracles can leave.
pub fn process_withdraw_funds<E: From<OcrError>>(
    state: &State,
    caller: &Caller,
    recipient: &Pubkey,
    amount: u64,
    vault_balance: u64,
    mut transfer: impl FnMut(&Pubkey, u64) -> Result<(), E>,
) -> Result<(), E> {
    require_billing_access(state, caller)?;
    if amount as i128 > state.link_available_for_payment(vault_balance) {
        msg!("Error: Withdrawal exceeds funds not owed to oracles");
        return Err(OcrError::InsufficientFunds.into());
    }
    transfer(recipient, amount)
}

/// Process pay remaining instruction
///
/// `accounts` must pay the leftover entries' payees, in order, one each.
/// Returns the total paid.
pub fn process_pay_remaining<E: From<OcrError>>(
    state: &mut State,
    caller: &Caller,
    accounts: &[PayoutAccount],
    mut transfer: impl FnMut(&Pubkey, u64) -> Result<(), E>,
) -> Result<u128, E> {
    require_billing_access(state, caller)?;
    let leftovers = state.leftover_payments.as_slice();
    if accounts.len() != leftovers.len()
        || leftovers.iter().zip(accounts).any(|(entry, account)| !account.pays(&entry.payee))
    {
        return Err(OcrError::PayeeMismatch.into());
    }

    for (entry, account) in leftovers.iter().zip(accounts) {
        transfer(&account.key, entry.amount)?;
    }
    let total = state.leftover_payments.total();
    state.leftover_payments.clear();
    Ok(total)
}

/// Process pay oracles instruction
///
/// Pays every committee slot its accrual. `accounts` must pay each slot's
/// payee (or transmitter when no payee is set), in committee order.
pub fn process_pay_oracles<E: From<OcrError>>(
    state: &mut State,
    caller: &Caller,
    accounts: &[PayoutAccount],
    mut transfer: impl FnMut(&Pubkey, u64) -> Result<(), E>,
) -> Result<u128, E> {
    require_billing_access(state, caller)?;
    let oracles = state.oracles.as_slice();
    if accounts.len() != oracles.len()
        || oracles.iter().zip(accounts).any(|(oracle, account)| !account.pays(&oracle.payee()))
    {
        return Err(OcrError::PayeeMismatch.into());
    }

    let mut paid: ArrayVec<usize, MAX_ORACLES> = ArrayVec::new();
    for (i, oracle) in oracles.iter().enumerate() {
        if oracle.payment == 0 {
            continue;
        }
        transfer(&accounts[i].key, oracle.payment)?;
        paid.push(i);
    }

    let mut total = 0u128;
    for i in paid {
        let oracle = &mut state.oracles.xs[i];
        total += oracle.payment as u128;
        oracle.payment = 0;
    }
    Ok(total)
}

// Exclude test module from BPF builds
#[cfg(all(test, not(target_os = "solana")))]
#[path = "billing_test.rs"]
mod billing_test;
