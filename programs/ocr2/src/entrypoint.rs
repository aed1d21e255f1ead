//! Feed program entrypoint

use pinocchio::{
    account_info::AccountInfo,
    entrypoint,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvars::{clock::Clock, Sysvar},
    ProgramResult,
};
use pinocchio_token::state::TokenAccount;

use crate::access::Caller;
use crate::constants::MAX_ORACLES;
use crate::cpi::{require_token_account, Validator, Vault};
use crate::events;
use crate::instructions::*;
use crate::pda::{verify_validator_authority, verify_vault_authority};
use crate::state::{RingBuffer, State, Transmission, TransmissionsHeader};
use arrayvec::ArrayVec;
use ocr2_common::{
    load_mut, load_slice_mut, validate_key, validate_owner, validate_signer, validate_writable,
    InstructionReader, OcrError,
};

entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let Some((&discriminator, data)) = instruction_data.split_first() else {
        msg!("Error: Instruction data is empty");
        return Err(OcrError::InvalidInstruction.into());
    };
    let instruction = Ocr2Instruction::try_from(discriminator).map_err(|e| {
        msg!("Error: Unknown instruction");
        ProgramError::from(e)
    })?;

    match instruction {
        Ocr2Instruction::Initialize => {
            msg!("Instruction: Initialize");
            process_initialize_inner(program_id, accounts, data)
        }
        Ocr2Instruction::BeginOffchainConfig => {
            msg!("Instruction: BeginOffchainConfig");
            process_begin_offchain_config_inner(program_id, accounts, data)
        }
        Ocr2Instruction::WriteOffchainConfig => {
            msg!("Instruction: WriteOffchainConfig");
            process_write_offchain_config_inner(program_id, accounts, data)
        }
        Ocr2Instruction::CommitOffchainConfig => {
            msg!("Instruction: CommitOffchainConfig");
            process_commit_offchain_config_inner(program_id, accounts)
        }
        Ocr2Instruction::ResetPendingOffchainConfig => {
            msg!("Instruction: ResetPendingOffchainConfig");
            process_reset_pending_offchain_config_inner(program_id, accounts)
        }
        Ocr2Instruction::SetConfig => {
            msg!("Instruction: SetConfig");
            process_set_config_inner(program_id, accounts, data)
        }
        Ocr2Instruction::SetPayees => {
            msg!("Instruction: SetPayees");
            process_set_payees_inner(program_id, accounts, data)
        }
        Ocr2Instruction::SetBilling => {
            msg!("Instruction: SetBilling");
            process_set_billing_inner(program_id, accounts, data)
        }
        Ocr2Instruction::SetValidatorConfig => {
            msg!("Instruction: SetValidatorConfig");
            process_set_validator_config_inner(program_id, accounts, data)
        }
        Ocr2Instruction::Transmit => {
            msg!("Instruction: Transmit");
            process_transmit_inner(program_id, accounts, data)
        }
        Ocr2Instruction::WithdrawFunds => {
            msg!("Instruction: WithdrawFunds");
            process_withdraw_funds_inner(program_id, accounts, data)
        }
        Ocr2Instruction::PayRemaining => {
            msg!("Instruction: PayRemaining");
            process_payout_inner(program_id, accounts, Payout::Remaining)
        }
        Ocr2Instruction::PayOracles => {
            msg!("Instruction: PayOracles");
            process_payout_inner(program_id, accounts, Payout::Oracles)
        }
        Ocr2Instruction::Query => {
            msg!("Instruction: Query");
            process_query_inner(program_id, accounts, data)
        }
        Ocr2Instruction::TransferOwnership => {
            msg!("Instruction: TransferOwnership");
            process_transfer_ownership_inner(program_id, accounts, data)
        }
        Ocr2Instruction::AcceptOwnership => {
            msg!("Instruction: AcceptOwnership");
            process_accept_ownership_inner(program_id, accounts)
        }
        Ocr2Instruction::RequestNewRound => {
            msg!("Instruction: RequestNewRound");
            process_request_new_round_inner(program_id, accounts)
        }
    }
}

fn require_accounts(accounts: &[AccountInfo], n: usize) -> Result<(), ProgramError> {
    if accounts.len() < n {
        msg!("Error: Not enough accounts");
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    Ok(())
}

/// Owned, writable, initialized feed
fn feed_mut<'a>(program_id: &Pubkey, feed: &AccountInfo, data: &'a mut [u8]) -> Result<&'a mut State, OcrError> {
    validate_owner(feed, program_id)?;
    validate_writable(feed)?;
    let state = load_mut::<State>(data)?;
    state.validate()?;
    Ok(state)
}

/// Round history bound to `state`
fn history_mut<'a>(
    program_id: &Pubkey,
    state: &State,
    feed: &Pubkey,
    account: &AccountInfo,
    data: &'a mut [u8],
) -> Result<RingBuffer<'a>, OcrError> {
    validate_owner(account, program_id)?;
    validate_key(account, &state.transmissions)?;
    let (header, records) = load_slice_mut::<TransmissionsHeader, Transmission>(data)?;
    if &header.feed != feed {
        return Err(OcrError::InvalidAccount);
    }
    RingBuffer::new(header, records)
}

/// Initialize a feed
///
/// Expected accounts:
/// 0. `[writable]` Feed state (zeroed, program-owned)
/// 1. `[writable]` Transmissions (zeroed, program-owned)
/// 2. `[signer]` Owner
/// 3. `[]` Token mint
/// 4. `[]` Token vault (owned by the vault authority)
/// 5. `[]` Requester access controller
/// 6. `[]` Billing access controller
fn process_initialize_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 7)?;
    let [feed, transmissions, owner, mint, vault, requester_ac, billing_ac, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    validate_owner(feed, program_id)?;
    validate_writable(feed)?;
    validate_owner(transmissions, program_id)?;
    validate_writable(transmissions)?;
    validate_signer(owner)?;

    let args = InitializeArgs::parse(data)?;

    {
        let token = TokenAccount::from_account_info(vault)?;
        if token.mint() != mint.key() {
            msg!("Error: Vault holds a different mint");
            return Err(OcrError::TokenAccountMismatch.into());
        }
        verify_vault_authority(program_id, feed.key(), args.vault_nonce, token.owner())?;
    }

    let keys = InitializeKeys {
        transmissions: *transmissions.key(),
        owner: *owner.key(),
        token_mint: *mint.key(),
        token_vault: *vault.key(),
        requester_access_controller: *requester_ac.key(),
        billing_access_controller: *billing_ac.key(),
    };

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = load_mut::<State>(&mut feed_data)?;
    let mut history_data = transmissions.try_borrow_mut_data()?;
    let (header, records) = load_slice_mut::<TransmissionsHeader, Transmission>(&mut history_data)?;

    process_initialize(feed.key(), state, header, records, &keys, &args)?;

    msg!("Feed initialized successfully");
    Ok(())
}

/// Expected accounts: 0. `[writable]` Feed, 1. `[signer]` Owner
///
/// Data: version: u64
fn process_begin_offchain_config_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let (feed, authority) = (&accounts[0], &accounts[1]);
    validate_signer(authority)?;

    let mut reader = InstructionReader::new(data);
    let version = reader.read_u64()?;
    reader.finish()?;

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    process_begin_offchain_config(state, authority.key(), version)?;
    Ok(())
}

/// Expected accounts: 0. `[writable]` Feed, 1. `[signer]` Owner
///
/// Data: chunk as u32 length + bytes
fn process_write_offchain_config_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let (feed, authority) = (&accounts[0], &accounts[1]);
    validate_signer(authority)?;

    let mut reader = InstructionReader::new(data);
    let chunk = reader.read_vec()?;
    reader.finish()?;

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    let len = process_write_offchain_config(state, authority.key(), chunk)?;
    pinocchio_log::log!("Staged offchain config length: {}", len);
    Ok(())
}

/// Expected accounts: 0. `[writable]` Feed, 1. `[signer]` Owner
fn process_commit_offchain_config_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let (feed, authority) = (&accounts[0], &accounts[1]);
    validate_signer(authority)?;

    let slot = Clock::get()?.slot;
    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    let outcome = process_commit_offchain_config(state, feed.key(), authority.key(), slot)?;
    events::emit_offchain_config_committed(&outcome);
    Ok(())
}

/// Expected accounts: 0. `[writable]` Feed, 1. `[signer]` Owner
fn process_reset_pending_offchain_config_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let (feed, authority) = (&accounts[0], &accounts[1]);
    validate_signer(authority)?;

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    process_reset_pending_offchain_config(state, authority.key())?;
    Ok(())
}

/// Expected accounts: 0. `[writable]` Feed, 1. `[signer]` Owner
///
/// Data: f: u8, n: u8, n x (signer [u8; 20], transmitter [u8; 32])
fn process_set_config_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let (feed, authority) = (&accounts[0], &accounts[1]);
    validate_signer(authority)?;

    let args = SetConfigArgs::parse(data)?;
    let slot = Clock::get()?.slot;

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    let outcome = process_set_config(state, feed.key(), authority.key(), &args, slot)?;
    events::emit_set_config(&outcome, state)?;
    Ok(())
}

/// Expected accounts: 0. `[writable]` Feed, 1. `[signer]` Owner
///
/// Data: n: u8, n x payee [u8; 32]
fn process_set_payees_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let (feed, authority) = (&accounts[0], &accounts[1]);
    validate_signer(authority)?;

    let payees = parse_payees(data)?;
    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    process_set_payees(state, authority.key(), &payees)?;
    Ok(())
}

/// Expected accounts:
/// 0. `[writable]` Feed
/// 1. `[signer]` Owner or billing access member
/// 2. `[]` Billing access controller
///
/// Data: observation_payment: u32, transmission_payment: u32
fn process_set_billing_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 3)?;
    let (feed, authority, controller) = (&accounts[0], &accounts[1], &accounts[2]);
    validate_signer(authority)?;

    let billing = parse_billing(data)?;
    let controller_data = controller.try_borrow_data()?;
    let caller = Caller {
        authority: authority.key(),
        controller_key: controller.key(),
        controller_data: &controller_data,
    };

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    process_set_billing(state, &caller, billing)?;
    events::emit_set_billing(&billing);
    Ok(())
}

/// Expected accounts: 0. `[writable]` Feed, 1. `[signer]` Owner
///
/// Data: validator: [u8; 32], flagging_threshold: u32
fn process_set_validator_config_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let (feed, authority) = (&accounts[0], &accounts[1]);
    validate_signer(authority)?;

    let config = parse_validator_config(data)?;
    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    process_set_validator_config(state, authority.key(), config)?;
    Ok(())
}

/// Submit a signed report
///
/// Expected accounts:
/// 0. `[writable]` Feed
/// 1. `[signer]` Transmitter
/// 2. `[writable]` Transmissions
/// 3. `[]` Validator program
/// 4. `[writable]` Validator state
/// 5. `[]` Validator authority (PDA)
/// 6. `[]` Validator access controller
///
/// Accounts 3..7 are only used when the round must be flagged.
fn process_transmit_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 3)?;
    let (feed, transmitter, transmissions) = (&accounts[0], &accounts[1], &accounts[2]);
    validate_signer(transmitter)?;
    validate_writable(transmissions)?;

    let args = TransmitArgs::parse(data)?;
    let clock = Clock::get()?;

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    let mut history_data = transmissions.try_borrow_mut_data()?;
    let mut history = history_mut(program_id, state, feed.key(), transmissions, &mut history_data)?;

    let outcome = process_transmit(
        state,
        &mut history,
        transmitter.key(),
        &args,
        clock.slot,
        clock.unix_timestamp,
    )?;
    events::emit_new_transmission(&outcome)?;

    if let Some(call) = outcome.validator_call {
        require_accounts(accounts, 7)?;
        let validator = Validator {
            program: &accounts[3],
            state: &accounts[4],
            authority: &accounts[5],
            access_controller: &accounts[6],
        };
        verify_validator_authority(program_id, feed.key(), args.validator_bump, validator.authority.key())?;
        validator.validate(feed.key(), args.validator_bump, &call)?;
    }
    Ok(())
}

/// Vault accounts shared by the payout instructions, checked against the feed
fn vault_for<'a>(
    program_id: &Pubkey,
    state: &State,
    feed: &'a AccountInfo,
    vault: &'a AccountInfo,
    authority: &'a AccountInfo,
    token_program: &AccountInfo,
) -> Result<Vault<'a>, ProgramError> {
    validate_key(vault, &state.config.token_vault)?;
    validate_writable(vault)?;
    validate_key(token_program, &pinocchio_token::ID)?;
    verify_vault_authority(program_id, feed.key(), state.vault_nonce, authority.key())?;
    Ok(Vault { feed: feed.key(), nonce: state.vault_nonce, vault, authority })
}

/// Withdraw funds not owed to oracles
///
/// Expected accounts:
/// 0. `[]` Feed
/// 1. `[signer]` Owner or billing access member
/// 2. `[]` Billing access controller
/// 3. `[writable]` Token vault
/// 4. `[]` Vault authority (PDA)
/// 5. `[writable]` Recipient token account
/// 6. `[]` Token program
///
/// Data: amount: u64
fn process_withdraw_funds_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 7)?;
    let [feed, authority, controller, vault, vault_authority, recipient, token_program, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    validate_signer(authority)?;
    validate_owner(feed, program_id)?;

    let mut reader = InstructionReader::new(data);
    let amount = reader.read_u64()?;
    reader.finish()?;

    let feed_data = feed.try_borrow_data()?;
    let state = ocr2_common::load::<State>(&feed_data)?;
    state.validate()?;
    require_token_account(recipient, &state.config.token_mint)?;
    let vault = vault_for(program_id, state, feed, vault, vault_authority, token_program)?;
    let balance = vault.balance()?;

    let controller_data = controller.try_borrow_data()?;
    let caller = Caller {
        authority: authority.key(),
        controller_key: controller.key(),
        controller_data: &controller_data,
    };
    process_withdraw_funds(state, &caller, recipient.key(), amount, balance, |_, amount| {
        vault.transfer(recipient, amount)
    })?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Payout {
    Remaining,
    Oracles,
}

/// Token account of the feed mint offered as a payout destination
fn payout_account(account: &AccountInfo, mint: &Pubkey) -> Result<PayoutAccount, ProgramError> {
    validate_writable(account)?;
    let token = TokenAccount::from_account_info(account)?;
    if token.mint() != mint {
        msg!("Error: Payout account holds a different mint");
        return Err(OcrError::TokenAccountMismatch.into());
    }
    Ok(PayoutAccount { key: *account.key(), owner: *token.owner() })
}

/// Pay leftover balances, or current committee accruals
///
/// Expected accounts:
/// 0. `[writable]` Feed
/// 1. `[signer]` Owner or billing access member
/// 2. `[]` Billing access controller
/// 3. `[writable]` Token vault
/// 4. `[]` Vault authority (PDA)
/// 5. `[]` Token program
/// 6.. `[writable]` Payout token accounts, in ledger order. Each is either
///     the registered payee or a token account owned by the payee wallet.
fn process_payout_inner(program_id: &Pubkey, accounts: &[AccountInfo], payout: Payout) -> ProgramResult {
    require_accounts(accounts, 6)?;
    let [feed, authority, controller, vault, vault_authority, token_program, payee_accounts @ ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    validate_signer(authority)?;
    if payee_accounts.len() > MAX_ORACLES {
        return Err(OcrError::TooManyOracles.into());
    }

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;

    let mut payees: ArrayVec<PayoutAccount, MAX_ORACLES> = ArrayVec::new();
    for account in payee_accounts {
        payees.push(payout_account(account, &state.config.token_mint)?);
    }
    let vault = vault_for(program_id, state, feed, vault, vault_authority, token_program)?;

    let controller_data = controller.try_borrow_data()?;
    let caller = Caller {
        authority: authority.key(),
        controller_key: controller.key(),
        controller_data: &controller_data,
    };
    let transfer = |to: &Pubkey, amount: u64| -> ProgramResult {
        let account = payee_accounts
            .iter()
            .find(|a| a.key() == to)
            .ok_or(ProgramError::from(OcrError::PayeeMismatch))?;
        vault.transfer(account, amount)
    };
    let total = match payout {
        Payout::Remaining => process_pay_remaining(state, &caller, &payees, transfer)?,
        Payout::Oracles => process_pay_oracles(state, &caller, &payees, transfer)?,
    };
    pinocchio_log::log!("Paid out: {}", total);
    Ok(())
}

/// Fresh buffer the caller created for this query
fn require_scratch(
    program_id: &Pubkey,
    scratch: &AccountInfo,
    feed: &AccountInfo,
    transmissions: &AccountInfo,
) -> Result<(), ProgramError> {
    validate_owner(scratch, program_id)?;
    validate_signer(scratch)?;
    validate_writable(scratch)?;
    if scratch.key() == feed.key() || scratch.key() == transmissions.key() {
        msg!("Error: Query buffer aliases the feed");
        return Err(OcrError::InvalidAccount.into());
    }
    let data = scratch.try_borrow_data()?;
    if let Some(magic) = data.get(..8) {
        if magic == State::MAGIC.as_slice() || magic == TransmissionsHeader::MAGIC.as_slice() {
            msg!("Error: Query buffer holds feed data");
            return Err(OcrError::InvalidAccount.into());
        }
    }
    Ok(())
}

/// Write a read-only projection into a scratch account
///
/// Expected accounts:
/// 0. `[]` Feed
/// 1. `[]` Transmissions
/// 2. `[writable, signer]` Query buffer (program-owned, created in the same
///    transaction)
/// 3. `[]` Token vault, only for `LinkAvailableForPayment`
///
/// Data: scope: u8 (+ round_id: u32 for scope 3)
fn process_query_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 3)?;
    let [feed, transmissions, scratch, rest @ ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    validate_owner(feed, program_id)?;
    require_scratch(program_id, scratch, feed, transmissions)?;

    let scope = QueryScope::parse(data)?;

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = load_mut::<State>(&mut feed_data)?;
    state.validate()?;
    let balance = match scope {
        QueryScope::LinkAvailableForPayment => {
            let vault = rest.first().ok_or(ProgramError::NotEnoughAccountKeys)?;
            validate_key(vault, &state.config.token_vault)?;
            TokenAccount::from_account_info(vault)?.amount()
        }
        _ => 0,
    };

    let mut history_data = transmissions.try_borrow_mut_data()?;
    let history = history_mut(program_id, state, feed.key(), transmissions, &mut history_data)?;

    let mut out = scratch.try_borrow_mut_data()?;
    let len = process_query(state, &history, balance, scope, &mut out)?;
    pinocchio_log::log!("Query wrote {} bytes", len);
    Ok(())
}

/// Expected accounts: 0. `[writable]` Feed, 1. `[signer]` Owner
///
/// Data: proposed owner [u8; 32]
fn process_transfer_ownership_inner(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let (feed, authority) = (&accounts[0], &accounts[1]);
    validate_signer(authority)?;

    let mut reader = InstructionReader::new(data);
    let proposed = reader.read_bytes::<32>()?;
    reader.finish()?;

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    process_transfer_ownership(state, authority.key(), &proposed)?;
    Ok(())
}

/// Expected accounts: 0. `[writable]` Feed, 1. `[signer]` Proposed owner
fn process_accept_ownership_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 2)?;
    let (feed, authority) = (&accounts[0], &accounts[1]);
    validate_signer(authority)?;

    let mut feed_data = feed.try_borrow_mut_data()?;
    let state = feed_mut(program_id, feed, &mut feed_data)?;
    process_accept_ownership(state, authority.key())?;
    msg!("Ownership accepted");
    Ok(())
}

/// Expected accounts:
/// 0. `[]` Feed
/// 1. `[signer]` Owner or requester access member
/// 2. `[]` Requester access controller
fn process_request_new_round_inner(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    require_accounts(accounts, 3)?;
    let (feed, authority, controller) = (&accounts[0], &accounts[1], &accounts[2]);
    validate_signer(authority)?;
    validate_owner(feed, program_id)?;

    let feed_data = feed.try_borrow_data()?;
    let state = ocr2_common::load::<State>(&feed_data)?;
    state.validate()?;

    let controller_data = controller.try_borrow_data()?;
    let caller = Caller {
        authority: authority.key(),
        controller_key: controller.key(),
        controller_data: &controller_data,
    };
    let request = process_request_new_round(state, &caller)?;
    events::emit_round_requested(&request);
    Ok(())
}

// Exclude test module from BPF builds
#[cfg(all(test, not(target_os = "solana")))]
#[path = "entrypoint_test.rs"]
mod entrypoint_test;
