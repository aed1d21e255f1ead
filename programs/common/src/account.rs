//! Account validation and zero-copy loading helpers

use crate::error::OcrError;
use bytemuck::Pod;
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey};

/// Require the account to be owned by `program_id`
#[inline]
pub fn validate_owner(account: &AccountInfo, program_id: &Pubkey) -> Result<(), OcrError> {
    if !account.is_owned_by(program_id) {
        msg!("Error: Account not owned by program");
        return Err(OcrError::InvalidAccount);
    }
    Ok(())
}

#[inline]
pub fn validate_writable(account: &AccountInfo) -> Result<(), OcrError> {
    if !account.is_writable() {
        msg!("Error: Account must be writable");
        return Err(OcrError::InvalidAccount);
    }
    Ok(())
}

#[inline]
pub fn validate_signer(account: &AccountInfo) -> Result<(), OcrError> {
    if !account.is_signer() {
        msg!("Error: Account must be signer");
        return Err(OcrError::Unauthorized);
    }
    Ok(())
}

/// Require the account key to match a key recorded in state
#[inline]
pub fn validate_key(account: &AccountInfo, expected: &Pubkey) -> Result<(), OcrError> {
    if account.key() != expected {
        msg!("Error: Unexpected account");
        return Err(OcrError::InvalidAccount);
    }
    Ok(())
}

/// View the leading `size_of::<T>()` bytes as `T`
#[inline]
pub fn load<T: Pod>(data: &[u8]) -> Result<&T, OcrError> {
    let bytes = data
        .get(..core::mem::size_of::<T>())
        .ok_or(OcrError::InvalidAccount)?;
    bytemuck::try_from_bytes(bytes).map_err(|_| OcrError::InvalidAccount)
}

/// Mutable counterpart of [`load`]
#[inline]
pub fn load_mut<T: Pod>(data: &mut [u8]) -> Result<&mut T, OcrError> {
    let bytes = data
        .get_mut(..core::mem::size_of::<T>())
        .ok_or(OcrError::InvalidAccount)?;
    bytemuck::try_from_bytes_mut(bytes).map_err(|_| OcrError::InvalidAccount)
}

/// Split account data into a header record followed by as many `E` records
/// as fit. Trailing bytes that do not form a whole record are ignored.
#[inline]
pub fn load_slice_mut<H: Pod, E: Pod>(data: &mut [u8]) -> Result<(&mut H, &mut [E]), OcrError> {
    let header_len = core::mem::size_of::<H>();
    if data.len() < header_len {
        return Err(OcrError::InvalidAccount);
    }
    let (head, tail) = data.split_at_mut(header_len);
    let count = tail.len() / core::mem::size_of::<E>();
    let body = &mut tail[..count * core::mem::size_of::<E>()];
    let header = bytemuck::try_from_bytes_mut(head).map_err(|_| OcrError::InvalidAccount)?;
    let records = bytemuck::try_cast_slice_mut(body).map_err(|_| OcrError::InvalidAccount)?;
    Ok((header, records))
}
