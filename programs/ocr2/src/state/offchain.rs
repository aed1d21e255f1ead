//! Offchain config blob buffers

use crate::constants::MAX_OFFCHAIN_CONFIG_LEN;
use bytemuck::{Pod, Zeroable};
use ocr2_common::OcrError;

/// Length-prefixed byte buffer tagged with a version
///
/// The feed keeps two: the committed blob bound into the digest, and a
/// pending one assembled across several calls.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct OffchainConfig {
    /// 0 = empty
    pub version: u64,
    pub len: u64,
    pub xs: [u8; MAX_OFFCHAIN_CONFIG_LEN],
}

/// Where the staging protocol currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingState {
    /// Nothing staged, nothing committed yet
    Idle,
    /// A `begin` has been accepted and not yet committed or reset
    Staging { version: u64, len: usize },
    /// Nothing staged; `version` is the last committed blob
    Committed { version: u64 },
}

impl OffchainConfig {
    pub fn len(&self) -> usize {
        (self.len as usize).min(MAX_OFFCHAIN_CONFIG_LEN)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.xs[..self.len()]
    }

    /// Append `chunk`; the buffer is untouched when it would not fit
    pub fn extend(&mut self, chunk: &[u8]) -> Result<(), OcrError> {
        let len = self.len();
        let end = len
            .checked_add(chunk.len())
            .filter(|end| *end <= MAX_OFFCHAIN_CONFIG_LEN)
            .ok_or(OcrError::OffchainConfigOverflow)?;
        self.xs[len..end].copy_from_slice(chunk);
        self.len = end as u64;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.version = 0;
        self.len = 0;
        self.xs.fill(0);
    }
}
