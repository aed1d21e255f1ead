//! Signed report wire format
//!
//! ```text
//! report_context (96 bytes):
//!   config_digest: [u8; 32]
//!   padding: [u8; 27]
//!   epoch: u32 (BE)
//!   round: u8
//!   extra_hash: [u8; 32]
//!
//! report (61 bytes):
//!   observations_timestamp: u32 (BE)
//!   observer_count: u8
//!   observers: [u8; 32]        - committee indices, first observer_count used
//!   median: i128 (BE)
//!   juels_per_lamport: u64 (BE)
//! ```
//!
//! Oracles sign `sha256(report || report_context)`.

use crate::constants::{REPORT_CONTEXT_LEN, REPORT_LEN};
use ocr2_common::{read_bytes, read_i128_be, read_u32_be, read_u64_be, read_u8, OcrError};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContext {
    pub config_digest: [u8; 32],
    pub epoch: u32,
    pub round: u8,
    pub extra_hash: [u8; 32],
}

impl ReportContext {
    pub fn parse(data: &[u8]) -> Result<Self, OcrError> {
        if data.len() != REPORT_CONTEXT_LEN {
            return Err(OcrError::InvalidReport);
        }
        Ok(Self {
            config_digest: read_bytes(data, 0)?,
            epoch: read_u32_be(data, 59)?,
            round: read_u8(data, 63)?,
            extra_hash: read_bytes(data, 64)?,
        })
    }

    /// Epoch and round as one ordered key
    pub fn epoch_and_round(&self) -> u64 {
        ((self.epoch as u64) << 8) | self.round as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub observations_timestamp: u32,
    pub observer_count: u8,
    pub observers: [u8; 32],
    pub median: i128,
    pub juels_per_lamport: u64,
}

impl Report {
    pub fn parse(data: &[u8]) -> Result<Self, OcrError> {
        if data.len() != REPORT_LEN {
            return Err(OcrError::InvalidReport);
        }
        Ok(Self {
            observations_timestamp: read_u32_be(data, 0)?,
            observer_count: read_u8(data, 4)?,
            observers: read_bytes(data, 5)?,
            median: read_i128_be(data, 37)?,
            juels_per_lamport: read_u64_be(data, 53)?,
        })
    }

    /// Committee indices of the oracles whose observations went into the median
    pub fn observer_indices(&self) -> &[u8] {
        let count = (self.observer_count as usize).min(self.observers.len());
        &self.observers[..count]
    }
}

/// Message every oracle signs for a report
pub fn report_hash(report: &[u8], report_context: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(report);
    hasher.update(report_context);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    hash
}

#[cfg(test)]
pub(crate) mod encode {
    //! Builders for report bytes, matching what an oracle client produces

    use super::*;

    pub fn context(config_digest: &[u8; 32], epoch: u32, round: u8) -> [u8; REPORT_CONTEXT_LEN] {
        let mut out = [0u8; REPORT_CONTEXT_LEN];
        out[..32].copy_from_slice(config_digest);
        out[59..63].copy_from_slice(&epoch.to_be_bytes());
        out[63] = round;
        out
    }

    pub fn report(
        observations_timestamp: u32,
        observers: &[u8],
        median: i128,
        juels_per_lamport: u64,
    ) -> [u8; REPORT_LEN] {
        let mut out = [0u8; REPORT_LEN];
        out[..4].copy_from_slice(&observations_timestamp.to_be_bytes());
        out[4] = observers.len() as u8;
        out[5..5 + observers.len()].copy_from_slice(observers);
        out[37..53].copy_from_slice(&median.to_be_bytes());
        out[53..61].copy_from_slice(&juels_per_lamport.to_be_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context() {
        let digest = [0xAB; 32];
        let raw = encode::context(&digest, 1, 1);
        let ctx = ReportContext::parse(&raw).unwrap();
        assert_eq!(ctx.config_digest, digest);
        assert_eq!(ctx.epoch, 1);
        assert_eq!(ctx.round, 1);
        assert_eq!(ctx.extra_hash, [0; 32]);
        assert!(ReportContext::parse(&raw[..95]).is_err());
    }

    #[test]
    fn test_parse_client_report_bytes() {
        // Byte-for-byte what the signing client sends for a median of 722
        let mut raw = vec![97, 91, 43, 83, 7, 0, 1, 2, 3];
        raw.extend_from_slice(&[0; 28]);
        raw.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 210]);
        raw.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 2]);

        let report = Report::parse(&raw).unwrap();
        assert_eq!(report.observations_timestamp, 0x615B2B53);
        assert_eq!(report.observer_count, 7);
        assert_eq!(report.observer_indices(), &[0, 1, 2, 3, 0, 0, 0]);
        assert_eq!(report.median, 722);
        assert_eq!(report.juels_per_lamport, 2);
    }

    #[test]
    fn test_epoch_and_round_ordering() {
        let a = ReportContext::parse(&encode::context(&[0; 32], 1, 255)).unwrap();
        let b = ReportContext::parse(&encode::context(&[0; 32], 2, 0)).unwrap();
        assert!(b.epoch_and_round() > a.epoch_and_round());
    }

    #[test]
    fn test_report_hash_binds_both_parts() {
        let ctx = encode::context(&[1; 32], 1, 1);
        let rep = encode::report(0, &[0], 5, 0);
        let other = encode::context(&[1; 32], 1, 2);
        assert_ne!(report_hash(&rep, &ctx), report_hash(&rep, &other));
        assert_eq!(report_hash(&rep, &ctx), report_hash(&rep, &ctx));
    }
}
