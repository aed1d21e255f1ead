//! Committee members and their per-slot payment accrual
//!
//! Accrual lives next to the member in the same slot, so it is keyed by
//! committee position, not by identity. Rotation has to diff old and new
//! slots to keep balances from being lost.

use crate::constants::MAX_ORACLES;
use bytemuck::{Pod, Zeroable};
use pinocchio::pubkey::Pubkey;

/// 20-byte secp256k1 signer identity: keccak256(pubkey)[12..]
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SignerKey(pub [u8; 20]);

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Oracle {
    /// Key that signs transmit transactions
    pub transmitter: Pubkey,
    /// Key that signs reports off-chain
    pub signer: SignerKey,
    pub _padding: [u8; 4],
    /// Token account receiving payouts; all zeros = any token account the
    /// transmitter owns
    pub payee: Pubkey,
    /// Accrued and not yet paid out
    pub payment: u64,
}

impl Oracle {
    pub fn new(signer: SignerKey, transmitter: Pubkey) -> Self {
        Self {
            transmitter,
            signer,
            _padding: [0; 4],
            payee: Pubkey::default(),
            payment: 0,
        }
    }

    /// Where this slot's balance is paid
    pub fn payee(&self) -> Pubkey {
        if self.payee == Pubkey::default() {
            self.transmitter
        } else {
            self.payee
        }
    }

    /// Same signer and transmitter identity
    pub fn same_identity(&self, other: &Oracle) -> bool {
        self.signer == other.signer && self.transmitter == other.transmitter
    }
}

/// Fixed-capacity committee array with an occupied count
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Oracles {
    pub xs: [Oracle; MAX_ORACLES],
    pub len: u64,
}

impl Oracles {
    pub fn len(&self) -> usize {
        (self.len as usize).min(MAX_ORACLES)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[Oracle] {
        &self.xs[..self.len()]
    }

    pub fn as_mut_slice(&mut self) -> &mut [Oracle] {
        let len = self.len();
        &mut self.xs[..len]
    }

    pub fn find_transmitter(&self, transmitter: &Pubkey) -> Option<usize> {
        self.as_slice().iter().position(|o| &o.transmitter == transmitter)
    }

    pub fn find_signer(&self, signer: &SignerKey) -> Option<usize> {
        self.as_slice().iter().position(|o| &o.signer == signer)
    }

    /// Total accrual across occupied slots
    pub fn total_owed(&self) -> u128 {
        self.as_slice().iter().map(|o| o.payment as u128).sum()
    }

    /// Replace the whole committee; slots past `members.len()` are zeroed
    pub fn replace(&mut self, members: &[Oracle]) {
        let n = members.len().min(MAX_ORACLES);
        self.xs[..n].copy_from_slice(&members[..n]);
        for slot in self.xs[n..].iter_mut() {
            *slot = Oracle::zeroed();
        }
        self.len = n as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::size_of;

    #[test]
    fn test_oracle_size() {
        assert_eq!(size_of::<Oracle>(), 96);
        assert_eq!(size_of::<Oracles>(), 96 * MAX_ORACLES + 8);
    }

    #[test]
    fn test_payee_falls_back_to_transmitter() {
        let mut oracle = Oracle::new(SignerKey([1; 20]), [2; 32]);
        assert_eq!(oracle.payee(), [2; 32]);
        oracle.payee = [3; 32];
        assert_eq!(oracle.payee(), [3; 32]);
    }

    #[test]
    fn test_replace_and_lookup() {
        let mut oracles = Oracles::zeroed();
        let members = [
            Oracle::new(SignerKey([1; 20]), [11; 32]),
            Oracle::new(SignerKey([2; 20]), [12; 32]),
        ];
        oracles.replace(&members);
        oracles.xs[1].payment = 5;
        assert_eq!(oracles.len(), 2);
        assert_eq!(oracles.find_signer(&SignerKey([2; 20])), Some(1));
        assert_eq!(oracles.find_transmitter(&[11; 32]), Some(0));
        assert_eq!(oracles.find_transmitter(&[13; 32]), None);
        assert_eq!(oracles.total_owed(), 5);

        oracles.replace(&members[..1]);
        assert_eq!(oracles.len(), 1);
        assert_eq!(oracles.xs[1].payment, 0);
        assert_eq!(oracles.find_signer(&SignerKey([2; 20])), None);
    }
}
