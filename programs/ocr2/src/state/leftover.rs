//! Balances rescued from committee slots dropped by a rotation

use crate::constants::MAX_LEFTOVER_PAYMENTS;
use bytemuck::{Pod, Zeroable};
use ocr2_common::OcrError;
use pinocchio::pubkey::Pubkey;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct LeftoverPayment {
    pub payee: Pubkey,
    pub amount: u64,
}

/// Bounded overflow list, drained only by a bulk payout
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct LeftoverPayments {
    pub xs: [LeftoverPayment; MAX_LEFTOVER_PAYMENTS],
    pub len: u64,
}

impl LeftoverPayments {
    pub fn len(&self) -> usize {
        (self.len as usize).min(MAX_LEFTOVER_PAYMENTS)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_LEFTOVER_PAYMENTS - self.len()
    }

    pub fn as_slice(&self) -> &[LeftoverPayment] {
        &self.xs[..self.len()]
    }

    pub fn push(&mut self, payment: LeftoverPayment) -> Result<(), OcrError> {
        let len = self.len();
        if len == MAX_LEFTOVER_PAYMENTS {
            return Err(OcrError::LeftoverPaymentsFull);
        }
        self.xs[len] = payment;
        self.len = (len + 1) as u64;
        Ok(())
    }

    pub fn total(&self) -> u128 {
        self.as_slice().iter().map(|p| p.amount as u128).sum()
    }

    pub fn clear(&mut self) {
        *self = Self::zeroed();
    }
}
