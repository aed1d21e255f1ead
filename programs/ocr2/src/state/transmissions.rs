//! Round history ring buffer
//!
//! ```text
//! Transmissions account:
//!   TransmissionsHeader (64 bytes)
//!   Transmission[capacity] (56 bytes each)
//! ```
//!
//! Capacity is fixed when the account is initialized. Once full, each new
//! round overwrites the oldest one.

use bytemuck::{Pod, Zeroable};
use ocr2_common::{OcrError, PodI128};
use pinocchio::pubkey::Pubkey;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransmissionsHeader {
    /// Magic bytes: "OCR2TXNS"
    pub magic: u64,
    pub version: u8,
    pub _padding0: [u8; 3],
    pub capacity: u32,
    /// Round id of the newest record; 0 = no rounds yet
    pub latest_round_id: u32,
    /// Slot the next record is written to
    pub cursor: u32,
    /// Number of live records (<= capacity)
    pub live_length: u32,
    pub _padding1: [u8; 4],
    /// Feed state account this history belongs to
    pub feed: Pubkey,
}

/// One accepted round
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Transmission {
    pub answer: PodI128,
    /// Conversion factor reported alongside the answer, used for billing
    pub juels_per_lamport: u64,
    pub slot: u64,
    /// On-chain unix time at acceptance
    pub timestamp: i64,
    /// Time the oracles observed the value
    pub observations_timestamp: u32,
    pub epoch: u32,
    pub round_id: u32,
    pub round: u8,
    pub observer_count: u8,
    pub _padding: [u8; 2],
}

impl TransmissionsHeader {
    pub const MAGIC: &'static [u8; 8] = b"OCR2TXNS";
    pub const VERSION: u8 = 1;
    pub const LEN: usize = core::mem::size_of::<Self>();

    pub fn is_initialized(&self) -> bool {
        self.magic == u64::from_le_bytes(*Self::MAGIC) && self.version == Self::VERSION
    }
}

impl Transmission {
    pub const LEN: usize = core::mem::size_of::<Self>();
}

/// Mutable view over a transmissions account
pub struct RingBuffer<'a> {
    pub header: &'a mut TransmissionsHeader,
    pub records: &'a mut [Transmission],
}

impl<'a> RingBuffer<'a> {
    /// Wrap an already initialized history
    pub fn new(
        header: &'a mut TransmissionsHeader,
        records: &'a mut [Transmission],
    ) -> Result<Self, OcrError> {
        if !header.is_initialized() {
            return Err(OcrError::Uninitialized);
        }
        if header.capacity as usize > records.len() || header.capacity == 0 {
            return Err(OcrError::InvalidAccount);
        }
        Ok(Self { header, records })
    }

    /// Set up an empty history over zeroed records
    pub fn initialize(
        header: &'a mut TransmissionsHeader,
        records: &'a mut [Transmission],
        feed: Pubkey,
    ) -> Result<Self, OcrError> {
        if header.magic != 0 {
            return Err(OcrError::AlreadyInitialized);
        }
        if records.is_empty() || records.len() > u32::MAX as usize {
            return Err(OcrError::InvalidAccount);
        }
        *header = TransmissionsHeader::zeroed();
        header.magic = u64::from_le_bytes(*TransmissionsHeader::MAGIC);
        header.version = TransmissionsHeader::VERSION;
        header.capacity = records.len() as u32;
        header.feed = feed;
        Ok(Self { header, records })
    }

    pub fn capacity(&self) -> usize {
        self.header.capacity as usize
    }

    pub fn len(&self) -> usize {
        self.header.live_length as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Next round id that [`push`](Self::push) will assign
    pub fn next_round_id(&self) -> Result<u32, OcrError> {
        self.header.latest_round_id.checked_add(1).ok_or(OcrError::Overflow)
    }

    /// Append a round, evicting the oldest once full. Returns the round id.
    pub fn push(&mut self, mut transmission: Transmission) -> Result<u32, OcrError> {
        let round_id = self.next_round_id()?;
        transmission.round_id = round_id;

        let cursor = self.header.cursor as usize;
        self.records[cursor] = transmission;

        self.header.cursor = ((cursor + 1) % self.capacity()) as u32;
        if self.len() < self.capacity() {
            self.header.live_length += 1;
        }
        self.header.latest_round_id = round_id;
        Ok(round_id)
    }

    pub fn latest(&self) -> Option<&Transmission> {
        self.newest_first().next()
    }

    /// Live records, newest first
    pub fn newest_first(&self) -> impl Iterator<Item = &Transmission> + '_ {
        let cap = self.capacity();
        let cursor = self.header.cursor as usize;
        (1..=self.len()).map(move |back| &self.records[(cursor + cap - back) % cap])
    }

    /// Look up a round still held in the buffer
    pub fn get_round(&self, round_id: u32) -> Option<&Transmission> {
        let latest = self.header.latest_round_id;
        if round_id == 0 || round_id > latest {
            return None;
        }
        let back = (latest - round_id) as usize;
        if back >= self.len() {
            return None;
        }
        self.newest_first().nth(back)
    }
}
