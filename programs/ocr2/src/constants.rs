//! Program-wide limits, seeds and wire sizes

/// Committee capacity; also bounds observer indices in a report
pub const MAX_ORACLES: usize = 19;

/// Leftover list capacity
pub const MAX_LEFTOVER_PAYMENTS: usize = MAX_ORACLES;

/// Staging buffer capacity for the offchain config blob
pub const MAX_OFFCHAIN_CONFIG_LEN: usize = 4096;

/// Fixed width of the feed description
pub const DESCRIPTION_LEN: usize = 32;

/// PDA seed of the vault authority: ["vault", state]
pub const VAULT_SEED: &[u8] = b"vault";

/// PDA seed of the validator authority: ["validator", state]
pub const VALIDATOR_SEED: &[u8] = b"validator";

/// First two bytes of every config digest
pub const DIGEST_PREFIX: u16 = 0x0003;

/// Flagging thresholds are expressed in parts per THRESHOLD_MULTIPLIER
pub const THRESHOLD_MULTIPLIER: u128 = 100_000;

/// Signed report context: digest + padding + epoch + round + extra hash
pub const REPORT_CONTEXT_LEN: usize = 32 + 27 + 4 + 1 + 32;

/// Signed report body: timestamp + observer count + observers + median + juels/lamport
pub const REPORT_LEN: usize = 4 + 1 + 32 + 16 + 8;

/// Compact secp256k1 signature + recovery id
pub const SIGNATURE_LEN: usize = 64 + 1;
