//! Error codes shared by the feed program and its collaborators' interfaces
//!
//! Every variant maps to `ProgramError::Custom(code)`. Codes are grouped by
//! class so a caller can tell a malformed request (do not retry) from a stale
//! one (retry with fresher data) without a lookup table.

use pinocchio::program_error::ProgramError;

/// Coarse failure classes a caller can act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed input or a capacity limit hit; retrying the same call fails again
    Precondition,
    /// Wrong signer or caller identity
    Authorization,
    /// Stale round, wrong digest, or staging state mismatch
    Ordering,
    /// Signature recovery failed or the quorum was not met
    Cryptographic,
    /// Access controller, validator or token program refused
    Collaborator,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrError {
    // Precondition violations (0..)
    InvalidInstruction = 0,
    InvalidInput = 1,
    InvalidAccount = 2,
    TooManyOracles = 3,
    InvalidFaultTolerance = 4,
    DuplicateSigner = 5,
    DuplicateTransmitter = 6,
    LeftoverPaymentsFull = 7,
    OffchainConfigOverflow = 8,
    AnswerOutOfRange = 9,
    InvalidReport = 10,
    DescriptionTooLong = 11,
    PayeeAlreadySet = 12,
    PayeeCountMismatch = 13,
    InsufficientFunds = 14,
    BufferTooSmall = 15,
    Overflow = 16,
    InvalidScope = 17,

    // Authorization failures (100..)
    Unauthorized = 100,
    UnauthorizedTransmitter = 101,

    // Ordering violations (200..)
    StaleReport = 200,
    DigestMismatch = 201,
    OffchainConfigNotStaging = 202,
    InvalidOffchainConfigVersion = 203,
    NoConfig = 204,
    NoTransmissions = 205,
    AlreadyInitialized = 206,
    Uninitialized = 207,

    // Cryptographic failures (300..)
    NotEnoughSignatures = 300,
    SignatureRecoveryFailed = 301,
    UnknownSigner = 302,
    DuplicateSignature = 303,

    // Collaborator failures (400..)
    AccessDenied = 400,
    PayeeMismatch = 401,
    ValidatorMismatch = 402,
    TokenAccountMismatch = 403,
}

impl OcrError {
    pub fn class(self) -> ErrorClass {
        match self as u32 {
            0..=99 => ErrorClass::Precondition,
            100..=199 => ErrorClass::Authorization,
            200..=299 => ErrorClass::Ordering,
            300..=399 => ErrorClass::Cryptographic,
            _ => ErrorClass::Collaborator,
        }
    }

    /// Whether resubmitting with fresher data can succeed
    pub fn is_retryable(self) -> bool {
        matches!(self.class(), ErrorClass::Ordering)
    }
}

impl From<OcrError> for ProgramError {
    fn from(e: OcrError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
