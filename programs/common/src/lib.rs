#![cfg_attr(not(test), no_std)]

pub mod error;
pub mod codec;
pub mod account;
pub mod interfaces;

pub use error::*;
pub use codec::*;
pub use account::*;
