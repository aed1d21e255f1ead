pub mod feed;
pub mod config;
pub mod oracles;
pub mod leftover;
pub mod offchain;
pub mod transmissions;

pub use feed::*;
pub use config::*;
pub use oracles::*;
pub use leftover::*;
pub use offchain::*;
pub use transmissions::*;
