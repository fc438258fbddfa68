//! Fundamental types for the Volta protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: addresses, hashes, token kinds, amounts, timestamps, network
//! addresses and protocol constants.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod net;
pub mod params;
pub mod time;
pub mod token;

pub use address::Address;
pub use amount::U256;
pub use error::TypeError;
pub use hash::{Bytes32, Hash};
pub use net::NetAddress;
pub use time::Timestamp;
pub use token::Token;
