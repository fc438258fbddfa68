//! Block and quorum certificate types with their canonical encodings.

pub mod bitarray;
pub mod block;
pub mod error;
pub mod qc;

pub use bitarray::BitArray;
pub use block::{Block, BlockType};
pub use error::BlockError;
pub use qc::QuorumCert;
