//! Transaction model, resolution and gas prepayment.

pub mod builder;
pub mod clause;
pub mod error;
pub mod resolved;
pub mod transaction;

pub use builder::TxBuilder;
pub use clause::Clause;
pub use error::TxError;
pub use resolved::{GasPrepayment, ResolvedTransaction};
pub use transaction::Transaction;
