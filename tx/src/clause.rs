//! A single operation inside a transaction.

use serde::{Deserialize, Serialize};
use volta_types::{Address, Token, U256};

/// One clause of a transaction: a value transfer or a contract/module call.
/// A `None` target creates a contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub to: Option<Address>,
    pub value: U256,
    pub token: Token,
    pub data: Vec<u8>,
}

impl Clause {
    pub fn new(to: Option<Address>, value: U256, token: Token) -> Self {
        Self {
            to,
            value,
            token,
            data: Vec::new(),
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}
