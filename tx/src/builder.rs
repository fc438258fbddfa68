//! Fluent transaction construction.

use crate::clause::Clause;
use crate::transaction::Transaction;
use volta_crypto::{CryptoError, EcdsaKeyPair};
use volta_types::Bytes32;

/// Builder for [`Transaction`].
#[derive(Debug, Default)]
pub struct TxBuilder {
    chain_tag: u8,
    block_ref: u64,
    expiration: u32,
    clauses: Vec<Clause>,
    gas_price_coef: u8,
    gas: u64,
    depends_on: Option<Bytes32>,
    nonce: u64,
}

impl TxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain_tag(mut self, tag: u8) -> Self {
        self.chain_tag = tag;
        self
    }

    pub fn block_ref(mut self, block_ref: u64) -> Self {
        self.block_ref = block_ref;
        self
    }

    pub fn expiration(mut self, expiration: u32) -> Self {
        self.expiration = expiration;
        self
    }

    pub fn clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn gas_price_coef(mut self, coef: u8) -> Self {
        self.gas_price_coef = coef;
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    pub fn depends_on(mut self, id: Bytes32) -> Self {
        self.depends_on = Some(id);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Build the unsigned transaction.
    pub fn build(self) -> Transaction {
        Transaction {
            chain_tag: self.chain_tag,
            block_ref: self.block_ref,
            expiration: self.expiration,
            clauses: self.clauses,
            gas_price_coef: self.gas_price_coef,
            gas: self.gas,
            depends_on: self.depends_on,
            nonce: self.nonce,
            signature: Vec::new(),
            ..Default::default()
        }
    }

    /// Build and sign in one step.
    pub fn build_signed(self, key: &EcdsaKeyPair) -> Result<Transaction, CryptoError> {
        let mut tx = self.build();
        tx.signature = key.sign_hash(&tx.signing_hash())?.to_vec();
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volta_types::{Address, Token, U256};

    #[test]
    fn builder_sets_fields() {
        let tx = TxBuilder::new()
            .chain_tag(0x56)
            .block_ref(99)
            .expiration(720)
            .gas(50_000)
            .gas_price_coef(10)
            .nonce(4)
            .clause(Clause::new(
                Some(Address::new([1u8; 20])),
                U256::from(5u64),
                Token::Gov,
            ))
            .build();

        assert_eq!(tx.chain_tag, 0x56);
        assert_eq!(tx.block_ref, 99);
        assert_eq!(tx.expiration, 720);
        assert_eq!(tx.gas, 50_000);
        assert_eq!(tx.gas_price_coef, 10);
        assert_eq!(tx.nonce, 4);
        assert_eq!(tx.clauses.len(), 1);
        assert!(tx.signature.is_empty());
    }

    #[test]
    fn build_signed_recovers_signer() {
        let kp = EcdsaKeyPair::from_seed(&[8u8; 32]);
        let tx = TxBuilder::new()
            .gas(30_000)
            .clause(Clause::new(
                Some(Address::new([1u8; 20])),
                U256::zero(),
                Token::Base,
            ))
            .build_signed(&kp)
            .unwrap();
        assert_eq!(tx.signer().unwrap(), kp.address());
    }
}
