//! The signed transaction envelope.

use crate::clause::Clause;
use crate::error::TxError;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use volta_crypto::{blake2b_256_multi, recover_signer};
use volta_types::params::{
    CLAUSE_GAS, CLAUSE_GAS_CONTRACT_CREATION, NON_ZERO_BYTE_GAS, TX_GAS, ZERO_BYTE_GAS,
};
use volta_types::{Address, Bytes32, Hash, U256};

/// A signed transaction.
///
/// The derived values (signing hash, signer, id, intrinsic gas) are memoised
/// publish-once: concurrent readers observe either absent or the final
/// value, never a partial one.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Transaction {
    pub chain_tag: u8,
    pub block_ref: u64,
    pub expiration: u32,
    pub clauses: Vec<Clause>,
    pub gas_price_coef: u8,
    pub gas: u64,
    pub depends_on: Option<Bytes32>,
    pub nonce: u64,
    /// 65-byte recoverable ECDSA signature over the signing hash.
    pub signature: Vec<u8>,

    #[serde(skip)]
    pub(crate) cached_signing_hash: OnceLock<Hash>,
    #[serde(skip)]
    pub(crate) cached_signer: OnceLock<Result<Address, TxError>>,
    #[serde(skip)]
    pub(crate) cached_id: OnceLock<Hash>,
    #[serde(skip)]
    pub(crate) cached_intrinsic_gas: OnceLock<Result<u64, TxError>>,
}

impl Clone for Transaction {
    fn clone(&self) -> Self {
        // Caches are cheap to rebuild; a clone starts cold.
        Self {
            chain_tag: self.chain_tag,
            block_ref: self.block_ref,
            expiration: self.expiration,
            clauses: self.clauses.clone(),
            gas_price_coef: self.gas_price_coef,
            gas: self.gas,
            depends_on: self.depends_on,
            nonce: self.nonce,
            signature: self.signature.clone(),
            cached_signing_hash: OnceLock::new(),
            cached_signer: OnceLock::new(),
            cached_id: OnceLock::new(),
            cached_intrinsic_gas: OnceLock::new(),
        }
    }
}

impl Transaction {
    /// The hash the sender signs: every body field except the signature.
    pub fn signing_hash(&self) -> Hash {
        *self.cached_signing_hash.get_or_init(|| {
            let body = (
                self.chain_tag,
                self.block_ref,
                self.expiration,
                &self.clauses,
                self.gas_price_coef,
                self.gas,
                self.depends_on,
                self.nonce,
            );
            let bytes = bincode::serialize(&body).expect("tx body is always encodable");
            Hash::new(blake2b_256_multi(&[&bytes]))
        })
    }

    /// The signer recovered from the signature. Memoised.
    pub fn signer(&self) -> Result<Address, TxError> {
        self.cached_signer
            .get_or_init(|| {
                recover_signer(&self.signing_hash(), &self.signature)
                    .map_err(|e| TxError::BadSignature(e.to_string()))
            })
            .clone()
    }

    /// The transaction id: digest of the signing hash and the signer.
    pub fn id(&self) -> Result<Hash, TxError> {
        if let Some(id) = self.cached_id.get() {
            return Ok(*id);
        }
        let signer = self.signer()?;
        Ok(*self.cached_id.get_or_init(|| {
            Hash::new(blake2b_256_multi(&[
                self.signing_hash().as_bytes(),
                signer.as_bytes(),
            ]))
        }))
    }

    /// Gas consumed before any clause executes.
    pub fn intrinsic_gas(&self) -> Result<u64, TxError> {
        self.cached_intrinsic_gas
            .get_or_init(|| intrinsic_gas(&self.clauses))
            .clone()
    }

    /// Effective gas price for a given base price:
    /// `base + base · coef / 255`.
    pub fn gas_price(&self, base_gas_price: U256) -> U256 {
        base_gas_price + base_gas_price * U256::from(self.gas_price_coef) / U256::from(255u64)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("tx is always encodable")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TxError> {
        bincode::deserialize(bytes).map_err(|e| TxError::Decode(e.to_string()))
    }
}

fn intrinsic_gas(clauses: &[Clause]) -> Result<u64, TxError> {
    let mut total: u64 = TX_GAS;
    for clause in clauses {
        let clause_gas = if clause.to.is_some() {
            CLAUSE_GAS
        } else {
            CLAUSE_GAS_CONTRACT_CREATION
        };
        total = total
            .checked_add(clause_gas)
            .ok_or(TxError::IntrinsicGasOverflow)?;
        for byte in &clause.data {
            let byte_gas = if *byte == 0 {
                ZERO_BYTE_GAS
            } else {
                NON_ZERO_BYTE_GAS
            };
            total = total
                .checked_add(byte_gas)
                .ok_or(TxError::IntrinsicGasOverflow)?;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use volta_crypto::EcdsaKeyPair;
    use volta_types::Token;

    fn unsigned_tx() -> Transaction {
        Transaction {
            chain_tag: 0x56,
            block_ref: 12345,
            expiration: 720,
            clauses: vec![Clause::new(
                Some(Address::new([2u8; 20])),
                U256::from(100u64),
                Token::Base,
            )],
            gas_price_coef: 128,
            gas: 100_000,
            depends_on: None,
            nonce: 1,
            signature: Vec::new(),
            ..Default::default()
        }
    }

    fn signed_tx(kp: &EcdsaKeyPair) -> Transaction {
        let mut tx = unsigned_tx();
        tx.signature = kp.sign_hash(&tx.signing_hash()).unwrap().to_vec();
        tx
    }

    #[test]
    fn signing_hash_excludes_signature() {
        let mut a = unsigned_tx();
        let hash = a.signing_hash();
        a.signature = vec![1, 2, 3];
        assert_eq!(a.signing_hash(), hash);
    }

    #[test]
    fn signer_recovered() {
        let kp = EcdsaKeyPair::from_seed(&[5u8; 32]);
        let tx = signed_tx(&kp);
        assert_eq!(tx.signer().unwrap(), kp.address());
    }

    #[test]
    fn signer_memoised_value_is_stable() {
        let kp = EcdsaKeyPair::from_seed(&[5u8; 32]);
        let tx = signed_tx(&kp);
        assert_eq!(tx.signer().unwrap(), tx.signer().unwrap());
        assert_eq!(tx.id().unwrap(), tx.id().unwrap());
    }

    #[test]
    fn unsigned_tx_has_no_signer() {
        assert!(unsigned_tx().signer().is_err());
    }

    #[test]
    fn intrinsic_gas_counts_data_bytes() {
        let mut tx = unsigned_tx();
        tx.clauses[0].data = vec![0, 0, 1];
        // TX_GAS + CLAUSE_GAS + 2·4 + 68
        assert_eq!(tx.intrinsic_gas().unwrap(), 5_000 + 16_000 + 8 + 68);
    }

    #[test]
    fn contract_creation_costs_more() {
        let mut tx = unsigned_tx();
        tx.clauses[0].to = None;
        assert_eq!(tx.intrinsic_gas().unwrap(), 5_000 + 48_000);
    }

    #[test]
    fn gas_price_formula() {
        let tx = unsigned_tx(); // coef = 128
        let base = U256::from(1_000u64);
        assert_eq!(tx.gas_price(base), U256::from(1_000u64 + 1_000 * 128 / 255));

        let mut max = unsigned_tx();
        max.gas_price_coef = 255;
        assert_eq!(max.gas_price(base), U256::from(2_000u64));
    }

    #[test]
    fn encode_decode_roundtrip() {
        let kp = EcdsaKeyPair::from_seed(&[5u8; 32]);
        let tx = signed_tx(&kp);
        let decoded = Transaction::from_bytes(&tx.to_bytes()).unwrap();
        assert_eq!(decoded.id().unwrap(), tx.id().unwrap());
        assert_eq!(decoded.clauses, tx.clauses);
    }
}
