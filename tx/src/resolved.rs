//! Transaction resolution and gas prepayment.

use crate::error::TxError;
use crate::transaction::Transaction;
use volta_state::State;
use volta_types::params::KEY_BASE_GAS_PRICE;
use volta_types::{Address, U256};

/// A transaction with its signer recovered and basic validation done.
#[derive(Clone, Debug)]
pub struct ResolvedTransaction {
    pub tx: Transaction,
    pub origin: Address,
    pub intrinsic_gas: u64,
}

impl ResolvedTransaction {
    /// Resolve a transaction: recover the signer, compute intrinsic gas and
    /// validate the clause values.
    ///
    /// An unsigned transaction resolves to the zero origin — the reward
    /// (mint) transaction the block proposer injects.
    pub fn resolve(tx: Transaction) -> Result<Self, TxError> {
        let origin = if tx.signature.is_empty() {
            Address::ZERO
        } else {
            tx.signer()?
        };
        let intrinsic_gas = tx.intrinsic_gas()?;
        if tx.gas < intrinsic_gas {
            return Err(TxError::GasTooLow {
                intrinsic: intrinsic_gas,
                provided: tx.gas,
            });
        }

        let mut sum = U256::zero();
        for clause in &tx.clauses {
            sum = sum
                .checked_add(clause.value)
                .ok_or(TxError::ValueOverflow)?;
        }

        Ok(Self {
            tx,
            origin,
            intrinsic_gas,
        })
    }

    /// The common `to` of all clauses, if every clause targets the same
    /// non-nil address.
    pub fn common_to(&self) -> Option<Address> {
        let first = self.tx.clauses.first()?.to?;
        for clause in &self.tx.clauses[1..] {
            if clause.to != Some(first) {
                return None;
            }
        }
        Some(first)
    }

    /// Prepay the transaction's gas.
    ///
    /// Payer selection, in order: (1) if all clauses share one `to`, that
    /// contract's current sponsor and then the contract itself, provided the
    /// caller has enough user credit; (2) the origin; (3) reward
    /// transactions (zero origin) pay nothing.
    pub fn buy_gas(
        &self,
        state: &mut dyn State,
        block_time: u64,
    ) -> Result<GasPrepayment, TxError> {
        let base_gas_price = state.param(KEY_BASE_GAS_PRICE);
        let gas_price = self.tx.gas_price(base_gas_price);
        let prepaid = U256::from(self.tx.gas) * gas_price;

        if let Some(to) = self.common_to() {
            let credit = state.user_credit(&to, &self.origin, block_time);
            if credit >= prepaid {
                let binding = Some(CreditBinding {
                    target: to,
                    user: self.origin,
                    credit,
                    block_time,
                });
                if let Some(sponsor) = state.current_sponsor(&to) {
                    if state.sub_energy(&sponsor, prepaid) {
                        return Ok(GasPrepayment {
                            base_gas_price,
                            gas_price,
                            payer: sponsor,
                            prepaid,
                            credit: binding,
                        });
                    }
                }
                if state.sub_energy(&to, prepaid) {
                    return Ok(GasPrepayment {
                        base_gas_price,
                        gas_price,
                        payer: to,
                        prepaid,
                        credit: binding,
                    });
                }
            }
        }

        if self.origin.is_zero() {
            // Reward transactions skip deduction.
            return Ok(GasPrepayment {
                base_gas_price,
                gas_price,
                payer: self.origin,
                prepaid: U256::zero(),
                credit: None,
            });
        }

        if state.sub_energy(&self.origin, prepaid) {
            Ok(GasPrepayment {
                base_gas_price,
                gas_price,
                payer: self.origin,
                prepaid,
                credit: None,
            })
        } else {
            Err(TxError::InsufficientEnergy)
        }
    }
}

/// Sponsorship credit touched by a prepayment; settled on refund.
#[derive(Clone, Debug)]
struct CreditBinding {
    target: Address,
    user: Address,
    credit: U256,
    block_time: u64,
}

/// An active gas prepayment; refund the unused portion after execution.
#[derive(Clone, Debug)]
pub struct GasPrepayment {
    pub base_gas_price: U256,
    pub gas_price: U256,
    pub payer: Address,
    pub prepaid: U256,
    credit: Option<CreditBinding>,
}

impl GasPrepayment {
    /// Refund `unused_gas · gas_price` to the payer and, in the sponsored
    /// case, charge the caller's credit with the actual spend.
    pub fn return_gas(&self, state: &mut dyn State, unused_gas: u64) {
        let refund = U256::from(unused_gas) * self.gas_price;
        if !refund.is_zero() {
            state.add_energy(&self.payer, refund);
        }
        if let Some(binding) = &self.credit {
            let used = self.prepaid.saturating_sub(refund);
            state.set_user_credit(
                &binding.target,
                &binding.user,
                binding.credit.saturating_sub(used),
                binding.block_time,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Clause;
    use volta_crypto::EcdsaKeyPair;
    use volta_state::MemState;
    use volta_types::amount::tokens;
    use volta_types::Token;

    fn addr(b: u8) -> Address {
        Address::new([b; 20])
    }

    fn signed_tx(kp: &EcdsaKeyPair, clauses: Vec<Clause>, gas: u64) -> Transaction {
        let mut tx = Transaction {
            chain_tag: 0x56,
            block_ref: 1,
            expiration: 720,
            clauses,
            gas_price_coef: 0,
            gas,
            depends_on: None,
            nonce: 8,
            signature: Vec::new(),
            ..Default::default()
        };
        tx.signature = kp.sign_hash(&tx.signing_hash()).unwrap().to_vec();
        tx
    }

    fn transfer(to: u8) -> Clause {
        Clause::new(Some(addr(to)), U256::from(10u64), Token::Base)
    }

    #[test]
    fn resolve_checks_gas_floor() {
        let kp = EcdsaKeyPair::from_seed(&[1u8; 32]);
        let tx = signed_tx(&kp, vec![transfer(2)], 100);
        match ResolvedTransaction::resolve(tx) {
            Err(TxError::GasTooLow { intrinsic, provided }) => {
                assert_eq!(intrinsic, 21_000);
                assert_eq!(provided, 100);
            }
            other => panic!("expected GasTooLow, got {other:?}"),
        }
    }

    #[test]
    fn common_to_detected() {
        let kp = EcdsaKeyPair::from_seed(&[1u8; 32]);
        let same = ResolvedTransaction::resolve(signed_tx(
            &kp,
            vec![transfer(2), transfer(2)],
            100_000,
        ))
        .unwrap();
        assert_eq!(same.common_to(), Some(addr(2)));

        let mixed = ResolvedTransaction::resolve(signed_tx(
            &kp,
            vec![transfer(2), transfer(3)],
            100_000,
        ))
        .unwrap();
        assert_eq!(mixed.common_to(), None);
    }

    #[test]
    fn buy_gas_deducts_from_origin() {
        let kp = EcdsaKeyPair::from_seed(&[1u8; 32]);
        let origin = kp.address();
        let mut state = MemState::new();
        state.set_param(KEY_BASE_GAS_PRICE, U256::from(1u64));
        state.add_energy(&origin, tokens(1));

        let resolved =
            ResolvedTransaction::resolve(signed_tx(&kp, vec![transfer(2)], 100_000)).unwrap();
        let prepayment = resolved.buy_gas(&mut state, 0).unwrap();
        assert_eq!(prepayment.payer, origin);
        assert_eq!(state.energy(&origin), tokens(1) - U256::from(100_000u64));
    }

    #[test]
    fn buy_gas_fails_without_energy() {
        let kp = EcdsaKeyPair::from_seed(&[1u8; 32]);
        let mut state = MemState::new();
        state.set_param(KEY_BASE_GAS_PRICE, U256::from(1u64));

        let resolved =
            ResolvedTransaction::resolve(signed_tx(&kp, vec![transfer(2)], 100_000)).unwrap();
        assert_eq!(
            resolved.buy_gas(&mut state, 0).unwrap_err(),
            TxError::InsufficientEnergy
        );
    }

    #[test]
    fn sponsor_pays_when_caller_has_credit() {
        let kp = EcdsaKeyPair::from_seed(&[1u8; 32]);
        let origin = kp.address();
        let contract = addr(2);
        let sponsor = addr(7);

        let mut state = MemState::new();
        state.set_param(KEY_BASE_GAS_PRICE, U256::from(1u64));
        state.set_sponsor(&contract, Some(sponsor));
        state.set_user_credit(&contract, &origin, tokens(1), 0);
        state.add_energy(&sponsor, tokens(1));

        let resolved =
            ResolvedTransaction::resolve(signed_tx(&kp, vec![transfer(2)], 100_000)).unwrap();
        let prepayment = resolved.buy_gas(&mut state, 0).unwrap();
        assert_eq!(prepayment.payer, sponsor);
        assert_eq!(state.energy(&sponsor), tokens(1) - U256::from(100_000u64));

        // Refund half; the caller's credit drops by the actual spend.
        prepayment.return_gas(&mut state, 50_000);
        assert_eq!(state.energy(&sponsor), tokens(1) - U256::from(50_000u64));
        assert_eq!(
            state.user_credit(&contract, &origin, 0),
            tokens(1) - U256::from(50_000u64)
        );
    }

    #[test]
    fn contract_pays_when_sponsor_is_broke() {
        let kp = EcdsaKeyPair::from_seed(&[1u8; 32]);
        let origin = kp.address();
        let contract = addr(2);
        let sponsor = addr(7);

        let mut state = MemState::new();
        state.set_param(KEY_BASE_GAS_PRICE, U256::from(1u64));
        state.set_sponsor(&contract, Some(sponsor));
        state.set_user_credit(&contract, &origin, tokens(1), 0);
        state.add_energy(&contract, tokens(1));

        let resolved =
            ResolvedTransaction::resolve(signed_tx(&kp, vec![transfer(2)], 100_000)).unwrap();
        let prepayment = resolved.buy_gas(&mut state, 0).unwrap();
        assert_eq!(prepayment.payer, contract);
    }

    #[test]
    fn reward_transaction_pays_nothing() {
        let mut state = MemState::new();
        state.set_param(KEY_BASE_GAS_PRICE, U256::from(1u64));

        let tx = Transaction {
            chain_tag: 0x56,
            clauses: vec![transfer(2)],
            gas: 100_000,
            ..Default::default()
        };
        let resolved = ResolvedTransaction::resolve(tx).unwrap();
        assert!(resolved.origin.is_zero());

        let prepayment = resolved.buy_gas(&mut state, 0).unwrap();
        assert_eq!(prepayment.prepaid, U256::zero());
    }

    #[test]
    fn refund_restores_origin_energy() {
        let kp = EcdsaKeyPair::from_seed(&[1u8; 32]);
        let origin = kp.address();
        let mut state = MemState::new();
        state.set_param(KEY_BASE_GAS_PRICE, U256::from(2u64));
        state.add_energy(&origin, tokens(1));

        let resolved =
            ResolvedTransaction::resolve(signed_tx(&kp, vec![transfer(2)], 100_000)).unwrap();
        let prepayment = resolved.buy_gas(&mut state, 0).unwrap();
        prepayment.return_gas(&mut state, 100_000);
        assert_eq!(state.energy(&origin), tokens(1));
    }
}
