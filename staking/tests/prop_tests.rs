//! Property tests over the staking state machine.

use proptest::prelude::*;
use volta_staking::options::ONE_WEEK_LOCK;
use volta_staking::{
    handler, store, Bucket, BucketList, Candidate, CandidateList, Infraction, Opcode, StakingBody,
    StakingEnv,
};
use volta_state::{MemState, State};
use volta_types::amount::tokens;
use volta_types::{Address, Bytes32, Token, U256};

fn addr(b: u8) -> Address {
    Address::new([b; 20])
}

fn empty_body(opcode: Opcode) -> StakingBody {
    StakingBody {
        opcode,
        version: 0,
        option: 0,
        holder_addr: Address::ZERO,
        cand_addr: Address::ZERO,
        cand_name: Vec::new(),
        cand_pub_key: Vec::new(),
        cand_ip: Vec::new(),
        cand_port: 0,
        staking_id: Bytes32::ZERO,
        amount: U256::zero(),
        token: Token::Gov.as_byte(),
        timestamp: 0,
        nonce: 0,
        extra_data: Vec::new(),
    }
}

fn exec(state: &mut MemState, body: &StakingBody) {
    let mut env = StakingEnv::new(state, 1);
    let outcome = handler::execute(&mut env, body, 100_000);
    assert!(outcome.result.is_ok(), "{:?}", outcome.result);
}

fn governing(state: &mut MemState, now: u64) {
    let body = StakingBody {
        opcode: Opcode::Governing,
        option: 10,
        timestamp: now,
        extra_data: bincode::serialize(&vec![addr(200)]).unwrap(),
        ..empty_body(Opcode::Governing)
    };
    exec(state, &body);
}

proptest! {
    /// Invariant 1: per holder, the sum of bucket values equals the
    /// stakeholder's total stake.
    #[test]
    fn stakeholder_totals_match_buckets(
        bounds in prop::collection::vec((1u8..=5, 1u64..=50, 1u64..=1000), 1..12)
    ) {
        let mut state = MemState::new();
        for holder in 1u8..=5 {
            state.add_balance(&addr(holder), tokens(10_000));
        }

        for (i, (holder, amount, nonce)) in bounds.iter().enumerate() {
            let body = StakingBody {
                opcode: Opcode::Bound,
                option: ONE_WEEK_LOCK,
                holder_addr: addr(*holder),
                amount: tokens(*amount),
                timestamp: 1_000 + i as u64,
                nonce: *nonce,
                ..empty_body(Opcode::Bound)
            };
            exec(&mut state, &body);
        }

        let buckets = store::get_bucket_list(&state);
        let holders = store::get_stakeholder_list(&state);
        for holder in holders.iter() {
            let sum: U256 = buckets
                .iter()
                .filter(|b| b.owner == holder.holder)
                .fold(U256::zero(), |acc, b| acc + b.value);
            prop_assert_eq!(sum, holder.total_stake);
            prop_assert_eq!(holder.buckets.len(),
                buckets.iter().filter(|b| b.owner == holder.holder).count());
        }
    }

    /// Invariant 2: a candidate's total votes equal the sum of total votes
    /// of the buckets that reference it, also after bonus accrual.
    #[test]
    fn candidate_totals_match_buckets(
        values in prop::collection::vec(1u64..=50, 1..8),
        governings in prop::collection::vec(1u64..=10_000_000, 0..4)
    ) {
        let mut state = MemState::new();

        let cand_addr = addr(100);
        let mut candidates = CandidateList::new();
        let mut buckets = BucketList::new();
        let mut cand = Candidate::new(
            cand_addr,
            b"cand".to_vec(),
            vec![0x55; 8],
            b"1.2.3.4".to_vec(),
            8670,
            100_000_000,
            0,
        );
        for (i, value) in values.iter().enumerate() {
            let bucket = Bucket::new(
                addr(i as u8 + 1),
                cand_addr,
                tokens(*value),
                Token::Gov,
                ONE_WEEK_LOCK,
                5,
                0,
                i as u64,
            );
            cand.add_bucket(&bucket);
            buckets.add(bucket);
        }
        candidates.add(cand);
        store::set_candidate_list(&mut state, &candidates);
        store::set_bucket_list(&mut state, &buckets);

        // Governing at monotonically increasing times accrues bonuses.
        let mut now = 0u64;
        for step in &governings {
            now += step;
            governing(&mut state, now);
        }

        let buckets = store::get_bucket_list(&state);
        let candidates = store::get_candidate_list(&state);
        if let Some(cand) = candidates.get(&cand_addr) {
            let sum: U256 = buckets
                .iter()
                .filter(|b| b.candidate == cand_addr)
                .fold(U256::zero(), |acc, b| acc + b.total_votes);
            prop_assert_eq!(sum, cand.total_votes);
        }
    }

    /// Invariant 3: with monotone time, bonus votes and the accrual stamp
    /// never decrease.
    #[test]
    fn bonus_accrual_is_monotonic(
        steps in prop::collection::vec(0u64..=1_000_000, 1..6)
    ) {
        let mut state = MemState::new();
        let mut buckets = BucketList::new();
        let bucket = Bucket::new(
            addr(1),
            Address::ZERO,
            tokens(100),
            Token::Gov,
            ONE_WEEK_LOCK,
            5,
            0,
            1,
        );
        let id = bucket.id;
        buckets.add(bucket);
        store::set_bucket_list(&mut state, &buckets);

        let mut now = 0u64;
        let mut last_bonus = 0u64;
        let mut last_stamp = 0u64;
        for step in &steps {
            now += step;
            governing(&mut state, now);
            let bucket = store::get_bucket_list(&state).get(&id).unwrap().clone();
            prop_assert!(bucket.bonus_votes >= last_bonus);
            prop_assert!(bucket.calc_last_time >= last_stamp);
            prop_assert_eq!(bucket.total_votes,
                bucket.value + U256::from(bucket.bonus_votes));
            last_bonus = bucket.bonus_votes;
            last_stamp = bucket.calc_last_time;
        }
    }

    /// Invariant 5: statistics against a jailed candidate are no-ops.
    #[test]
    fn jailed_candidate_ignores_statistics(extra_reports in 1usize..5) {
        let mut state = MemState::new();
        let cand = addr(3);

        let mut stats = empty_body(Opcode::DelegateStatistics);
        stats.cand_addr = cand;
        stats.timestamp = 100;
        stats.extra_data = Infraction { double_signer: 1, ..Default::default() }.to_bytes();
        exec(&mut state, &stats);
        prop_assert!(store::get_jail_list(&state).exist(&cand));

        let jailed_before = store::get_jail_list(&state);
        for _ in 0..extra_reports {
            exec(&mut state, &stats);
        }
        prop_assert_eq!(store::get_jail_list(&state), jailed_before);
        prop_assert!(store::get_statistics_list(&state).is_empty());
    }

    /// Invariant 7: the elected delegates are the top-k by voting power
    /// descending, pubkey descending as the tie-break.
    #[test]
    fn election_ordering_holds(
        powers in prop::collection::vec(300u64..=1_000, 1..10),
        size in 1u32..=6
    ) {
        let mut state = MemState::new();
        let mut candidates = CandidateList::new();
        let mut buckets = BucketList::new();

        for (i, power) in powers.iter().enumerate() {
            let tag = i as u8 + 1;
            let cand_addr = addr(tag);
            let bucket = Bucket::new(
                cand_addr, cand_addr, tokens(*power), Token::Gov,
                ONE_WEEK_LOCK, 5, 0, u64::from(tag),
            );
            let mut cand = Candidate::new(
                cand_addr,
                vec![tag],
                vec![tag; 8],
                b"1.2.3.4".to_vec(),
                8670,
                100_000_000,
                0,
            );
            cand.add_bucket(&bucket);
            candidates.add(cand);
            buckets.add(bucket);
        }
        store::set_candidate_list(&mut state, &candidates);
        store::set_bucket_list(&mut state, &buckets);

        let body = StakingBody {
            opcode: Opcode::Governing,
            option: size,
            timestamp: 0,
            extra_data: bincode::serialize(&vec![addr(200)]).unwrap(),
            ..empty_body(Opcode::Governing)
        };
        exec(&mut state, &body);

        let delegates = store::get_delegate_list(&state);
        prop_assert!(delegates.len() <= size as usize);
        prop_assert_eq!(delegates.len(), powers.len().min(size as usize));

        let elected = delegates.delegates();
        for pair in elected.windows(2) {
            let ordered = pair[0].voting_power > pair[1].voting_power
                || (pair[0].voting_power == pair[1].voting_power
                    && pair[0].pub_key >= pair[1].pub_key);
            prop_assert!(ordered, "delegates out of election order");
        }
    }

    /// Invariant 6: every staking body round-trips through the wire form.
    #[test]
    fn staking_body_roundtrip(
        option in any::<u32>(),
        holder in prop::array::uniform20(any::<u8>()),
        cand in prop::array::uniform20(any::<u8>()),
        name in prop::collection::vec(any::<u8>(), 0..32),
        port in any::<u16>(),
        id in prop::array::uniform32(any::<u8>()),
        amount in any::<u128>(),
        token in 0u8..=1,
        timestamp in any::<u64>(),
        nonce in any::<u64>(),
    ) {
        let body = StakingBody {
            opcode: Opcode::Candidate,
            version: 0,
            option,
            holder_addr: Address::new(holder),
            cand_addr: Address::new(cand),
            cand_name: name.clone(),
            cand_pub_key: name.clone(),
            cand_ip: name,
            cand_port: port,
            staking_id: Bytes32::new(id),
            amount: U256::from(amount),
            token,
            timestamp,
            nonce,
            extra_data: vec![],
        };
        let decoded = StakingBody::from_bytes(&body.to_bytes()).unwrap();
        prop_assert_eq!(decoded, body);
    }
}
