//! The HotStuff-style pacemaker.
//!
//! One logical actor per replica: inbound consensus messages, timer expiry
//! and local proposal builds are all serialised through [`Pacemaker`]'s
//! handler methods, so the proposal map and chain state need no locks.
//! Network sends are fire-and-forget through [`MsgOutbound`].

use crate::committee::Committee;
use crate::error::ConsensusError;
use crate::pending::PendingList;
use crate::pm_block::{ExecutedInfo, PmBlock};
use crate::timeout::{verify_timeout_cert, RoundTimer};
use crate::vote::{verify_qc, VoteCollector};
use std::collections::{BTreeMap, BTreeSet};
use volta_block::{Block, BlockType, QuorumCert};
use volta_crypto::{vote_hash, BlsKeyPair};
use volta_messages::{
    decode_qc, ConsensusHeader, ConsensusMessage, NewViewMsg, ProposalMsg, QueryProposalMsg,
    TimeoutCertMsg, VoteMsg,
};
use volta_types::params::SAFETY_HOP_LIMIT;
use volta_types::{Address, NetAddress};

/// Fire-and-forget message delivery to a peer.
pub trait MsgOutbound {
    fn send(&mut self, peer: NetAddress, payload: Vec<u8>);
}

/// The pacemaker's window into block building, execution and the chain.
///
/// `commit_block` returns the next epoch's committee when the committed
/// block was a K-block (its commit ran the governing pass).
pub trait ChainDriver {
    fn next_block_type(&mut self, height: u64) -> BlockType;

    fn build_block(
        &mut self,
        parent: Option<&Block>,
        height: u64,
        block_type: BlockType,
        now: u64,
    ) -> Result<(Block, ExecutedInfo), ConsensusError>;

    fn process_proposed_block(
        &mut self,
        parent: Option<&Block>,
        block: &Block,
        now: u64,
    ) -> Result<ExecutedInfo, ConsensusError>;

    fn commit_block(&mut self, block: &Block) -> Result<Option<Committee>, ConsensusError>;
}

const BLOCK_TYPE_M: u8 = 0;
const BLOCK_TYPE_K: u8 = 1;
const BLOCK_TYPE_STOP: u8 = 2;

fn block_type_byte(bt: BlockType) -> u8 {
    match bt {
        BlockType::MBlock => BLOCK_TYPE_M,
        BlockType::KBlock => BLOCK_TYPE_K,
        BlockType::StopCommittee => BLOCK_TYPE_STOP,
    }
}

fn block_type_from_byte(raw: u8) -> Result<BlockType, ConsensusError> {
    match raw {
        BLOCK_TYPE_M => Ok(BlockType::MBlock),
        BLOCK_TYPE_K => Ok(BlockType::KBlock),
        BLOCK_TYPE_STOP => Ok(BlockType::StopCommittee),
        other => Err(ConsensusError::Decode(format!(
            "unknown block type byte {other}"
        ))),
    }
}

/// HotStuff-style pacemaker state machine.
pub struct Pacemaker<O: MsgOutbound, D: ChainDriver> {
    committee: Committee,
    my_index: usize,
    my_address: Address,
    my_pub_key: Vec<u8>,
    bls_key: BlsKeyPair,
    epoch: u64,

    current_round: u64,
    current_height: u64,
    block_leaf: u64,
    block_locked: u64,
    block_executed: u64,
    qc_high: QuorumCert,

    proposal_map: BTreeMap<u64, PmBlock>,
    certified: BTreeMap<u64, QuorumCert>,
    votes: VoteCollector,
    pending: PendingList,
    new_views: BTreeMap<u64, BTreeSet<u32>>,
    pub timer: RoundTimer,

    outbound: O,
    driver: D,
}

impl<O: MsgOutbound, D: ChainDriver> Pacemaker<O, D> {
    pub fn new(
        committee: Committee,
        my_index: usize,
        my_pub_key: Vec<u8>,
        bls_key: BlsKeyPair,
        outbound: O,
        driver: D,
    ) -> Self {
        let epoch = committee.epoch;
        let my_address = committee
            .member(my_index)
            .map(|m| m.address)
            .unwrap_or(Address::ZERO);
        let size = committee.size();
        Self {
            committee,
            my_index,
            my_address,
            my_pub_key,
            bls_key,
            epoch,
            current_round: 0,
            current_height: 1,
            block_leaf: 0,
            block_locked: 0,
            block_executed: 0,
            qc_high: QuorumCert::genesis(),
            proposal_map: BTreeMap::new(),
            certified: BTreeMap::new(),
            votes: VoteCollector::new(size),
            pending: PendingList::new(),
            new_views: BTreeMap::new(),
            timer: RoundTimer::new(),
            outbound,
            driver,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn current_round(&self) -> u64 {
        self.current_round
    }

    pub fn current_height(&self) -> u64 {
        self.current_height
    }

    pub fn block_leaf(&self) -> u64 {
        self.block_leaf
    }

    pub fn block_locked(&self) -> u64 {
        self.block_locked
    }

    pub fn block_executed(&self) -> u64 {
        self.block_executed
    }

    pub fn qc_high(&self) -> &QuorumCert {
        &self.qc_high
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn committee(&self) -> &Committee {
        &self.committee
    }

    pub fn proposal(&self, height: u64) -> Option<&PmBlock> {
        self.proposal_map.get(&height)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn my_net_addr(&self) -> NetAddress {
        self.committee
            .member(self.my_index)
            .map(|m| m.net_addr)
            .unwrap_or_else(|| NetAddress::v4(127, 0, 0, 1, 0))
    }

    fn am_i_proposer(&self, round: u64) -> bool {
        self.committee
            .leader_for_round(round)
            .map(|m| m.address == self.my_address)
            .unwrap_or(false)
    }

    fn header(&self, height: u64, round: u64, msg_type: u8) -> ConsensusHeader {
        ConsensusHeader {
            height,
            round,
            epoch_id: self.epoch,
            sender_addr: self.my_address,
            sender_index: self.my_index as u32,
            timestamp: 0,
            msg_type,
            msg_subtype: 0,
        }
    }

    // ── Message delivery ────────────────────────────────────────────────

    fn encode(&self, msg: &ConsensusMessage) -> Result<Vec<u8>, ConsensusError> {
        // Corruption in a locally built message is unrecoverable.
        msg.encode()
            .map_err(|e| ConsensusError::Fatal(e.to_string()))
    }

    fn broadcast(&mut self, msg: &ConsensusMessage) -> Result<(), ConsensusError> {
        let payload = self.encode(msg)?;
        for peer in self.committee.peers_except(self.my_index) {
            tracing::debug!(to = %peer, kind = msg.type_name(), "sending pacemaker msg");
            self.outbound.send(peer, payload.clone());
        }
        Ok(())
    }

    fn send_to(&mut self, peer: NetAddress, msg: &ConsensusMessage) -> Result<(), ConsensusError> {
        let payload = self.encode(msg)?;
        tracing::debug!(to = %peer, kind = msg.type_name(), "sending pacemaker msg");
        self.outbound.send(peer, payload);
        Ok(())
    }

    // ── Event entry point ───────────────────────────────────────────────

    /// Handle one inbound message. Per-message errors are logged and
    /// swallowed; only [`ConsensusError::Fatal`] is surfaced to the actor.
    pub fn handle_message(
        &mut self,
        msg: ConsensusMessage,
        from: NetAddress,
        now: u64,
    ) -> Result<(), ConsensusError> {
        let result = match msg {
            ConsensusMessage::Proposal(m) => self.on_proposal(m, from, now),
            ConsensusMessage::Vote(m) => self.on_vote(m, now),
            ConsensusMessage::NewView(m) => self.on_new_view(m, now),
            ConsensusMessage::QueryProposal(m) => self.on_query_proposal(m),
            ConsensusMessage::TimeoutCert(_) => Ok(()),
        };
        match result {
            Err(ConsensusError::Fatal(e)) => Err(ConsensusError::Fatal(e)),
            Err(e) => {
                tracing::warn!(%from, error = %e, "pacemaker message dropped");
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    // ── Proposing ───────────────────────────────────────────────────────

    /// Build and broadcast a proposal for `(height, round)`. The proposer
    /// also records its own vote share directly.
    pub fn on_beat(&mut self, height: u64, round: u64, now: u64) -> Result<(), ConsensusError> {
        if !self.am_i_proposer(round) {
            return Err(ConsensusError::NotProposer(round));
        }

        let block_type = self.driver.next_block_type(height);
        let parent = self.decode_block_at(height.wrapping_sub(1));
        let (block, info) = self
            .driver
            .build_block(parent.as_ref(), height, block_type, now)?;
        let block_id = block.id();
        let justify = self.qc_high.clone();

        let pm = PmBlock {
            height,
            round,
            parent_height: height - 1,
            justify: justify.clone(),
            block_type,
            proposed_block: block.to_bytes(),
            block_id,
            executed: Some(info),
            success_processed: true,
        };
        tracing::info!(entry = %pm.compact(), "proposing");
        self.proposal_map.insert(height, pm);
        self.block_leaf = self.block_leaf.max(height);
        self.current_height = height;
        self.current_round = round;

        let msg = ConsensusMessage::Proposal(ProposalMsg {
            header: self.header(height, round, 1),
            parent_height: height - 1,
            parent_round: self.qc_high.qc_round,
            proposer_id: self.my_pub_key.clone(),
            proposed_block_type: block_type_byte(block_type),
            proposed_block: block.to_bytes(),
            justify: justify.to_bytes(),
            timeout_cert: None,
        });
        self.broadcast(&msg)?;

        // Leader's own vote.
        self.votes.reset(self.committee.size());
        let msg_hash = vote_hash(height, round, &block_id);
        let share = self.bls_key.sign(msg_hash.as_bytes());
        self.votes.collect(
            &self.committee,
            self.my_index as u32,
            msg_hash,
            &share.to_bytes(),
        )?;
        Ok(())
    }

    // ── Proposal handling ───────────────────────────────────────────────

    fn on_proposal(
        &mut self,
        msg: ProposalMsg,
        from: NetAddress,
        now: u64,
    ) -> Result<(), ConsensusError> {
        let height = msg.header.height;
        let round = msg.header.round;

        if msg.header.epoch_id != self.epoch {
            return Err(ConsensusError::WrongEpoch {
                got: msg.header.epoch_id,
                current: self.epoch,
            });
        }
        if self.proposal_map.contains_key(&height) {
            tracing::debug!(height, "proposal already known");
            return Ok(());
        }

        // Park the proposal and query for the missing parent.
        let parent_known = msg.parent_height == 0
            || msg.parent_height <= self.block_executed
            || self.proposal_map.contains_key(&msg.parent_height);
        if !parent_known {
            return self.pending_proposal(msg, from);
        }

        let justify = decode_qc(&msg.justify).map_err(|e| ConsensusError::Decode(e.to_string()))?;
        verify_qc(&justify, &self.committee)?;
        if justify.qc_round < self.qc_high.qc_round {
            return Err(ConsensusError::StaleJustify {
                justify: justify.qc_round,
                qc_high: self.qc_high.qc_round,
            });
        }
        if let Some(tc) = &msg.timeout_cert {
            if !verify_timeout_cert(Some(tc), height, round) {
                return Err(ConsensusError::TimeoutCertMismatch);
            }
        }

        let block_type = block_type_from_byte(msg.proposed_block_type)?;
        self.validate_stop_committee(block_type, height)?;

        let block =
            Block::from_bytes(&msg.proposed_block).map_err(|e| ConsensusError::Decode(e.to_string()))?;
        let block_id = block.id();

        // Safety: the proposal must extend the locked block.
        if !self.extends_locked(msg.parent_height) {
            return Err(ConsensusError::SafetyViolation);
        }

        // Re-execute against the parent's post-state. A rejected block is
        // recorded but never voted for.
        let parent = self.decode_block_at(msg.parent_height);
        let (executed, success) = match self.driver.process_proposed_block(parent.as_ref(), &block, now)
        {
            Ok(info) => (Some(info), true),
            Err(e) => {
                tracing::error!(height, error = %e, "block execution failed");
                (None, false)
            }
        };

        let pm = PmBlock {
            height,
            round,
            parent_height: msg.parent_height,
            justify: justify.clone(),
            block_type,
            proposed_block: msg.proposed_block.clone(),
            block_id,
            executed,
            success_processed: success,
        };
        tracing::info!(entry = %pm.compact(), success, "validated proposal");
        self.proposal_map.insert(height, pm);
        self.block_leaf = self.block_leaf.max(height);
        self.current_height = self.current_height.max(height);

        // A K-block commit inside the registration rolls the epoch; the
        // proposal that carried the final certificate is not voted on.
        if self.register_qc(justify)? {
            return Ok(());
        }

        if !success {
            self.replay_pending(height, now);
            return Err(ConsensusError::Execution("proposal not voted for".into()));
        }

        // Vote, to the round leader only.
        let msg_hash = vote_hash(height, round, &block_id);
        let share = self.bls_key.sign(msg_hash.as_bytes());
        let vote = ConsensusMessage::Vote(VoteMsg {
            header: self.header(height, round, 2),
            voter_id: self.my_pub_key.clone(),
            voter_index: self.my_index as u32,
            signed_message_hash: msg_hash,
            voter_signature: share.to_bytes().to_vec(),
        });
        if let Some(leader) = self.committee.leader_for_round(round) {
            let leader_addr = leader.net_addr;
            if leader.address == self.my_address {
                // Our own pending proposal replayed; vote directly.
                self.votes.collect(
                    &self.committee,
                    self.my_index as u32,
                    msg_hash,
                    &share.to_bytes(),
                )?;
            } else {
                self.send_to(leader_addr, &vote)?;
            }
        }

        self.current_round = self.current_round.max(round);
        self.timer.on_progress();
        self.replay_pending(height, now);
        Ok(())
    }

    /// A StopCommittee block must directly follow a K-block, or be the
    /// second stop block whose grandparent is a K-block.
    fn validate_stop_committee(
        &self,
        block_type: BlockType,
        height: u64,
    ) -> Result<(), ConsensusError> {
        if block_type != BlockType::StopCommittee {
            return Ok(());
        }
        let parent = self
            .proposal_map
            .get(&(height - 1))
            .ok_or(ConsensusError::ParentMissing(height - 1))?;
        match parent.block_type {
            BlockType::KBlock => Ok(()),
            BlockType::StopCommittee => {
                let grandparent = self
                    .proposal_map
                    .get(&(height - 2))
                    .ok_or(ConsensusError::ParentMissing(height - 2))?;
                if grandparent.block_type == BlockType::KBlock {
                    Ok(())
                } else {
                    Err(ConsensusError::BadStopCommittee(height))
                }
            }
            BlockType::MBlock => Err(ConsensusError::BadStopCommittee(height)),
        }
    }

    /// Walk parent links (≤ 10 hops) looking for the locked block.
    fn extends_locked(&self, parent_height: u64) -> bool {
        if self.block_locked == 0 {
            return true;
        }
        let mut cursor = parent_height;
        for _ in 0..SAFETY_HOP_LIMIT {
            if cursor == self.block_locked {
                return true;
            }
            match self.proposal_map.get(&cursor) {
                Some(entry) => cursor = entry.parent_height,
                None => return false,
            }
        }
        false
    }

    fn decode_block_at(&self, height: u64) -> Option<Block> {
        let entry = self.proposal_map.get(&height)?;
        Block::from_bytes(&entry.proposed_block).ok()
    }

    // ── Pending / query ─────────────────────────────────────────────────

    fn pending_proposal(&mut self, msg: ProposalMsg, from: NetAddress) -> Result<(), ConsensusError> {
        let query_height = msg.parent_height;
        let query_round = msg.parent_round;

        // If the sender is ourselves, query another committee member.
        let mut target = from;
        if target == self.my_net_addr() {
            if let Some(peer) = self
                .committee
                .peers_except(self.my_index)
                .first()
                .copied()
            {
                tracing::warn!(peer = %peer, "redirecting proposal query to another member");
                target = peer;
            }
        }

        let query = ConsensusMessage::QueryProposal(QueryProposalMsg {
            header: self.header(query_height, query_round, 4),
            query_height,
            query_round,
            return_addr: self.my_net_addr(),
        });
        self.send_to(target, &query)?;

        tracing::info!(
            height = msg.header.height,
            missing_parent = query_height,
            "parking proposal, parent unknown"
        );
        self.pending.add(msg, from);
        Ok(())
    }

    /// Replay parked proposals monotonically above `cur_height`, then drop
    /// everything at or below the replay floor.
    fn replay_pending(&mut self, cur_height: u64, now: u64) {
        let run = self.pending.drain_from(cur_height + 1);
        let floor = cur_height + 1 + run.len() as u64;
        for (msg, from) in run {
            tracing::info!(height = msg.header.height, "replaying pending proposal");
            if let Err(e) = self.on_proposal(msg, from, now) {
                tracing::warn!(error = %e, "pending replay stopped");
                break;
            }
        }
        self.pending.clean_up_to(floor);
    }

    fn on_query_proposal(&mut self, msg: QueryProposalMsg) -> Result<(), ConsensusError> {
        let Some(entry) = self.proposal_map.get(&msg.query_height) else {
            tracing::info!(height = msg.query_height, "queried proposal unknown");
            return Ok(());
        };
        let answer = ConsensusMessage::Proposal(ProposalMsg {
            header: self.header(entry.height, entry.round, 1),
            parent_height: entry.parent_height,
            parent_round: entry.justify.qc_round,
            proposer_id: self.my_pub_key.clone(),
            proposed_block_type: block_type_byte(entry.block_type),
            proposed_block: entry.proposed_block.clone(),
            justify: entry.justify.to_bytes(),
            timeout_cert: None,
        });
        self.send_to(msg.return_addr, &answer)
    }

    // ── Voting / QC formation ───────────────────────────────────────────

    fn on_vote(&mut self, msg: VoteMsg, now: u64) -> Result<(), ConsensusError> {
        let round = msg.header.round;
        if round != self.current_round || !self.am_i_proposer(round) {
            tracing::debug!(round, current = self.current_round, "vote ignored");
            return Ok(());
        }

        self.votes.collect(
            &self.committee,
            msg.voter_index,
            msg.signed_message_hash,
            &msg.voter_signature,
        )?;

        if !self.votes.has_quorum(&self.committee) {
            return Ok(());
        }

        let height = msg.header.height;
        let qc = self.votes.build_qc(height, round, self.epoch)?;
        tracing::info!(qc = %qc.compact(), votes = self.votes.count(), "quorum formed");
        self.votes.reset(self.committee.size());

        let rolled_over = self.register_qc(qc)?;
        if rolled_over {
            return Ok(());
        }

        // Drive the next round with the fresh certificate as justify. When
        // the rotation hands the next round to another member, pass it the
        // certificate instead.
        self.timer.on_progress();
        let next_height = height + 1;
        let next_round = round + 1;
        if self.am_i_proposer(next_round) {
            return self.on_beat(next_height, next_round, now);
        }
        self.current_round = next_round;
        let handoff = ConsensusMessage::NewView(NewViewMsg {
            header: self.header(next_height, next_round, 3),
            qc_high: self.qc_high.to_bytes(),
            timeout_cert: None,
        });
        if let Some(leader) = self.committee.leader_for_round(next_round) {
            let leader_addr = leader.net_addr;
            self.send_to(leader_addr, &handoff)?;
        }
        Ok(())
    }

    /// Record a certificate: raise `qc_high`, advance the 2-chain lock and
    /// commit the 3-chain head. Returns `true` if a K-block commit rolled
    /// the epoch over.
    fn register_qc(&mut self, qc: QuorumCert) -> Result<bool, ConsensusError> {
        if qc.is_genesis() {
            return Ok(false);
        }
        let higher = self.qc_high.is_genesis()
            || qc.qc_height > self.qc_high.qc_height
            || (qc.qc_height == self.qc_high.qc_height && qc.qc_round > self.qc_high.qc_round);
        if higher {
            self.qc_high = qc.clone();
        }
        let h = qc.qc_height;
        self.certified.insert(h, qc);

        // 2-chain: h certified on top of h-1 locks h-1.
        if h >= 1 && self.certified.contains_key(&(h - 1)) {
            self.block_locked = self.block_locked.max(h - 1);
        }

        // 3-chain: h, h-1, h-2 all certified commits h-2.
        if h >= 2 && self.certified.contains_key(&(h - 1)) && self.certified.contains_key(&(h - 2))
        {
            return self.commit_up_to(h - 2);
        }
        Ok(false)
    }

    fn commit_up_to(&mut self, target: u64) -> Result<bool, ConsensusError> {
        while self.block_executed < target {
            let next = self.block_executed + 1;
            let Some(entry) = self.proposal_map.get(&next) else {
                tracing::warn!(height = next, "commit target not in proposal map");
                return Ok(false);
            };
            let block = Block::from_bytes(&entry.proposed_block)
                .map_err(|e| ConsensusError::Decode(e.to_string()))?;
            tracing::info!(height = next, "committing block");
            let next_committee = self.driver.commit_block(&block)?;
            self.block_executed = next;

            if let Some(committee) = next_committee {
                self.roll_epoch(committee, next);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// K-block committed: adopt the next committee and reset per-epoch
    /// state. `block_executed` survives.
    fn roll_epoch(&mut self, committee: Committee, kblock_height: u64) {
        tracing::info!(
            old_epoch = self.epoch,
            new_epoch = committee.epoch,
            members = committee.size(),
            "epoch rollover"
        );
        // Seed the new view with the K-block's own certificate.
        self.qc_high = self
            .certified
            .get(&kblock_height)
            .cloned()
            .unwrap_or_else(QuorumCert::genesis);

        self.my_index = committee.index_of(&self.my_address).unwrap_or(usize::MAX);
        self.epoch = committee.epoch;
        self.votes.reset(committee.size());
        self.committee = committee;
        self.proposal_map.clear();
        self.certified.clear();
        self.pending.clear();
        self.new_views.clear();
        self.current_round = 0;
        self.block_locked = self.block_executed;
        self.block_leaf = self.block_executed;
        self.current_height = self.block_executed + 1;
        self.timer.on_progress();
    }

    // ── Timeouts / view changes ─────────────────────────────────────────

    /// The round deadline fired: tell the next leader and move on.
    pub fn on_round_timeout(&mut self, _now: u64) -> Result<(), ConsensusError> {
        self.timer.on_timeout();
        let expired_round = self.current_round;
        let next_round = expired_round + 1;
        tracing::warn!(round = expired_round, "round timed out");

        let new_view = ConsensusMessage::NewView(NewViewMsg {
            header: self.header(self.current_height, next_round, 3),
            qc_high: self.qc_high.to_bytes(),
            timeout_cert: Some(TimeoutCertMsg {
                timeout_height: self.current_height,
                timeout_round: expired_round,
            }),
        });
        if let Some(leader) = self.committee.leader_for_round(next_round) {
            if leader.address != self.my_address {
                self.send_to(leader.net_addr, &new_view)?;
            } else {
                // We lead the next round; our own expiry counts as a view.
                self.new_views
                    .entry(next_round)
                    .or_default()
                    .insert(self.my_index as u32);
            }
        }
        self.current_round = next_round;
        Ok(())
    }

    fn on_new_view(&mut self, msg: NewViewMsg, now: u64) -> Result<(), ConsensusError> {
        if msg.header.epoch_id != self.epoch {
            return Err(ConsensusError::WrongEpoch {
                got: msg.header.epoch_id,
                current: self.epoch,
            });
        }
        let round = msg.header.round;

        if let Some(tc) = &msg.timeout_cert {
            if !verify_timeout_cert(Some(tc), msg.header.height, round) {
                return Err(ConsensusError::TimeoutCertMismatch);
            }
        }

        let qc = decode_qc(&msg.qc_high).map_err(|e| ConsensusError::Decode(e.to_string()))?;
        verify_qc(&qc, &self.committee)?;
        self.register_qc(qc.clone())?;

        if !self.am_i_proposer(round) {
            return Ok(());
        }
        let senders = self.new_views.entry(round).or_default();
        senders.insert(msg.header.sender_index);
        let count = senders.len();

        // The round starts on ⅔ distinct expiries, or immediately on a
        // fresh certificate handed off by the previous round's leader.
        let fresh_handoff = msg.timeout_cert.is_none() && qc.qc_round + 1 == round;
        if (self.committee.quorum_met(count) || fresh_handoff) && round >= self.current_round {
            tracing::info!(round, views = count, fresh_handoff, "starting round");
            self.new_views.remove(&round);
            self.current_round = round;
            let next_height = (self.block_leaf.max(qc.qc_height)) + 1;
            return self.on_beat(next_height, round, now);
        }
        Ok(())
    }
}
