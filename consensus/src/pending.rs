//! Parking lot for proposals whose parent has not arrived yet.

use std::collections::BTreeMap;
use volta_messages::ProposalMsg;
use volta_types::NetAddress;

/// Proposals parked by height until their parent is known.
///
/// Replay is monotonic: entries are drained in ascending height order and
/// everything below the replay floor is discarded.
#[derive(Debug, Default)]
pub struct PendingList {
    messages: BTreeMap<u64, (ProposalMsg, NetAddress)>,
}

impl PendingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a proposal. A later proposal for the same height replaces the
    /// earlier one.
    pub fn add(&mut self, msg: ProposalMsg, from: NetAddress) {
        self.messages.insert(msg.header.height, (msg, from));
    }

    pub fn get(&self, height: u64) -> Option<&(ProposalMsg, NetAddress)> {
        self.messages.get(&height)
    }

    /// Take the contiguous run of parked proposals starting at `height`.
    pub fn drain_from(&mut self, mut height: u64) -> Vec<(ProposalMsg, NetAddress)> {
        let mut run = Vec::new();
        while let Some(entry) = self.messages.remove(&height) {
            run.push(entry);
            height += 1;
        }
        run
    }

    /// Discard every entry below `height`.
    pub fn clean_up_to(&mut self, height: u64) {
        self.messages = self.messages.split_off(&height);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volta_messages::ConsensusHeader;

    fn proposal(height: u64) -> ProposalMsg {
        ProposalMsg {
            header: ConsensusHeader {
                height,
                round: height,
                epoch_id: 1,
                sender_addr: volta_types::Address::new([1u8; 20]),
                sender_index: 0,
                timestamp: 0,
                msg_type: 1,
                msg_subtype: 0,
            },
            parent_height: height - 1,
            parent_round: height - 1,
            proposer_id: vec![],
            proposed_block_type: 0,
            proposed_block: vec![],
            justify: vec![],
            timeout_cert: None,
        }
    }

    fn from() -> NetAddress {
        NetAddress::v4(10, 0, 0, 1, 8670)
    }

    #[test]
    fn drain_contiguous_run() {
        let mut pending = PendingList::new();
        pending.add(proposal(5), from());
        pending.add(proposal(6), from());
        pending.add(proposal(8), from());

        let run = pending.drain_from(5);
        assert_eq!(run.len(), 2);
        assert_eq!(run[0].0.header.height, 5);
        assert_eq!(run[1].0.header.height, 6);
        // Height 8 is beyond the gap and stays parked.
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn drain_from_missing_height_is_empty() {
        let mut pending = PendingList::new();
        pending.add(proposal(7), from());
        assert!(pending.drain_from(5).is_empty());
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn clean_up_discards_below_floor() {
        let mut pending = PendingList::new();
        pending.add(proposal(3), from());
        pending.add(proposal(4), from());
        pending.add(proposal(9), from());
        pending.clean_up_to(5);
        assert_eq!(pending.len(), 1);
        assert!(pending.get(9).is_some());
    }

    #[test]
    fn same_height_replaced() {
        let mut pending = PendingList::new();
        pending.add(proposal(5), from());
        pending.add(proposal(5), NetAddress::v4(10, 0, 0, 2, 8670));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.get(5).unwrap().1, NetAddress::v4(10, 0, 0, 2, 8670));
    }
}
