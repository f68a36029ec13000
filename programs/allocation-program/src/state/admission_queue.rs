use anchor_lang::prelude::*;

use crate::{error::AllocationError, state::bid_ledger::BidId};

// 8 price + 4 sequence + 4 filled
pub const HEAP_NODE_SIZE: usize = 8 + 4 + 4;
// 4 bid_id + 4 slot
pub const QUEUE_SLOT_SIZE: usize = 4 + 4;

/// An admitted bid. The sequence is the bid id, which is assigned in arrival
/// order and therefore breaks price ties deterministically.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapNode {
    pub price: u64,
    pub sequence: BidId,
    /// Units of this bid currently admitted. Never zero while queued.
    pub filled: u32,
}

impl HeapNode {
    /// Whether `self` is closer to eviction than `other`: lower price first, and
    /// among equal prices the later arrival first.
    fn precedes(&self, other: &HeapNode) -> bool {
        self.price < other.price || (self.price == other.price && self.sequence > other.sequence)
    }
}

/// Where a queued bid currently sits in the heap arena.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueSlot {
    pub bid_id: BidId,
    pub slot: u32,
}

/// Min-heap of admitted bids stored as an arena array, with a slot map from
/// bid id to heap index so any bid can be found and removed by id.
///
/// Only admitted bids are held, and each holds at least one unit, so the queue
/// never grows past the sale's supply plus the bid being admitted. Bid ids are
/// queued in increasing order, which keeps `slots` sorted by id without any
/// reordering.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq)]
pub struct AdmissionQueue {
    nodes: Vec<HeapNode>,
    slots: Vec<QueueSlot>,
}

impl AdmissionQueue {
    /// Serialized size for a queue that will hold at most `capacity` bids.
    pub const fn space(capacity: usize) -> usize {
        4 + HEAP_NODE_SIZE * capacity + 4 + QUEUE_SLOT_SIZE * capacity
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn insert(&mut self, price: u64, bid_id: BidId, filled: u32) -> Result<()> {
        require!(
            self.slots.last().map_or(true, |last| last.bid_id < bid_id),
            AllocationError::QueueInvariantViolated
        );

        let slot = self.nodes.len();
        self.nodes.push(HeapNode {
            price,
            sequence: bid_id,
            filled,
        });
        self.slots.push(QueueSlot {
            bid_id,
            slot: slot as u32,
        });
        self.sift_up(slot);
        Ok(())
    }

    pub fn peek_min(&self) -> Option<&HeapNode> {
        self.nodes.first()
    }

    pub fn delete_min(&mut self) -> Option<HeapNode> {
        let bid_id = self.nodes.first()?.sequence;
        self.remove(bid_id)
    }

    /// Removes a queued bid by id, wherever it sits in the heap.
    pub fn remove(&mut self, bid_id: BidId) -> Option<HeapNode> {
        let slot = self.slot_of(bid_id)?;
        let last = self.nodes.len() - 1;
        self.swap(slot, last);
        let removed = self.nodes.pop()?;
        if let Ok(position) = self.position_of(removed.sequence) {
            self.slots.remove(position);
        }
        if slot < self.nodes.len() {
            self.sift_down(slot);
            self.sift_up(slot);
        }
        Some(removed)
    }

    /// Takes `by` units off the minimum bid, which stays queued.
    /// The key does not change, so heap order is unaffected.
    pub fn shrink_min(&mut self, by: u32) -> Result<u32> {
        let node = self
            .nodes
            .first_mut()
            .ok_or(AllocationError::QueueInvariantViolated)?;
        require!(by < node.filled, AllocationError::QueueInvariantViolated);
        node.filled -= by;
        Ok(node.filled)
    }

    /// Units admitted for `bid_id`; zero once it has been evicted.
    pub fn filled_of(&self, bid_id: BidId) -> u32 {
        self.slot_of(bid_id)
            .map_or(0, |slot| self.nodes[slot].filled)
    }

    fn position_of(&self, bid_id: BidId) -> std::result::Result<usize, usize> {
        self.slots.binary_search_by_key(&bid_id, |entry| entry.bid_id)
    }

    fn slot_of(&self, bid_id: BidId) -> Option<usize> {
        self.position_of(bid_id)
            .ok()
            .map(|position| self.slots[position].slot as usize)
    }

    fn set_slot(&mut self, bid_id: BidId, slot: usize) {
        if let Ok(position) = self.position_of(bid_id) {
            self.slots[position].slot = slot as u32;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.nodes.swap(a, b);
        self.set_slot(self.nodes[a].sequence, a);
        self.set_slot(self.nodes[b].sequence, b);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.nodes[slot].precedes(&self.nodes[parent]) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * slot + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.nodes[right].precedes(&self.nodes[left]) {
                right
            } else {
                left
            };
            if !self.nodes[child].precedes(&self.nodes[slot]) {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
    }
}
