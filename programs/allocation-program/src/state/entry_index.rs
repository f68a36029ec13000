use anchor_lang::prelude::*;

use crate::error::AllocationError;

// 32 buyer + 4 range_start + 4 quantity
pub const RAFFLE_ENTRY_SIZE: usize = 32 + 4 + 4;

/// One purchase: tickets `[range_start, range_start + quantity)` belong to `buyer`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaffleEntry {
    pub buyer: Pubkey,
    pub range_start: u32,
    pub quantity: u32,
}

impl RaffleEntry {
    pub fn contains(&self, ticket: u32) -> bool {
        ticket >= self.range_start && ticket - self.range_start < self.quantity
    }
}

/// Contiguous ticket ranges over a virtual ticket array, in purchase order.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq)]
pub struct EntryRangeIndex {
    entries: Vec<RaffleEntry>,
    total_tickets: u32,
}

impl EntryRangeIndex {
    pub const fn space(capacity: usize) -> usize {
        4 + RAFFLE_ENTRY_SIZE * capacity + 4
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total_tickets(&self) -> u32 {
        self.total_tickets
    }

    pub fn append(&mut self, buyer: Pubkey, quantity: u32) -> Result<RaffleEntry> {
        require!(quantity > 0, AllocationError::InvalidQuantity);
        let total_tickets = self
            .total_tickets
            .checked_add(quantity)
            .ok_or(AllocationError::ArithmeticOverflow)?;

        let entry = RaffleEntry {
            buyer,
            range_start: self.total_tickets,
            quantity,
        };
        self.entries.push(entry);
        self.total_tickets = total_tickets;

        Ok(entry)
    }

    /// The entry owning `ticket`, found by binary search over range starts.
    pub fn owner_of(&self, ticket: u32) -> Option<&RaffleEntry> {
        let position = self
            .entries
            .partition_point(|entry| entry.range_start <= ticket);
        self.entries
            .get(position.checked_sub(1)?)
            .filter(|entry| entry.contains(ticket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_error;

    #[test]
    fn ranges_are_contiguous_and_resolve_to_their_buyer() {
        let mut index = EntryRangeIndex::default();
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());

        assert_eq!(index.append(alice, 3).unwrap().range_start, 0);
        assert_eq!(index.append(bob, 5).unwrap().range_start, 3);
        assert_eq!(index.append(alice, 1).unwrap().range_start, 8);
        assert_eq!(index.total_tickets(), 9);

        let owners: Vec<Pubkey> = (0..9).map(|t| index.owner_of(t).unwrap().buyer).collect();
        assert_eq!(
            owners,
            vec![alice, alice, alice, bob, bob, bob, bob, bob, alice]
        );
        assert!(index.owner_of(9).is_none());
        assert!(index.owner_of(4).unwrap().contains(7));
        assert!(!index.owner_of(4).unwrap().contains(8));
    }

    #[test]
    fn rejects_empty_entries_and_counter_overflow() {
        let mut index = EntryRangeIndex::default();
        assert_error(
            index.append(Pubkey::new_unique(), 0),
            AllocationError::InvalidQuantity,
        );
        index.append(Pubkey::new_unique(), u32::MAX).unwrap();
        assert_error(
            index.append(Pubkey::new_unique(), 1),
            AllocationError::ArithmeticOverflow,
        );
        assert_eq!(index.entry_count(), 1);
        assert!(index.owner_of(0).is_some());
    }
}
