use anchor_lang::prelude::*;

use crate::error::AllocationError;

// 4 available_supply + 4 minted
pub const SUPPLY_CURSOR_SIZE: usize = 4 + 4;

/// Issues sequential unit ids out of a fixed supply.
///
/// Unit ownership itself is recorded by the off-program registry that consumes
/// the `UnitsMinted` events; this cursor only guarantees ids are handed out once
/// and never beyond `available_supply`. Ids start at 1.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupplyCursor {
    pub available_supply: u32,
    pub minted: u32,
}

impl SupplyCursor {
    pub fn new(available_supply: u32) -> Self {
        Self {
            available_supply,
            minted: 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.available_supply.saturating_sub(self.minted)
    }

    /// Reserves `count` ids and returns the first one, or `None` when `count` is zero.
    pub fn mint(&mut self, count: u32) -> Result<Option<u32>> {
        if count == 0 {
            return Ok(None);
        }
        require!(count <= self.remaining(), AllocationError::SupplyExhausted);

        let first_id = self
            .minted
            .checked_add(1)
            .ok_or(AllocationError::ArithmeticOverflow)?;
        self.minted = self
            .minted
            .checked_add(count)
            .ok_or(AllocationError::ArithmeticOverflow)?;

        Ok(Some(first_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_error;

    #[test]
    fn mints_sequential_ids_until_exhausted() {
        let mut cursor = SupplyCursor::new(10);

        assert_eq!(cursor.mint(0).unwrap(), None);
        assert_eq!(cursor.mint(3).unwrap(), Some(1));
        assert_eq!(cursor.mint(7).unwrap(), Some(4));
        assert_eq!(cursor.remaining(), 0);
        assert_error(cursor.mint(1), AllocationError::SupplyExhausted);
        assert_eq!(cursor.minted, 10);
    }
}
