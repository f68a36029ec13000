use anchor_lang::prelude::*;

use crate::{error::AllocationError, state::bid_ledger::BidId};

/// Upper bound on bids a single address may hold in one auction.
pub const MAX_BIDS_PER_ADDRESS: usize = 16;

// 8 discriminator + 32 auction + 32 owner + 4 vec len + 4 * MAX_BIDS_PER_ADDRESS + 1 bump
pub const BIDDER_INDEX_ACCOUNT_SIZE: usize = 8 + 32 + 32 + 4 + 4 * MAX_BIDS_PER_ADDRESS + 1;

/// Per-bidder list of bid ids in one auction.
/// PDA with seeds ["bidder_index", auction_key, owner_key].
#[account]
pub struct BidderIndex {
    pub auction: Pubkey,
    pub owner: Pubkey,
    pub bid_ids: Vec<BidId>,
    pub bump: u8,
}

impl BidderIndex {
    pub fn ensure_owner(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(self.owner, *signer, AllocationError::OwnerMismatch);
        Ok(())
    }
}
