use anchor_lang::prelude::*;

use crate::error::AllocationError;

// 8 discriminator + 32 owner + 4 ticket_count + 1 refunded + 1 bump
pub const TICKET_BALANCE_ACCOUNT_SIZE: usize = 8 + 32 + 4 + 1 + 1;

#[account]
pub struct TicketBalance {
    pub owner: Pubkey,
    pub ticket_count: u32,
    pub refunded: bool,
    pub bump: u8,
}

impl TicketBalance {
    pub fn ensure_owner(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(self.owner, *signer, AllocationError::OwnerMismatch);
        Ok(())
    }
}
