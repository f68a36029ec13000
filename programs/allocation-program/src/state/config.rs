use anchor_lang::prelude::*;

// 8 discriminator + 32 payout_authority + 32 management_authority + 32 upgrade_authority
// + 32 randomness_authority + 1 bump + 8 sale_counter + 8 entropy_request_counter
pub const CONFIG_ACCOUNT_SIZE: usize = 8 + 32 + 32 + 32 + 32 + 1 + 8 + 8;

#[account]
pub struct Config {
    pub payout_authority: Pubkey,
    pub management_authority: Pubkey,
    pub upgrade_authority: Pubkey,
    /// Oracle identity allowed to deliver seeds for pending entropy requests.
    pub randomness_authority: Pubkey,
    pub bump: u8,
    pub sale_counter: u64,
    pub entropy_request_counter: u64,
}
