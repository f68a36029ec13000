use crate::state::{Config, CONFIG_ACCOUNT_SIZE};
use anchor_lang::prelude::*;

/// Instruction to initialize the program configuration
/// This should be called once during program deployment
///
/// # Security Considerations
/// - Creates a PDA with seed "config" to store program authorities
/// - Only needs to be called once during deployment
/// - The caller of this instruction must be the owner of the program
/// - The management authority creates auctions and raffles
/// - The payout authority receives sale proceeds
/// - The randomness authority is the only signer allowed to deliver raffle seeds
///
/// # Account Validations
/// * Config - New PDA initialized with proper space allocation
/// * Upgrade Authority - Signer needs to be the owner of the program
pub fn init_config(ctx: Context<InitConfig>) -> Result<()> {
    let config = &mut ctx.accounts.config;
    config.payout_authority = ctx.accounts.payout_authority.key();
    config.management_authority = ctx.accounts.management_authority.key();
    config.upgrade_authority = ctx.accounts.upgrade_authority.key();
    config.randomness_authority = ctx.accounts.randomness_authority.key();
    config.bump = ctx.bumps.config;
    config.sale_counter = 0;
    config.entropy_request_counter = 0;
    Ok(())
}

#[derive(Accounts)]
pub struct InitConfig<'info> {
    #[account(
        init,
        payer = upgrade_authority,
        space = CONFIG_ACCOUNT_SIZE,
        seeds = [b"config"],
        bump
    )]
    pub config: Account<'info, Config>,

    #[account(mut)]
    pub upgrade_authority: Signer<'info>,
    pub payout_authority: SystemAccount<'info>,
    pub management_authority: SystemAccount<'info>,
    /// CHECK: Only stored; deliveries are checked against it with `has_one`.
    pub randomness_authority: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}
