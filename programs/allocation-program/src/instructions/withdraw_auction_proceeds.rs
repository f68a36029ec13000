use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    state::{Auction, Config, Treasury},
    utils::pay_from_treasury,
};

/// Event emitted when sale proceeds are paid out
#[event]
pub struct ProceedsWithdrawn {
    pub sale: Pubkey,
    /// Amount withdrawn in lamports
    pub amount: u64,
}

/// Instruction to pay the auction proceeds to the payout authority
///
/// Proceeds are the clearing price times every filled unit. They are paid
/// exactly once; later calls move nothing. Refunds owed to bidders stay in
/// the treasury.
///
/// # Account Validations
/// * Signer - Must be the management authority
/// * Payout authority - Must match the config
/// * Treasury - Must match the auction's treasury and use proper PDA seeds
pub fn withdraw_auction_proceeds(ctx: Context<WithdrawAuctionProceeds>) -> Result<()> {
    ctx.accounts
        .auction
        .ensure_treasury(&ctx.accounts.treasury.key())?;

    let now = Clock::get()?.unix_timestamp;
    let auction_key = ctx.accounts.auction.key();
    let amount = ctx.accounts.auction.withdraw_proceeds(now)?;
    if amount == 0 {
        return Ok(());
    }

    pay_from_treasury(
        &ctx.accounts.treasury,
        &ctx.accounts.payout_authority.to_account_info(),
        amount,
    )?;

    emit!(ProceedsWithdrawn {
        sale: auction_key,
        amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawAuctionProceeds<'info> {
    #[account(mut)]
    pub auction: Account<'info, Auction>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    #[account(
        mut,
        seeds = [
            b"treasury",
            auction.key().as_ref(),
        ],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = management_authority @ AllocationError::NotProgramManagementAuthority,
        has_one = payout_authority @ AllocationError::NotPayoutAuthority
    )]
    pub config: Account<'info, Config>,

    #[account(mut)]
    pub payout_authority: SystemAccount<'info>,
}
