use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    instructions::ProceedsWithdrawn,
    state::{Config, Raffle, Treasury},
    utils::pay_from_treasury,
};

/// Instruction to pay the raffle proceeds to the payout authority
///
/// Proceeds are the unit cost of every winning ticket, paid exactly once.
/// Refunds for losing tickets stay in the treasury.
///
/// # Account Validations
/// * Signer - Must be the management authority
/// * Payout authority - Must match the config
/// * Treasury - Must match the raffle's treasury and use proper PDA seeds
pub fn withdraw_raffle_proceeds(ctx: Context<WithdrawRaffleProceeds>) -> Result<()> {
    ctx.accounts
        .raffle
        .ensure_treasury(&ctx.accounts.treasury.key())?;

    let raffle_key = ctx.accounts.raffle.key();
    let amount = ctx.accounts.raffle.withdraw_proceeds()?;
    if amount == 0 {
        return Ok(());
    }

    pay_from_treasury(
        &ctx.accounts.treasury,
        &ctx.accounts.payout_authority.to_account_info(),
        amount,
    )?;

    emit!(ProceedsWithdrawn {
        sale: raffle_key,
        amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawRaffleProceeds<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    #[account(
        mut,
        seeds = [
            b"treasury",
            raffle.key().as_ref(),
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
