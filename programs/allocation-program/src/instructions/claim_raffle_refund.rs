use anchor_lang::prelude::*;

use crate::{
    state::{Raffle, TicketBalance, Treasury},
    utils::pay_from_treasury,
};

#[event]
pub struct RefundClaimed {
    pub raffle: Pubkey,
    pub owner: Pubkey,
    /// Lamports returned for losing tickets
    pub amount: u64,
}

/// Instruction to refund the unit cost of every losing ticket a buyer holds
///
/// Paid once per buyer. Calling again after the refund moves nothing.
///
/// # Errors
/// - `NotResolved` before winners are drawn
/// - `NothingToClaim` if the buyer holds no tickets
pub fn claim_raffle_refund(mut ctx: Context<ClaimRaffleRefund>) -> Result<()> {
    ctx.accounts
        .raffle
        .ensure_treasury(&ctx.accounts.treasury.key())?;
    ctx.accounts
        .ticket_balance
        .ensure_owner(&ctx.accounts.signer.key())?;

    let raffle_key = ctx.accounts.raffle.key();
    let accounts = &mut ctx.accounts;
    let amount = accounts
        .raffle
        .claim_refund(&mut accounts.ticket_balance)?;
    if amount == 0 {
        return Ok(());
    }

    pay_from_treasury(
        &accounts.treasury,
        &accounts.signer.to_account_info(),
        amount,
    )?;

    emit!(RefundClaimed {
        raffle: raffle_key,
        owner: accounts.signer.key(),
        amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ClaimRaffleRefund<'info> {
    pub raffle: Account<'info, Raffle>,

    #[account(
        mut,
        seeds = [
            b"ticket_balance",
            raffle.key().as_ref(),
            signer.key().as_ref()
        ],
        bump = ticket_balance.bump
    )]
    pub ticket_balance: Account<'info, TicketBalance>,

    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        mut,
        seeds = [
            b"treasury",
            raffle.key().as_ref(),
        ],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,
}
