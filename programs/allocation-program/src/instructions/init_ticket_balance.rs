use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    state::{Raffle, TicketBalance, TICKET_BALANCE_ACCOUNT_SIZE},
};

/// Initializes a new ticket balance account for a user in a specific raffle.
/// This account tracks how many tickets a user owns in a particular raffle and
/// whether their losing tickets have been refunded.
/// The account is PDA-derived using ["ticket_balance", raffle_pubkey, user_pubkey].
///
/// # State Changes
/// - Creates a new `TicketBalance` account
/// - Initializes owner to signer's pubkey
/// - Sets initial ticket_count to 0
/// - Stores the PDA bump
///
/// # Access Control
/// - Anyone can initialize their own ticket balance account
/// - One ticket balance account per user per raffle
pub fn init_ticket_balance(ctx: Context<InitTicketBalance>) -> Result<()> {
    // Verify raffle still accepts entries
    require!(
        !ctx.accounts.raffle.window.is_closed(Clock::get()?.unix_timestamp),
        AllocationError::WindowClosed
    );

    let ticket_balance = &mut ctx.accounts.ticket_balance;
    ticket_balance.owner = ctx.accounts.signer.key();
    ticket_balance.ticket_count = 0;
    ticket_balance.refunded = false;
    ticket_balance.bump = ctx.bumps.ticket_balance;

    Ok(())
}

#[derive(Accounts)]
pub struct InitTicketBalance<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        init,
        payer = signer,
        space = TICKET_BALANCE_ACCOUNT_SIZE,
        seeds = [
            b"ticket_balance",
            raffle.key().as_ref(),
            signer.key().as_ref(),
        ],
        bump,
    )]
    pub ticket_balance: Account<'info, TicketBalance>,

    pub raffle: Account<'info, Raffle>,
    pub system_program: Program<'info, System>,
}
