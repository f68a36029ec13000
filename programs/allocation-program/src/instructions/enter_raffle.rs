use anchor_lang::prelude::*;

use crate::{
    state::{Raffle, TicketBalance, Treasury, MAX_RAFFLE_ACCOUNT_SIZE},
    utils::deposit_to_treasury,
};

/// Event emitted when tickets are purchased
#[event]
pub struct RaffleEntered {
    pub raffle: Pubkey,
    pub buyer: Pubkey,
    /// First ticket index of the purchased range
    pub range_start: u32,
    pub quantity: u32,
    /// Total amount paid in lamports
    pub payment: u64,
}

/// Instruction to buy `quantity` tickets in a raffle
///
/// The tickets occupy the next `quantity` indices of the raffle's ticket array.
/// The raffle account grows by one entry, paid for by the buyer.
/// `quantity * unit_cost` lamports move from the buyer into the treasury.
///
/// # Errors
/// - `WindowNotOpen` / `WindowClosed` outside the raffle window
/// - `InvalidQuantity` if `quantity` is zero
/// - `PerAddressCapExceeded` if the buyer would hold more than the cap
/// - `RaffleFull` if the raffle account cannot grow by another entry
pub fn enter_raffle(mut ctx: Context<EnterRaffle>, quantity: u32) -> Result<()> {
    ctx.accounts
        .raffle
        .ensure_treasury(&ctx.accounts.treasury.key())?;
    ctx.accounts
        .ticket_balance
        .ensure_owner(&ctx.accounts.signer.key())?;

    let now = Clock::get()?.unix_timestamp;
    let raffle_key = ctx.accounts.raffle.key();
    let accounts = &mut ctx.accounts;
    let purchase = accounts
        .raffle
        .enter(&mut accounts.ticket_balance, quantity, now)?;

    deposit_to_treasury(
        &accounts.signer,
        &accounts.treasury,
        &accounts.system_program,
        purchase.payment,
    )?;

    emit!(RaffleEntered {
        raffle: raffle_key,
        buyer: purchase.entry.buyer,
        range_start: purchase.entry.range_start,
        quantity,
        payment: purchase.payment,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    #[account(
        mut,
        realloc = raffle.space_for_next_entry().min(MAX_RAFFLE_ACCOUNT_SIZE),
        realloc::payer = signer,
        realloc::zero = false,
    )]
    pub raffle: Account<'info, Raffle>,

    /// User's ticket balance for this raffle
    /// PDA with seeds ["ticket_balance", raffle_key, signer_key]
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

    pub system_program: Program<'info, System>,

    /// PDA with seeds ["treasury", raffle_key]
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
