use anchor_lang::prelude::*;

use crate::state::Raffle;

#[event]
pub struct RaffleResolved {
    pub raffle: Pubkey,
    pub winners_drawn: u32,
    pub total_tickets: u32,
}

/// Instruction to draw the winning tickets from the delivered seed
///
/// Draws `min(available_supply, total_tickets)` distinct tickets. The outcome
/// depends only on the seed and the ticket count, so anyone may trigger it.
///
/// # Errors
/// - `WindowStillOpen` before the window closes
/// - `RandomnessNotReady` until the seed has been delivered
/// - `AlreadyResolved` on any later call
pub fn clear_raffle(ctx: Context<ClearRaffle>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let raffle = &mut ctx.accounts.raffle;
    let winners_drawn = raffle.resolve(now)?;

    msg!(
        "Raffle resolved: {} winners out of {} tickets",
        winners_drawn,
        raffle.total_tickets()
    );

    emit!(RaffleResolved {
        raffle: raffle.key(),
        winners_drawn,
        total_tickets: raffle.total_tickets(),
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ClearRaffle<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,

    pub signer: Signer<'info>,
}
