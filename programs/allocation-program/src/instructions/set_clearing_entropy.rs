use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    state::{Config, Raffle},
};

/// Event emitted when a raffle asks the randomness authority for a seed
#[event]
pub struct EntropyRequested {
    pub raffle: Pubkey,
    pub request_id: u64,
}

/// Instruction to request the randomness used to draw a raffle's winners
///
/// Can be called by anyone once the raffle window has closed. The request id
/// comes from a program-wide counter; the randomness authority answers it with
/// `deliver_entropy`.
///
/// # Errors
/// - `WindowStillOpen` before the window closes
/// - `EntropyAlreadyRequested` if a request is pending or fulfilled
/// - `AlreadyResolved` if winners have been drawn
pub fn set_clearing_entropy(ctx: Context<SetClearingEntropy>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let request_id = ctx.accounts.config.entropy_request_counter;

    ctx.accounts.raffle.request_entropy(request_id, now)?;
    ctx.accounts.config.entropy_request_counter = request_id
        .checked_add(1)
        .ok_or(AllocationError::ArithmeticOverflow)?;

    emit!(EntropyRequested {
        raffle: ctx.accounts.raffle.key(),
        request_id,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SetClearingEntropy<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    pub signer: Signer<'info>,
}
