use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    state::{Config, Raffle},
};

#[event]
pub struct EntropyDelivered {
    pub raffle: Pubkey,
    pub request_id: u64,
    pub seed: [u8; 32],
}

/// Callback through which the randomness authority fulfils a pending request.
/// Only the request recorded by `set_clearing_entropy` is accepted, and only once.
pub fn deliver_entropy(
    ctx: Context<DeliverEntropy>,
    request_id: u64,
    seed: [u8; 32],
) -> Result<()> {
    ctx.accounts.raffle.deliver_entropy(request_id, seed)?;

    emit!(EntropyDelivered {
        raffle: ctx.accounts.raffle.key(),
        request_id,
        seed,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct DeliverEntropy<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,

    pub randomness_authority: Signer<'info>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = randomness_authority @ AllocationError::NotRandomnessAuthority,
    )]
    pub config: Account<'info, Config>,
}
