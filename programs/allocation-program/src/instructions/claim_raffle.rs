use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    instructions::UnitsMinted,
    state::Raffle,
};

#[event]
pub struct TicketsClaimed {
    pub raffle: Pubkey,
    pub owner: Pubkey,
    pub tickets: Vec<u32>,
}

/// Event emitted for each ticket in a claim batch that could not be claimed
#[event]
pub struct TicketRejected {
    pub raffle: Pubkey,
    pub ticket: u32,
    pub error_code: u32,
}

/// Instruction for a winner to mint one unit per winning ticket they own
///
/// Tickets that did not win, belong to someone else, were already claimed or
/// appear twice in the batch are reported with `TicketRejected` and skipped.
///
/// # Errors
/// - `NotResolved` before winners are drawn
/// - `InvalidOrAlreadyClaimedTicket` if no ticket in the batch is claimable
pub fn claim_raffle(ctx: Context<ClaimRaffle>, tickets: Vec<u32>) -> Result<()> {
    let raffle_key = ctx.accounts.raffle.key();
    let owner = ctx.accounts.signer.key();
    let claim = ctx.accounts.raffle.claim_tickets(&owner, &tickets)?;

    let rejected_code = u32::from(AllocationError::InvalidOrAlreadyClaimedTicket);
    for ticket in claim.rejected {
        emit!(TicketRejected {
            raffle: raffle_key,
            ticket,
            error_code: rejected_code,
        });
    }

    let count = claim.claimed.len() as u32;
    emit!(TicketsClaimed {
        raffle: raffle_key,
        owner,
        tickets: claim.claimed,
    });
    if let Some(first_unit_id) = claim.first_unit_id {
        emit!(UnitsMinted {
            sale: raffle_key,
            owner,
            first_unit_id,
            count,
        });
    }

    Ok(())
}

#[derive(Accounts)]
pub struct ClaimRaffle<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,

    pub signer: Signer<'info>,
}
