use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    state::{Auction, Bid, BidderIndex, Treasury},
    utils::pay_from_treasury,
};

/// Event emitted when a bidder settles their bids
#[event]
pub struct BidsClaimed {
    pub auction: Pubkey,
    pub bidder: Pubkey,
    pub clearing_price: u64,
    /// Lamports returned to the bidder
    pub refund: u64,
    pub units: u32,
}

/// Event emitted when units are issued out of a sale's supply
#[event]
pub struct UnitsMinted {
    pub sale: Pubkey,
    pub owner: Pubkey,
    pub first_unit_id: u32,
    pub count: u32,
}

/// Instruction for a bidder to settle every bid they placed
///
/// For each unclaimed bid the bidder is refunded `(price - clearing_price)` per
/// filled unit plus `price` per unfilled unit, and the filled units are minted.
/// Repeating the call after everything is settled is a no-op.
///
/// Remaining accounts: the bidder's bid accounts, writable, in the order of
/// their ids in the bidder index.
///
/// # Errors
/// - `WindowStillOpen` if the auction window has not closed
/// - `NothingToClaim` if the bidder never placed a bid
/// - `BidMismatch` if the remaining accounts are not exactly the bidder's bids
pub fn claim_bids<'info>(ctx: Context<'_, '_, 'info, 'info, ClaimBids<'info>>) -> Result<()> {
    ctx.accounts
        .auction
        .ensure_treasury(&ctx.accounts.treasury.key())?;
    ctx.accounts
        .bidder_index
        .ensure_owner(&ctx.accounts.signer.key())?;

    let mut bids = Vec::with_capacity(ctx.remaining_accounts.len());
    for info in ctx.remaining_accounts.iter() {
        require!(info.is_writable, AllocationError::BidMismatch);
        bids.push(Account::<Bid>::try_from(info)?);
    }

    let now = Clock::get()?.unix_timestamp;
    let auction_key = ctx.accounts.auction.key();
    let bidder = ctx.accounts.signer.key();
    let claim = {
        let mut records: Vec<&mut Bid> = bids.iter_mut().map(|bid| &mut **bid).collect();
        ctx.accounts.auction.claim_bids(
            &auction_key,
            &ctx.accounts.bidder_index,
            &mut records,
            now,
        )?
    };
    for bid in &bids {
        bid.exit(&crate::ID)?;
    }

    pay_from_treasury(
        &ctx.accounts.treasury,
        &ctx.accounts.signer.to_account_info(),
        claim.settlement.refund,
    )?;

    if claim.settlement.bids_settled > 0 {
        emit!(BidsClaimed {
            auction: auction_key,
            bidder,
            clearing_price: claim.clearing_price,
            refund: claim.settlement.refund,
            units: claim.settlement.units,
        });
    }
    if let Some(first_unit_id) = claim.first_unit_id {
        emit!(UnitsMinted {
            sale: auction_key,
            owner: bidder,
            first_unit_id,
            count: claim.settlement.units,
        });
    }

    Ok(())
}

#[derive(Accounts)]
pub struct ClaimBids<'info> {
    #[account(mut)]
    pub auction: Account<'info, Auction>,

    #[account(
        seeds = [
            b"bidder_index",
            auction.key().as_ref(),
            signer.key().as_ref()
        ],
        bump = bidder_index.bump
    )]
    pub bidder_index: Account<'info, BidderIndex>,

    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        mut,
        seeds = [
            b"treasury",
            auction.key().as_ref(),
        ],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,
}
