use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    state::{Auction, BidderIndex, BIDDER_INDEX_ACCOUNT_SIZE},
};

/// Initializes the account that lists a bidder's bid ids in one auction.
/// The account is PDA-derived using ["bidder_index", auction_pubkey, user_pubkey].
///
/// # State Changes
/// - Creates a new `BidderIndex` account with no bids
/// - Stores the PDA bump
///
/// # Access Control
/// - Anyone can initialize their own bidder index
/// - One bidder index per user per auction
pub fn init_bidder_index(ctx: Context<InitBidderIndex>) -> Result<()> {
    require!(
        !ctx.accounts.auction.window.is_closed(Clock::get()?.unix_timestamp),
        AllocationError::WindowClosed
    );

    let bidder_index = &mut ctx.accounts.bidder_index;
    bidder_index.auction = ctx.accounts.auction.key();
    bidder_index.owner = ctx.accounts.signer.key();
    bidder_index.bid_ids = Vec::new();
    bidder_index.bump = ctx.bumps.bidder_index;

    Ok(())
}

#[derive(Accounts)]
pub struct InitBidderIndex<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        init,
        payer = signer,
        space = BIDDER_INDEX_ACCOUNT_SIZE,
        seeds = [
            b"bidder_index",
            auction.key().as_ref(),
            signer.key().as_ref(),
        ],
        bump,
    )]
    pub bidder_index: Account<'info, BidderIndex>,

    pub auction: Account<'info, Auction>,
    pub system_program: Program<'info, System>,
}
