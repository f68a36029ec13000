use anchor_lang::prelude::*;

use crate::state::Auction;

/// Event emitted when the clearing price is fixed
#[event]
pub struct AuctionCleared {
    pub auction: Pubkey,
    pub clearing_price: u64,
    /// Units filled across all admitted bids
    pub filled_quantity: u32,
}

/// Fixes the clearing price once the auction window has closed.
///
/// Claims and withdrawals fix the price on their own if nobody has called
/// this yet, so it is optional; it exists so the outcome can be published
/// before the first claim.
///
/// # Errors
/// - `WindowStillOpen` if the auction window has not closed
/// - `AlreadyResolved` if the clearing price is already set
pub fn close_auction(ctx: Context<CloseAuction>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let auction_key = ctx.accounts.auction.key();
    let auction = &mut ctx.accounts.auction;
    let clearing_price = auction.finalize(now)?;

    emit!(AuctionCleared {
        auction: auction_key,
        clearing_price,
        filled_quantity: auction.ledger.total_admitted(),
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CloseAuction<'info> {
    #[account(mut)]
    pub auction: Account<'info, Auction>,
}
