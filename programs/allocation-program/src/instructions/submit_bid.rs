use anchor_lang::prelude::*;

use crate::{
    state::{Auction, Bid, BidId, BidderIndex, Treasury, BID_ACCOUNT_SIZE},
    utils::deposit_to_treasury,
};

/// Event emitted when a bid is admitted
#[event]
pub struct BidSubmitted {
    pub auction: Pubkey,
    pub bidder: Pubkey,
    pub bid_id: BidId,
    pub price: u64,
    pub quantity: u32,
    /// Total amount escrowed in lamports
    pub payment: u64,
}

/// Event emitted when a bid drops out of the admitted set
#[event]
pub struct BidEvicted {
    pub auction: Pubkey,
    pub bid_id: BidId,
}

/// Event emitted when the boundary bid is left partially filled
#[event]
pub struct BidPartiallyFilled {
    pub auction: Pubkey,
    pub bid_id: BidId,
    pub filled_quantity: u32,
}

/// Instruction to place a bid of `quantity` units at `price` lamports per unit
///
/// The full `price * quantity` is escrowed in the treasury and the bid is
/// recorded in its own account. The bid is admitted into the best-priced set
/// immediately; lower bids are evicted or partially filled so the admitted
/// quantity never exceeds the available supply. Evicted bids stay on record and
/// are refunded when their owner claims.
///
/// # Errors
/// - `WindowNotOpen` / `WindowClosed` outside the auction window
/// - `BelowMinimumPrice` if `price` is below the floor price
/// - `InvalidQuantity` if `quantity` is zero
/// - `PerAddressCapExceeded` if the bidder holds the maximum number of bids
/// - `ArithmeticOverflow` if `price * quantity` overflows
pub fn submit_bid(ctx: Context<SubmitBid>, price: u64, quantity: u32) -> Result<()> {
    ctx.accounts
        .auction
        .ensure_treasury(&ctx.accounts.treasury.key())?;
    ctx.accounts
        .bidder_index
        .ensure_owner(&ctx.accounts.signer.key())?;

    let now = Clock::get()?.unix_timestamp;
    let auction_key = ctx.accounts.auction.key();
    let accounts = &mut *ctx.accounts;
    let admission = accounts.auction.submit_bid(
        auction_key,
        &mut accounts.bidder_index,
        price,
        quantity,
        now,
    )?;

    let bid_id = admission.bid.bid_id;
    accounts.bid.set_inner(Bid {
        bump: ctx.bumps.bid,
        ..admission.bid
    });

    deposit_to_treasury(
        &accounts.signer,
        &accounts.treasury,
        &accounts.system_program,
        admission.payment,
    )?;

    emit!(BidSubmitted {
        auction: auction_key,
        bidder: accounts.signer.key(),
        bid_id,
        price,
        quantity,
        payment: admission.payment,
    });
    for bid_id in admission.evicted {
        emit!(BidEvicted {
            auction: auction_key,
            bid_id,
        });
    }
    if let Some((bid_id, filled_quantity)) = admission.boundary {
        emit!(BidPartiallyFilled {
            auction: auction_key,
            bid_id,
            filled_quantity,
        });
    }

    Ok(())
}

#[derive(Accounts)]
pub struct SubmitBid<'info> {
    #[account(mut)]
    pub auction: Account<'info, Auction>,

    /// New bid account created for this bid
    /// PDA with seeds ["bid", auction_key, next bid id]
    #[account(
        init,
        payer = signer,
        space = BID_ACCOUNT_SIZE,
        seeds = [
            b"bid",
            auction.key().as_ref(),
            auction.ledger.next_bid_id().to_le_bytes().as_ref(),
        ],
        bump,
    )]
    pub bid: Account<'info, Bid>,

    /// Bidder's index of bid ids
    /// PDA with seeds ["bidder_index", auction_key, signer_key]
    #[account(
        mut,
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

    pub system_program: Program<'info, System>,

    /// Treasury account that escrows the bid payment
    /// PDA with seeds ["treasury", auction_key]
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
