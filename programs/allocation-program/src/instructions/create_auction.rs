use crate::{
    error::AllocationError,
    state::{
        Auction, Config, SaleWindow, Treasury, MAX_AUCTION_SUPPLY, MAX_BIDS_PER_ADDRESS,
        TREASURY_ACCOUNT_SIZE,
    },
};
use anchor_lang::prelude::*;

// Constants for validation
const MAX_FLOOR_PRICE: u64 = 100_000_000_000; // 100 SOL
const MIN_FLOOR_PRICE: u64 = 1_000_000; // 0.001 SOL
const MAX_DURATION: i64 = 30 * 24 * 60 * 60; // 30 days in seconds

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct AuctionParams {
    pub start_time: i64,
    pub end_time: i64,
    pub available_supply: u32,
    pub floor_price: u64,
    pub max_bids_per_address: u32,
}

/// Event emitted when an auction is created
#[event]
pub struct AuctionCreated {
    pub auction: Pubkey,
    pub start_time: i64,
    pub end_time: i64,
    pub available_supply: u32,
    pub floor_price: u64,
}

/// Instruction to create a price-priority clearing auction
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates caller is the management authority via config PDA
/// 2. Ensures the window ends in the future, after it starts, and lasts at most 30 days
/// 3. Ensures available supply is non-zero and fits the admission queue
/// 4. Ensures floor price is within bounds
/// 5. Ensures the per-address cap fits the bidder index
///
/// # Implementation Notes
/// - Account space is sized from the supply, which bounds the admission queue;
///   bids themselves are separate accounts, so the number of bids is unbounded
/// - Creates the treasury PDA that escrows every bid payment
pub fn create_auction(ctx: Context<CreateAuction>, params: AuctionParams) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;

    let window = SaleWindow::new(params.start_time, params.end_time, current_time, MAX_DURATION)?;
    require!(
        params.available_supply > 0 && params.available_supply as usize <= MAX_AUCTION_SUPPLY,
        AllocationError::InvalidSupply
    );
    require!(
        params.floor_price >= MIN_FLOOR_PRICE,
        AllocationError::PriceTooLow
    );
    require!(
        params.floor_price <= MAX_FLOOR_PRICE,
        AllocationError::PriceTooHigh
    );
    require!(
        params.max_bids_per_address > 0
            && params.max_bids_per_address as usize <= MAX_BIDS_PER_ADDRESS,
        AllocationError::InvalidCapacity
    );

    let auction_key = ctx.accounts.auction.key();
    ctx.accounts.treasury.sale = auction_key;
    ctx.accounts.treasury.bump = ctx.bumps.treasury;
    ctx.accounts.auction.set_inner(Auction::new(
        ctx.accounts.treasury.key(),
        window,
        params.available_supply,
        params.floor_price,
        params.max_bids_per_address,
    ));

    ctx.accounts.config.sale_counter = ctx
        .accounts
        .config
        .sale_counter
        .checked_add(1)
        .ok_or(AllocationError::ArithmeticOverflow)?;

    emit!(AuctionCreated {
        auction: auction_key,
        start_time: params.start_time,
        end_time: params.end_time,
        available_supply: params.available_supply,
        floor_price: params.floor_price,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(params: AuctionParams)]
pub struct CreateAuction<'info> {
    #[account(
        init,
        payer = management_authority,
        space = Auction::space((params.available_supply as usize).min(MAX_AUCTION_SUPPLY)),
        seeds = [
            b"auction",
            config.sale_counter.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub auction: Account<'info, Auction>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    #[account(
        init,
        payer = management_authority,
        space = TREASURY_ACCOUNT_SIZE,
        seeds = [
            b"treasury",
            auction.key().as_ref(),
        ],
        bump,
    )]
    pub treasury: Account<'info, Treasury>,

    /// The config account storing the program authorities and the sale counter
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = management_authority @ AllocationError::NotProgramManagementAuthority,
    )]
    pub config: Account<'info, Config>,

    pub system_program: Program<'info, System>,
}
