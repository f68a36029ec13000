use crate::{
    error::AllocationError,
    state::{Config, Raffle, SaleWindow, Treasury, MAX_RAFFLE_SUPPLY, TREASURY_ACCOUNT_SIZE},
};
use anchor_lang::prelude::*;

// Constants for validation
const MAX_UNIT_COST: u64 = 100_000_000_000; // 100 SOL
const MIN_UNIT_COST: u64 = 1_000_000; // 0.001 SOL
const MAX_DURATION: i64 = 30 * 24 * 60 * 60; // 30 days in seconds

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct RaffleParams {
    pub start_time: i64,
    pub end_time: i64,
    pub available_supply: u32,
    pub unit_cost: u64,
    pub max_per_address: u32,
}

/// Event emitted when a raffle is created
#[event]
pub struct RaffleCreated {
    /// The pubkey of the created raffle
    pub raffle: Pubkey,
    /// Price per ticket in lamports
    pub unit_cost: u64,
    /// Number of winning tickets that will be drawn
    pub available_supply: u32,
    pub max_per_address: u32,
    pub start_time: i64,
    pub end_time: i64,
}

/// Instruction to create a raffle that gives `available_supply` units away to
/// randomly drawn tickets
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates caller is the management authority via config PDA
/// 2. Ensures the window ends in the future, after it starts, and lasts at most 30 days
/// 3. Ensures unit cost is within bounds
/// 4. Ensures the supply fits the winning ticket set
/// 5. Ensures the per-address ticket cap is non-zero
///
/// # Implementation Notes
/// - Initializes the raffle in Open state with no entropy requested
/// - Creates treasury PDA linked to raffle
/// - Space allocation covers the winning tickets and claimed bitmap; the entry
///   book starts empty and the account grows with each purchase
pub fn create_raffle(ctx: Context<CreateRaffle>, params: RaffleParams) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;

    let window = SaleWindow::new(params.start_time, params.end_time, current_time, MAX_DURATION)?;
    require!(
        params.unit_cost >= MIN_UNIT_COST,
        AllocationError::PriceTooLow
    );
    require!(
        params.unit_cost <= MAX_UNIT_COST,
        AllocationError::PriceTooHigh
    );
    require!(
        params.available_supply > 0 && params.available_supply as usize <= MAX_RAFFLE_SUPPLY,
        AllocationError::InvalidSupply
    );
    require!(params.max_per_address > 0, AllocationError::InvalidCapacity);

    let raffle_key = ctx.accounts.raffle.key();
    ctx.accounts.treasury.sale = raffle_key;
    ctx.accounts.treasury.bump = ctx.bumps.treasury;
    ctx.accounts.raffle.set_inner(Raffle::new(
        ctx.accounts.treasury.key(),
        window,
        params.unit_cost,
        params.available_supply,
        params.max_per_address,
    ));

    // Increment the sale counter
    ctx.accounts.config.sale_counter = ctx
        .accounts
        .config
        .sale_counter
        .checked_add(1)
        .ok_or(AllocationError::ArithmeticOverflow)?;

    emit!(RaffleCreated {
        raffle: raffle_key,
        unit_cost: params.unit_cost,
        available_supply: params.available_supply,
        max_per_address: params.max_per_address,
        start_time: params.start_time,
        end_time: params.end_time,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(params: RaffleParams)]
pub struct CreateRaffle<'info> {
    #[account(
        init,
        payer = management_authority,
        space = Raffle::space(0, (params.available_supply as usize).min(MAX_RAFFLE_SUPPLY)),
        seeds = [
            b"raffle",
            config.sale_counter.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    #[account(
        init,
        payer = management_authority,
        space = TREASURY_ACCOUNT_SIZE,
        seeds = [
            b"treasury",
            raffle.key().as_ref(),
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
