use anchor_lang::prelude::*;
use instructions::*;

pub mod error;
pub mod instructions;
pub mod selection;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_utils;

declare_id!("p7eTqfxQjdzWVZgEEaZy9rdozagTScYwtf3Qsi56rze");

#[program]
pub mod allocation_program {
    use super::*;

    pub fn init_config(ctx: Context<InitConfig>) -> Result<()> {
        instructions::init_config::init_config(ctx)
    }

    pub fn create_auction(ctx: Context<CreateAuction>, params: AuctionParams) -> Result<()> {
        instructions::create_auction::create_auction(ctx, params)
    }

    pub fn init_bidder_index(ctx: Context<InitBidderIndex>) -> Result<()> {
        instructions::init_bidder_index::init_bidder_index(ctx)
    }

    pub fn submit_bid(ctx: Context<SubmitBid>, price: u64, quantity: u32) -> Result<()> {
        instructions::submit_bid::submit_bid(ctx, price, quantity)
    }

    pub fn close_auction(ctx: Context<CloseAuction>) -> Result<()> {
        instructions::close_auction::close_auction(ctx)
    }

    pub fn claim_bids<'info>(
        ctx: Context<'_, '_, 'info, 'info, ClaimBids<'info>>,
    ) -> Result<()> {
        instructions::claim_bids::claim_bids(ctx)
    }

    pub fn withdraw_auction_proceeds(ctx: Context<WithdrawAuctionProceeds>) -> Result<()> {
        instructions::withdraw_auction_proceeds::withdraw_auction_proceeds(ctx)
    }

    pub fn create_raffle(ctx: Context<CreateRaffle>, params: RaffleParams) -> Result<()> {
        instructions::create_raffle::create_raffle(ctx, params)
    }

    pub fn init_ticket_balance(ctx: Context<InitTicketBalance>) -> Result<()> {
        instructions::init_ticket_balance::init_ticket_balance(ctx)
    }

    pub fn enter_raffle(ctx: Context<EnterRaffle>, quantity: u32) -> Result<()> {
        instructions::enter_raffle::enter_raffle(ctx, quantity)
    }

    pub fn set_clearing_entropy(ctx: Context<SetClearingEntropy>) -> Result<()> {
        instructions::set_clearing_entropy::set_clearing_entropy(ctx)
    }

    pub fn deliver_entropy(
        ctx: Context<DeliverEntropy>,
        request_id: u64,
        seed: [u8; 32],
    ) -> Result<()> {
        instructions::deliver_entropy::deliver_entropy(ctx, request_id, seed)
    }

    pub fn clear_raffle(ctx: Context<ClearRaffle>) -> Result<()> {
        instructions::clear_raffle::clear_raffle(ctx)
    }

    pub fn claim_raffle(ctx: Context<ClaimRaffle>, tickets: Vec<u32>) -> Result<()> {
        instructions::claim_raffle::claim_raffle(ctx, tickets)
    }

    pub fn claim_raffle_refund(ctx: Context<ClaimRaffleRefund>) -> Result<()> {
        instructions::claim_raffle_refund::claim_raffle_refund(ctx)
    }

    pub fn withdraw_raffle_proceeds(ctx: Context<WithdrawRaffleProceeds>) -> Result<()> {
        instructions::withdraw_raffle_proceeds::withdraw_raffle_proceeds(ctx)
    }
}
