use anchor_lang::prelude::*;

use crate::error::AllocationError;

/// Sequential id of a bid within its auction, starting at 0.
pub type BidId = u32;

// 8 discriminator + 32 auction + 32 bidder + 4 bid_id + 8 price + 4 quantity + 1 claimed + 1 bump
pub const BID_ACCOUNT_SIZE: usize = 8 + 32 + 32 + 4 + 8 + 4 + 1 + 1;

// 4 next_bid_id + 4 total_admitted
pub const BID_LEDGER_SIZE: usize = 4 + 4;

/// One bid, stored in its own account.
/// PDA with seeds ["bid", auction_key, bid_id as little endian bytes].
///
/// How much of the bid is admitted lives in the auction's admission queue;
/// a bid that is no longer queued has been evicted.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Bid {
    pub auction: Pubkey,
    pub bidder: Pubkey,
    pub bid_id: BidId,
    pub price: u64,
    pub quantity: u32,
    pub claimed: bool,
    pub bump: u8,
}

impl Bid {
    pub fn new(auction: Pubkey, bidder: Pubkey, bid_id: BidId, price: u64, quantity: u32) -> Self {
        Self {
            auction,
            bidder,
            bid_id,
            price,
            quantity,
            claimed: false,
            bump: 0,
        }
    }

    pub fn payment(&self) -> Result<u64> {
        self.price
            .checked_mul(u64::from(self.quantity))
            .ok_or(AllocationError::ArithmeticOverflow.into())
    }

    /// Lamports owed back to the bidder once the auction clears at `clearing_price`
    /// with `filled` units of this bid admitted: the price improvement on filled
    /// units plus the full price of unfilled units. Evicted bids may sit below
    /// the clearing price; they only get the second part.
    pub fn refund(&self, filled: u32, clearing_price: u64) -> Result<u64> {
        let improvement = if filled == 0 {
            0
        } else {
            self.price
                .checked_sub(clearing_price)
                .ok_or(AllocationError::ArithmeticOverflow)?
                .checked_mul(u64::from(filled))
                .ok_or(AllocationError::ArithmeticOverflow)?
        };
        let unfilled = self
            .quantity
            .checked_sub(filled)
            .ok_or(AllocationError::ArithmeticOverflow)?;
        let unfilled_refund = self
            .price
            .checked_mul(u64::from(unfilled))
            .ok_or(AllocationError::ArithmeticOverflow)?;

        improvement
            .checked_add(unfilled_refund)
            .ok_or(AllocationError::ArithmeticOverflow.into())
    }
}

/// Outcome of settling a set of bids at the clearing price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settlement {
    pub refund: u64,
    pub units: u32,
    pub bids_settled: u32,
}

/// Issues bid ids and keeps the running total of quantity currently admitted
/// toward the supply. The bids themselves are separate accounts.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq)]
pub struct BidLedger {
    next_bid_id: BidId,
    total_admitted: u32,
}

impl BidLedger {
    /// Id the next accepted bid will get. Also its account seed.
    pub fn next_bid_id(&self) -> BidId {
        self.next_bid_id
    }

    pub fn total_admitted(&self) -> u32 {
        self.total_admitted
    }

    /// Issues the next bid id and counts `quantity` toward the admitted total.
    pub fn admit(&mut self, quantity: u32) -> Result<BidId> {
        let bid_id = self.next_bid_id;
        let next_bid_id = bid_id
            .checked_add(1)
            .ok_or(AllocationError::AuctionFull)?;
        let total_admitted = self
            .total_admitted
            .checked_add(quantity)
            .ok_or(AllocationError::ArithmeticOverflow)?;

        self.next_bid_id = next_bid_id;
        self.total_admitted = total_admitted;
        Ok(bid_id)
    }

    /// Takes `quantity` units back out of the admitted total.
    pub fn release(&mut self, quantity: u32) -> Result<()> {
        self.total_admitted = self
            .total_admitted
            .checked_sub(quantity)
            .ok_or(AllocationError::QueueInvariantViolated)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_error;

    #[test]
    fn admit_and_release_keep_total_in_sync() {
        let mut ledger = BidLedger::default();
        assert_eq!(ledger.admit(10).unwrap(), 0);
        assert_eq!(ledger.admit(10).unwrap(), 1);
        assert_eq!(ledger.next_bid_id(), 2);
        assert_eq!(ledger.total_admitted(), 20);

        ledger.release(14).unwrap();
        assert_eq!(ledger.total_admitted(), 6);
        assert_error(ledger.release(7), AllocationError::QueueInvariantViolated);
    }

    #[test]
    fn admit_rejects_quantity_overflow_without_issuing_an_id() {
        let mut ledger = BidLedger::default();
        ledger.admit(u32::MAX).unwrap();
        assert_error(ledger.admit(1), AllocationError::ArithmeticOverflow);
        assert_eq!(ledger.next_bid_id(), 1);
    }

    #[test]
    fn refund_covers_price_improvement_and_unfilled_units() {
        let bid = Bid::new(Pubkey::new_unique(), Pubkey::new_unique(), 0, 120, 10);
        // 3 filled units at 120 clearing at 110, 7 unfilled at 120
        assert_eq!(bid.refund(3, 110).unwrap(), 3 * 10 + 7 * 120);
        assert_eq!(bid.payment().unwrap(), 1_200);
        assert_error(bid.refund(3, 121), AllocationError::ArithmeticOverflow);
        assert_error(bid.refund(11, 110), AllocationError::ArithmeticOverflow);

        // evicted
        assert_eq!(bid.refund(0, 130).unwrap(), 1_200);
    }
}
