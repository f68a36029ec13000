use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    state::{
        admission_queue::AdmissionQueue,
        bid_ledger::{Bid, BidId, BidLedger, Settlement, BID_LEDGER_SIZE},
        bidder_index::BidderIndex,
        supply::{SupplyCursor, SUPPLY_CURSOR_SIZE},
        window::{SaleWindow, SALE_WINDOW_SIZE},
    },
};

/// Upper bound on the units one auction can sell. The admission queue holds
/// at most one entry per admitted unit, and it lives in the auction account.
pub const MAX_AUCTION_SUPPLY: usize = 400;

// Space calculation:
// 8 (discriminator) +
// 32 (treasury) +
// 16 (window) +
// 8 (floor_price) +
// 4 (max_bids_per_address) +
// 1 (saturated) +
// 9 (clearing_price: Option<u64>) +
// 1 (proceeds_withdrawn) +
// 8 (supply) +
// 8 (ledger)
// followed by the queue, sized by the supply
pub const AUCTION_BASE_SIZE: usize =
    8 + 32 + SALE_WINDOW_SIZE + 8 + 4 + 1 + 9 + 1 + SUPPLY_CURSOR_SIZE + BID_LEDGER_SIZE;

#[account]
pub struct Auction {
    pub treasury: Pubkey,
    pub window: SaleWindow,
    pub floor_price: u64,
    pub max_bids_per_address: u32,
    /// Set once admitted demand has reached the available supply.
    pub saturated: bool,
    pub clearing_price: Option<u64>,
    pub proceeds_withdrawn: bool,
    pub supply: SupplyCursor,
    pub ledger: BidLedger,
    pub queue: AdmissionQueue,
}

/// What happened to the admitted set when a bid was accepted.
#[derive(Debug, PartialEq, Eq)]
pub struct BidAdmission {
    /// Record to store in the new bid account.
    pub bid: Bid,
    pub payment: u64,
    /// Bids pushed fully out of the admitted set, in eviction order.
    pub evicted: Vec<BidId>,
    /// The bid left partially filled at the bottom of the set, with its remaining fill.
    pub boundary: Option<(BidId, u32)>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BidClaim {
    pub clearing_price: u64,
    pub settlement: Settlement,
    pub first_unit_id: Option<u32>,
}

impl Auction {
    /// One queue entry per unit of supply, plus the bid being admitted.
    pub const fn space(available_supply: usize) -> usize {
        AUCTION_BASE_SIZE + AdmissionQueue::space(available_supply + 1)
    }

    pub fn new(
        treasury: Pubkey,
        window: SaleWindow,
        available_supply: u32,
        floor_price: u64,
        max_bids_per_address: u32,
    ) -> Self {
        Self {
            treasury,
            window,
            floor_price,
            max_bids_per_address,
            saturated: false,
            clearing_price: None,
            proceeds_withdrawn: false,
            supply: SupplyCursor::new(available_supply),
            ledger: BidLedger::default(),
            queue: AdmissionQueue::default(),
        }
    }

    pub fn available_supply(&self) -> u32 {
        self.supply.available_supply
    }

    /// Units of `bid_id` currently admitted; zero for evicted or unknown bids.
    pub fn filled_quantity(&self, bid_id: BidId) -> u32 {
        self.queue.filled_of(bid_id)
    }

    pub fn ensure_treasury(&self, treasury: &Pubkey) -> Result<()> {
        require_keys_eq!(self.treasury, *treasury, AllocationError::InvalidTreasury);
        Ok(())
    }

    /// Admits a bid and re-optimizes the admitted set so it holds exactly the
    /// best `available_supply` units by price, earliest arrival winning ties.
    ///
    /// Every check runs before anything is touched. The bid itself may be the
    /// one evicted if it does not beat the current boundary.
    pub fn submit_bid(
        &mut self,
        auction: Pubkey,
        bidder_index: &mut BidderIndex,
        price: u64,
        quantity: u32,
        now: i64,
    ) -> Result<BidAdmission> {
        self.window.ensure_open(now)?;
        require!(price >= self.floor_price, AllocationError::BelowMinimumPrice);
        require!(quantity > 0, AllocationError::InvalidQuantity);
        require!(
            bidder_index.bid_ids.len() < self.max_bids_per_address as usize,
            AllocationError::PerAddressCapExceeded
        );
        let bid = Bid::new(
            auction,
            bidder_index.owner,
            self.ledger.next_bid_id(),
            price,
            quantity,
        );
        let payment = bid.payment()?;

        let bid_id = self.ledger.admit(quantity)?;
        self.queue.insert(price, bid_id, quantity)?;
        bidder_index.bid_ids.push(bid_id);

        let supply = self.available_supply();
        let mut evicted = Vec::new();
        let mut boundary = None;
        while self.ledger.total_admitted() > supply {
            let excess = self.ledger.total_admitted() - supply;
            let min = *self
                .queue
                .peek_min()
                .ok_or(AllocationError::QueueInvariantViolated)?;

            if min.filled <= excess {
                self.queue.delete_min();
                self.ledger.release(min.filled)?;
                evicted.push(min.sequence);
            } else {
                let remaining = self.queue.shrink_min(excess)?;
                self.ledger.release(excess)?;
                boundary = Some((min.sequence, remaining));
            }
        }

        if self.ledger.total_admitted() >= supply {
            self.saturated = true;
        }

        Ok(BidAdmission {
            bid,
            payment,
            evicted,
            boundary,
        })
    }

    /// Fixes the clearing price on first use after the window closes.
    ///
    /// Saturated auctions clear at the boundary bid's price; auctions whose
    /// demand never reached supply clear at the floor price.
    pub fn clear(&mut self, now: i64) -> Result<u64> {
        if let Some(price) = self.clearing_price {
            return Ok(price);
        }
        self.window.ensure_closed(now)?;

        let price = match self.queue.peek_min() {
            Some(boundary) if self.saturated => boundary.price,
            _ => self.floor_price,
        };
        self.clearing_price = Some(price);

        Ok(price)
    }

    /// Explicit one-time clearing. Later callers see `AlreadyResolved`.
    pub fn finalize(&mut self, now: i64) -> Result<u64> {
        require!(
            self.clearing_price.is_none(),
            AllocationError::AlreadyResolved
        );
        self.clear(now)
    }

    /// Settles every unclaimed bid of one bidder: refund owed and units to mint.
    ///
    /// `bids` must be the bidder's bid records of this auction, in the order of
    /// `bidder_index.bid_ids`. Calling again after everything is claimed
    /// settles nothing.
    pub fn claim_bids(
        &mut self,
        auction: &Pubkey,
        bidder_index: &BidderIndex,
        bids: &mut [&mut Bid],
        now: i64,
    ) -> Result<BidClaim> {
        require!(
            !bidder_index.bid_ids.is_empty(),
            AllocationError::NothingToClaim
        );
        require!(
            bids.len() == bidder_index.bid_ids.len(),
            AllocationError::BidMismatch
        );
        for (bid, bid_id) in bids.iter().zip(&bidder_index.bid_ids) {
            require!(
                bid.bid_id == *bid_id && bid.auction == *auction && bid.bidder == bidder_index.owner,
                AllocationError::BidMismatch
            );
        }
        let clearing_price = self.clear(now)?;

        let mut settlement = Settlement::default();
        for bid in bids.iter().filter(|bid| !bid.claimed) {
            let filled = self.filled_quantity(bid.bid_id);
            settlement.refund = settlement
                .refund
                .checked_add(bid.refund(filled, clearing_price)?)
                .ok_or(AllocationError::ArithmeticOverflow)?;
            settlement.units = settlement
                .units
                .checked_add(filled)
                .ok_or(AllocationError::ArithmeticOverflow)?;
            settlement.bids_settled += 1;
        }
        let first_unit_id = self.supply.mint(settlement.units)?;
        for bid in bids.iter_mut() {
            bid.claimed = true;
        }

        Ok(BidClaim {
            clearing_price,
            settlement,
            first_unit_id,
        })
    }

    /// Proceeds owed to the seller: clearing price times every filled unit.
    /// Paid once; later calls return zero.
    pub fn withdraw_proceeds(&mut self, now: i64) -> Result<u64> {
        let clearing_price = self.clear(now)?;
        if self.proceeds_withdrawn {
            return Ok(0);
        }

        let proceeds = clearing_price
            .checked_mul(u64::from(self.ledger.total_admitted()))
            .ok_or(AllocationError::ArithmeticOverflow)?;
        self.proceeds_withdrawn = true;

        Ok(proceeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_error;

    const DAY: i64 = 24 * 60 * 60;
    const OPEN: i64 = DAY;
    const CLOSED: i64 = 3 * DAY;
    const FLOOR: u64 = 100_000_000; // 0.1 SOL

    struct Sale {
        key: Pubkey,
        auction: Auction,
    }

    /// A bidder's index together with the bid accounts it created.
    struct Bidder {
        index: BidderIndex,
        bids: Vec<Bid>,
    }

    fn sale(available_supply: u32) -> Sale {
        let window = SaleWindow::new(DAY, 2 * DAY, 0, 30 * DAY).unwrap();
        Sale {
            key: Pubkey::new_unique(),
            auction: Auction::new(Pubkey::new_unique(), window, available_supply, FLOOR, 16),
        }
    }

    fn bidder() -> Bidder {
        Bidder {
            index: BidderIndex {
                auction: Pubkey::new_unique(),
                owner: Pubkey::new_unique(),
                bid_ids: Vec::new(),
                bump: 255,
            },
            bids: Vec::new(),
        }
    }

    impl Sale {
        fn bid(&mut self, bidder: &mut Bidder, price: u64, quantity: u32) -> Result<BidAdmission> {
            self.bid_at(bidder, price, quantity, OPEN)
        }

        fn bid_at(
            &mut self,
            bidder: &mut Bidder,
            price: u64,
            quantity: u32,
            now: i64,
        ) -> Result<BidAdmission> {
            let admission =
                self.auction
                    .submit_bid(self.key, &mut bidder.index, price, quantity, now)?;
            bidder.bids.push(admission.bid.clone());
            Ok(admission)
        }

        fn claim(&mut self, bidder: &mut Bidder, now: i64) -> Result<BidClaim> {
            let mut bids: Vec<&mut Bid> = bidder.bids.iter_mut().collect();
            self.auction
                .claim_bids(&self.key, &bidder.index, &mut bids, now)
        }

        fn filled(&self, admission: &BidAdmission) -> u32 {
            self.auction.filled_quantity(admission.bid.bid_id)
        }
    }

    fn assert_supply_invariant(sale: &Sale, bidders: &[&Bidder]) {
        let admitted: u32 = bidders
            .iter()
            .flat_map(|bidder| bidder.bids.iter())
            .map(|bid| sale.auction.filled_quantity(bid.bid_id))
            .sum();
        assert_eq!(admitted, sale.auction.ledger.total_admitted());
        assert!(admitted <= sale.auction.available_supply());
        assert!(sale.auction.queue.len() <= sale.auction.available_supply() as usize);
    }

    #[test]
    fn rejects_bids_outside_window_or_below_floor() {
        let mut sale = sale(10);
        let mut alice = bidder();

        assert_error(
            sale.bid_at(&mut alice, FLOOR, 1, OPEN - 1),
            AllocationError::WindowNotOpen,
        );
        assert_error(
            sale.bid_at(&mut alice, FLOOR, 1, CLOSED),
            AllocationError::WindowClosed,
        );
        assert_error(
            sale.bid(&mut alice, FLOOR - 1, 1),
            AllocationError::BelowMinimumPrice,
        );
        assert_error(sale.bid(&mut alice, FLOOR, 0), AllocationError::InvalidQuantity);
        assert_error(
            sale.bid(&mut alice, u64::MAX, 2),
            AllocationError::ArithmeticOverflow,
        );
        assert_eq!(sale.auction.ledger.next_bid_id(), 0);
        assert!(sale.auction.queue.is_empty());
        assert!(alice.index.bid_ids.is_empty());
    }

    #[test]
    fn enforces_per_address_cap() {
        let window = SaleWindow::new(DAY, 2 * DAY, 0, 30 * DAY).unwrap();
        let mut sale = Sale {
            key: Pubkey::new_unique(),
            auction: Auction::new(Pubkey::new_unique(), window, 10, FLOOR, 2),
        };
        let mut alice = bidder();

        sale.bid(&mut alice, FLOOR, 1).unwrap();
        sale.bid(&mut alice, FLOOR, 1).unwrap();
        assert_error(
            sale.bid(&mut alice, FLOOR, 1),
            AllocationError::PerAddressCapExceeded,
        );
        sale.bid(&mut bidder(), FLOOR, 1).unwrap();
        assert_eq!(sale.auction.ledger.next_bid_id(), 3);
    }

    #[test]
    fn records_min_bid_when_supply_remains() {
        let mut sale = sale(10);
        let mut alice = bidder();

        let admission = sale.bid(&mut alice, FLOOR, 3).unwrap();
        assert_eq!(admission.payment, 3 * FLOOR);
        assert!(admission.evicted.is_empty());
        assert_eq!(alice.index.bid_ids, vec![admission.bid.bid_id]);

        let bid = &admission.bid;
        assert_eq!((bid.auction, bid.bidder), (sale.key, alice.index.owner));
        assert_eq!((bid.price, bid.quantity, bid.claimed), (FLOOR, 3, false));
        assert_eq!(sale.filled(&admission), 3);
        assert!(!sale.auction.saturated);
    }

    #[test]
    fn fills_boundary_bid_partially() {
        let mut sale = sale(10);
        let (mut alice, mut bob) = (bidder(), bidder());

        sale.bid(&mut alice, FLOOR + 1, 7).unwrap();
        let admission = sale.bid(&mut bob, FLOOR, 5).unwrap();

        assert_eq!(admission.boundary, Some((admission.bid.bid_id, 3)));
        assert_eq!(sale.filled(&admission), 3);
        let min = sale.auction.queue.peek_min().unwrap();
        assert_eq!((min.price, min.sequence), (FLOOR, admission.bid.bid_id));
        assert!(sale.auction.saturated);
        assert_supply_invariant(&sale, &[&alice, &bob]);
    }

    #[test]
    fn bid_below_saturated_boundary_is_evicted_on_arrival() {
        let mut sale = sale(10);
        let (mut alice, mut bob) = (bidder(), bidder());

        sale.bid(&mut alice, FLOOR + 1, 10).unwrap();
        let admission = sale.bid(&mut bob, FLOOR, 5).unwrap();

        assert_eq!(admission.evicted, vec![admission.bid.bid_id]);
        assert_eq!(sale.filled(&admission), 0);
        assert_eq!(sale.auction.queue.len(), 1);
    }

    #[test]
    fn equal_price_later_bid_is_evicted_first() {
        let mut sale = sale(10);
        let (mut alice, mut bob) = (bidder(), bidder());

        let first = sale.bid(&mut alice, FLOOR, 10).unwrap();
        let second = sale.bid(&mut bob, FLOOR, 4).unwrap();

        assert_eq!(second.evicted, vec![second.bid.bid_id]);
        assert_eq!(sale.filled(&first), 10);
    }

    #[test]
    fn higher_bid_displaces_lowest_and_sets_clearing_price() {
        let mut sale = sale(10);
        let (mut a, mut b) = (bidder(), bidder());

        let bid_a = sale.bid(&mut a, FLOOR, 10).unwrap();
        let bid_b = sale.bid(&mut b, 110_000_000, 10).unwrap();
        assert_eq!(bid_b.evicted, vec![bid_a.bid.bid_id]);
        assert_eq!(sale.filled(&bid_a), 0);
        assert_eq!(sale.filled(&bid_b), 10);

        assert_eq!(sale.auction.finalize(CLOSED).unwrap(), 110_000_000);

        let claim_a = sale.claim(&mut a, CLOSED).unwrap();
        assert_eq!(claim_a.settlement.refund, FLOOR * 10);
        assert_eq!(claim_a.settlement.units, 0);
        assert_eq!(claim_a.first_unit_id, None);
        assert!(a.bids[0].claimed);

        let claim_b = sale.claim(&mut b, CLOSED).unwrap();
        assert_eq!(claim_b.settlement.refund, 0);
        assert_eq!(claim_b.settlement.units, 10);
        assert_eq!(claim_b.first_unit_id, Some(1));
    }

    #[test]
    fn three_bids_leave_one_partial_boundary() {
        let mut sale = sale(10);
        let (mut a, mut b, mut c) = (bidder(), bidder(), bidder());

        let bid_a = sale.bid(&mut a, 100_000_000, 10).unwrap();
        let bid_b = sale.bid(&mut b, 110_000_000, 10).unwrap();
        let bid_c = sale.bid(&mut c, 120_000_000, 7).unwrap();

        assert_eq!(bid_c.boundary, Some((bid_b.bid.bid_id, 3)));
        assert_eq!(sale.filled(&bid_a), 0);
        assert_eq!(sale.filled(&bid_b), 3);
        assert_eq!(sale.filled(&bid_c), 7);
        assert_supply_invariant(&sale, &[&a, &b, &c]);

        let claim_a = sale.claim(&mut a, CLOSED).unwrap();
        assert_eq!(claim_a.clearing_price, 110_000_000);
        assert_eq!(claim_a.settlement.refund, 100_000_000 * 10);

        let claim_b = sale.claim(&mut b, CLOSED).unwrap();
        assert_eq!(claim_b.settlement.refund, 110_000_000 * 7);
        assert_eq!(claim_b.settlement.units, 3);

        let claim_c = sale.claim(&mut c, CLOSED).unwrap();
        assert_eq!(claim_c.settlement.refund, 10_000_000 * 7);
        assert_eq!(claim_c.settlement.units, 7);
        assert_eq!(sale.auction.supply.minted, 10);
    }

    #[test]
    fn late_high_bid_wins_over_a_flood_of_floor_bids() {
        let mut sale = sale(10);
        let mut flooders: Vec<Bidder> = (0..20).map(|_| bidder()).collect();
        for round in 0..320 {
            sale.bid(&mut flooders[round % 20], FLOOR, 1).unwrap();
        }
        assert_eq!(sale.auction.queue.len(), 10);

        let mut honest = bidder();
        let admission = sale.bid(&mut honest, 100 * FLOOR, 10).unwrap();
        assert_eq!(admission.evicted.len(), 10);
        assert_eq!(sale.filled(&admission), 10);
        assert_eq!(sale.auction.queue.len(), 1);

        assert_eq!(sale.auction.finalize(CLOSED).unwrap(), 100 * FLOOR);
        let claim = sale.claim(&mut honest, CLOSED).unwrap();
        assert_eq!(claim.settlement.units, 10);
        assert_eq!(claim.settlement.refund, 0);

        let flooder = &mut flooders[0];
        let claim = sale.claim(flooder, CLOSED).unwrap();
        assert_eq!(claim.settlement.units, 0);
        assert_eq!(claim.settlement.refund, 16 * FLOOR);
    }

    #[test]
    fn undersubscribed_auction_clears_at_floor() {
        let mut sale = sale(10);
        let (mut a, mut b) = (bidder(), bidder());

        sale.bid(&mut a, FLOOR, 3).unwrap();
        sale.bid(&mut b, FLOOR + 1, 3).unwrap();

        assert_eq!(sale.auction.withdraw_proceeds(CLOSED).unwrap(), FLOOR * 6);
        assert_eq!(sale.claim(&mut b, CLOSED).unwrap().settlement.refund, 3);
    }

    #[test]
    fn saturated_auction_pays_boundary_price_for_full_supply() {
        let mut sale = sale(10);
        let (mut a, mut b, mut c) = (bidder(), bidder(), bidder());

        sale.bid(&mut a, FLOOR, 3).unwrap();
        sale.bid(&mut b, FLOOR + 1, 3).unwrap();
        sale.bid(&mut c, FLOOR + 100, 8).unwrap();

        assert_eq!(
            sale.auction.withdraw_proceeds(CLOSED).unwrap(),
            (FLOOR + 1) * 10
        );
    }

    #[test]
    fn claims_and_withdrawals_are_idempotent() {
        let mut sale = sale(10);
        let mut a = bidder();
        let mut nobody = bidder();

        sale.bid(&mut a, FLOOR + 5, 4).unwrap();

        assert_error(sale.claim(&mut a, OPEN), AllocationError::WindowStillOpen);
        assert_error(
            sale.claim(&mut nobody, CLOSED),
            AllocationError::NothingToClaim,
        );

        let first = sale.claim(&mut a, CLOSED).unwrap();
        assert_eq!(first.settlement.units, 4);
        let second = sale.claim(&mut a, CLOSED).unwrap();
        assert_eq!(second.settlement, Settlement::default());
        assert_eq!(sale.auction.supply.minted, 4);

        assert_eq!(sale.auction.withdraw_proceeds(CLOSED).unwrap(), FLOOR * 4);
        assert_eq!(sale.auction.withdraw_proceeds(CLOSED).unwrap(), 0);
        assert_error(sale.auction.finalize(CLOSED), AllocationError::AlreadyResolved);
    }

    #[test]
    fn claims_reject_foreign_or_missing_bid_records() {
        let mut sale = sale(10);
        let (mut a, mut b) = (bidder(), bidder());
        sale.bid(&mut a, FLOOR, 2).unwrap();
        sale.bid(&mut a, FLOOR, 2).unwrap();
        sale.bid(&mut b, FLOOR, 2).unwrap();

        // one of two records
        let mut partial: Vec<&mut Bid> = a.bids.iter_mut().take(1).collect();
        assert_error(
            sale.auction.claim_bids(&sale.key, &a.index, &mut partial, CLOSED),
            AllocationError::BidMismatch,
        );

        // someone else's record in place of our own
        let mut swapped = vec![a.bids[0].clone(), b.bids[0].clone()];
        let mut swapped_refs: Vec<&mut Bid> = swapped.iter_mut().collect();
        assert_error(
            sale.auction.claim_bids(&sale.key, &a.index, &mut swapped_refs, CLOSED),
            AllocationError::BidMismatch,
        );

        // records of another auction
        let other = Pubkey::new_unique();
        let mut refs: Vec<&mut Bid> = a.bids.iter_mut().collect();
        assert_error(
            sale.auction.claim_bids(&other, &a.index, &mut refs, CLOSED),
            AllocationError::BidMismatch,
        );
        assert!(a.bids.iter().all(|bid| !bid.claimed));
        assert_eq!(sale.auction.supply.minted, 0);
    }

    #[test]
    fn treasury_and_owner_checks() {
        let sale = sale(10);
        let alice = bidder();
        sale.auction.ensure_treasury(&sale.auction.treasury).unwrap();
        assert_error(
            sale.auction.ensure_treasury(&Pubkey::new_unique()),
            AllocationError::InvalidTreasury,
        );
        alice.index.ensure_owner(&alice.index.owner).unwrap();
        assert_error(
            alice.index.ensure_owner(&Pubkey::new_unique()),
            AllocationError::OwnerMismatch,
        );
    }

    #[test]
    fn random_bid_stream_keeps_supply_and_value_balanced() {
        let mut rng = 7u64;
        let mut next = || {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            rng >> 33
        };

        let supply = 25;
        let mut sale = sale(supply);
        let mut bidders: Vec<Bidder> = (0..12).map(|_| bidder()).collect();
        let mut received = 0u64;
        let mut demand = 0u32;

        for round in 0..180 {
            let price = FLOOR + (next() % 40) * 1_000_000;
            let quantity = 1 + (next() % 6) as u32;
            let bidder = &mut bidders[round % 12];
            if bidder.index.bid_ids.len() == 16 {
                continue;
            }

            let admission = sale.bid(bidder, price, quantity).unwrap();
            received += admission.payment;
            demand += quantity;

            let all: Vec<&Bidder> = bidders.iter().collect();
            assert_supply_invariant(&sale, &all);
            if demand >= supply {
                assert_eq!(sale.auction.ledger.total_admitted(), supply);
            }
        }

        let mut paid_out = sale.auction.withdraw_proceeds(CLOSED).unwrap();
        let mut units = 0;
        for bidder in bidders.iter_mut() {
            let claim = sale.claim(bidder, CLOSED).unwrap();
            paid_out += claim.settlement.refund;
            units += claim.settlement.units;
        }

        assert_eq!(paid_out, received);
        assert_eq!(units, supply);
        assert_eq!(
            sale.auction.clearing_price,
            sale.auction.queue.peek_min().map(|node| node.price)
        );
    }
}
