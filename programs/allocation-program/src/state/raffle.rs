use anchor_lang::prelude::*;

use crate::{
    error::AllocationError,
    selection::select_winners,
    state::{
        entry_index::{EntryRangeIndex, RaffleEntry},
        supply::{SupplyCursor, SUPPLY_CURSOR_SIZE},
        ticket_balance::TicketBalance,
        window::{SaleWindow, SALE_WINDOW_SIZE},
    },
};

/// Upper bound on units a raffle can give away.
pub const MAX_RAFFLE_SUPPLY: usize = 500;
/// Largest size a raffle account may grow to as entries are appended.
pub const MAX_RAFFLE_ACCOUNT_SIZE: usize = 10 * 1024 * 1024;

// Space calculation:
// 8 (discriminator) +
// 32 (treasury) +
// 16 (window) +
// 8 (unit_cost) +
// 4 (max_per_address) +
// 1 (raffle_state) +
// 9 (entropy_request_id: Option<u64>) +
// 33 (seed: Option<[u8; 32]>) +
// 1 (proceeds_withdrawn) +
// 8 (supply)
// followed by the entry index, the winning tickets and the claimed bitmap
pub const RAFFLE_BASE_SIZE: usize =
    8 + 32 + SALE_WINDOW_SIZE + 8 + 4 + 1 + 9 + 33 + 1 + SUPPLY_CURSOR_SIZE;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleState {
    Open = 0,
    EntropyRequested = 1,
    EntropyReady = 2,
    Resolved = 3,
}

#[account]
pub struct Raffle {
    pub treasury: Pubkey,
    pub window: SaleWindow,
    pub unit_cost: u64,
    pub max_per_address: u32,
    pub raffle_state: RaffleState,
    pub entropy_request_id: Option<u64>,
    pub seed: Option<[u8; 32]>,
    pub proceeds_withdrawn: bool,
    pub supply: SupplyCursor,
    pub entries: EntryRangeIndex,
    /// Winning ticket indices, sorted ascending.
    pub winning_tickets: Vec<u32>,
    /// Bit `i` is set once `winning_tickets[i]` has been claimed.
    pub claimed: Vec<u8>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct EntryPurchase {
    pub entry: RaffleEntry,
    pub payment: u64,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TicketClaim {
    pub claimed: Vec<u32>,
    pub rejected: Vec<u32>,
    pub first_unit_id: Option<u32>,
}

impl Raffle {
    /// Account size holding `entry_count` entries. The account starts with no
    /// entries and grows by one entry per purchase.
    pub const fn space(entry_count: usize, available_supply: usize) -> usize {
        RAFFLE_BASE_SIZE
            + EntryRangeIndex::space(entry_count)
            + 4
            + 4 * available_supply
            + 4
            + (available_supply + 7) / 8
    }

    pub fn new(
        treasury: Pubkey,
        window: SaleWindow,
        unit_cost: u64,
        available_supply: u32,
        max_per_address: u32,
    ) -> Self {
        Self {
            treasury,
            window,
            unit_cost,
            max_per_address,
            raffle_state: RaffleState::Open,
            entropy_request_id: None,
            seed: None,
            proceeds_withdrawn: false,
            supply: SupplyCursor::new(available_supply),
            entries: EntryRangeIndex::default(),
            winning_tickets: Vec::new(),
            claimed: Vec::new(),
        }
    }

    pub fn total_tickets(&self) -> u32 {
        self.entries.total_tickets()
    }

    pub fn winners_drawn(&self) -> u32 {
        self.winning_tickets.len() as u32
    }

    pub fn owner_of_ticket(&self, ticket: u32) -> Option<Pubkey> {
        self.entries.owner_of(ticket).map(|entry| entry.buyer)
    }

    /// Account size once one more entry has been appended.
    pub fn space_for_next_entry(&self) -> usize {
        Self::space(
            self.entries.entry_count() + 1,
            self.supply.available_supply as usize,
        )
    }

    pub fn ensure_treasury(&self, treasury: &Pubkey) -> Result<()> {
        require_keys_eq!(self.treasury, *treasury, AllocationError::InvalidTreasury);
        Ok(())
    }

    pub fn enter(
        &mut self,
        balance: &mut TicketBalance,
        quantity: u32,
        now: i64,
    ) -> Result<EntryPurchase> {
        self.window.ensure_open(now)?;
        require!(quantity > 0, AllocationError::InvalidQuantity);
        let ticket_count = balance
            .ticket_count
            .checked_add(quantity)
            .ok_or(AllocationError::ArithmeticOverflow)?;
        require!(
            ticket_count <= self.max_per_address,
            AllocationError::PerAddressCapExceeded
        );
        require!(
            self.space_for_next_entry() <= MAX_RAFFLE_ACCOUNT_SIZE,
            AllocationError::RaffleFull
        );
        let payment = self
            .unit_cost
            .checked_mul(u64::from(quantity))
            .ok_or(AllocationError::ArithmeticOverflow)?;

        let entry = self.entries.append(balance.owner, quantity)?;
        balance.ticket_count = ticket_count;

        Ok(EntryPurchase { entry, payment })
    }

    /// First phase of randomness: records the pending request id.
    pub fn request_entropy(&mut self, request_id: u64, now: i64) -> Result<()> {
        require!(
            self.raffle_state != RaffleState::Resolved,
            AllocationError::AlreadyResolved
        );
        require!(
            self.raffle_state == RaffleState::Open,
            AllocationError::EntropyAlreadyRequested
        );
        self.window.ensure_closed(now)?;

        self.entropy_request_id = Some(request_id);
        self.raffle_state = RaffleState::EntropyRequested;
        Ok(())
    }

    /// Second phase: accepts the seed for the pending request, once.
    pub fn deliver_entropy(&mut self, request_id: u64, seed: [u8; 32]) -> Result<()> {
        require!(
            self.raffle_state == RaffleState::EntropyRequested
                && self.entropy_request_id == Some(request_id),
            AllocationError::UnknownRandomnessRequest
        );

        self.seed = Some(seed);
        self.raffle_state = RaffleState::EntropyReady;
        Ok(())
    }

    /// Draws the winning ticket set. Runs exactly once.
    pub fn resolve(&mut self, now: i64) -> Result<u32> {
        require!(
            self.raffle_state != RaffleState::Resolved,
            AllocationError::AlreadyResolved
        );
        self.window.ensure_closed(now)?;
        let seed = self.seed.ok_or(AllocationError::RandomnessNotReady)?;

        let mut winners = select_winners(
            &seed,
            self.entries.total_tickets(),
            self.supply.available_supply,
        )?;
        winners.sort_unstable();

        self.claimed = vec![0; (winners.len() + 7) / 8];
        self.winning_tickets = winners;
        self.raffle_state = RaffleState::Resolved;

        Ok(self.winners_drawn())
    }

    fn winning_position(&self, ticket: u32) -> Option<usize> {
        self.winning_tickets.binary_search(&ticket).ok()
    }

    fn ensure_resolved(&self) -> Result<()> {
        require!(
            self.raffle_state == RaffleState::Resolved,
            AllocationError::NotResolved
        );
        Ok(())
    }

    /// Mints one unit per valid winning ticket in `tickets`.
    ///
    /// Tickets that are not winners, not owned by `buyer`, already claimed or
    /// repeated in the batch are returned as rejected without affecting the
    /// rest. Fails only when nothing in the batch is claimable.
    pub fn claim_tickets(&mut self, buyer: &Pubkey, tickets: &[u32]) -> Result<TicketClaim> {
        self.ensure_resolved()?;

        // Marked on a copy so repeats within the batch are caught the same way
        // as earlier claims, and nothing is written if the batch fails.
        let mut claimed = self.claimed.clone();
        let mut claim = TicketClaim::default();
        for &ticket in tickets {
            let claimable = self.winning_position(ticket).filter(|position| {
                !is_marked(&claimed, *position)
                    && self.owner_of_ticket(ticket).as_ref() == Some(buyer)
            });
            match claimable {
                Some(position) => {
                    claimed[position / 8] |= 1 << (position % 8);
                    claim.claimed.push(ticket);
                }
                None => claim.rejected.push(ticket),
            }
        }
        require!(
            !claim.claimed.is_empty(),
            AllocationError::InvalidOrAlreadyClaimedTicket
        );

        claim.first_unit_id = self.supply.mint(claim.claimed.len() as u32)?;
        self.claimed = claimed;

        Ok(claim)
    }

    pub fn tickets_won_by(&self, buyer: &Pubkey) -> u32 {
        self.winning_tickets
            .iter()
            .filter(|ticket| self.owner_of_ticket(**ticket).as_ref() == Some(buyer))
            .count() as u32
    }

    /// Refund for a buyer's tickets that did not win. Paid once; later calls return zero.
    pub fn claim_refund(&self, balance: &mut TicketBalance) -> Result<u64> {
        self.ensure_resolved()?;
        require!(balance.ticket_count > 0, AllocationError::NothingToClaim);
        if balance.refunded {
            return Ok(0);
        }

        let losing = balance
            .ticket_count
            .checked_sub(self.tickets_won_by(&balance.owner))
            .ok_or(AllocationError::ArithmeticOverflow)?;
        let refund = self
            .unit_cost
            .checked_mul(u64::from(losing))
            .ok_or(AllocationError::ArithmeticOverflow)?;
        balance.refunded = true;

        Ok(refund)
    }

    /// Unit cost of every winning ticket. Paid once; later calls return zero.
    pub fn withdraw_proceeds(&mut self) -> Result<u64> {
        self.ensure_resolved()?;
        if self.proceeds_withdrawn {
            return Ok(0);
        }

        let proceeds = self
            .unit_cost
            .checked_mul(u64::from(self.winners_drawn()))
            .ok_or(AllocationError::ArithmeticOverflow)?;
        self.proceeds_withdrawn = true;

        Ok(proceeds)
    }
}

fn is_marked(bitmap: &[u8], position: usize) -> bool {
    bitmap[position / 8] & (1 << (position % 8)) != 0
}
