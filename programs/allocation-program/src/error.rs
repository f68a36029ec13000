use anchor_lang::error_code;

#[error_code]
pub enum AllocationError {
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    #[msg("The sale window has not opened yet")]
    WindowNotOpen,
    #[msg("The sale window has closed")]
    WindowClosed,
    #[msg("The sale window is still open")]
    WindowStillOpen,
    #[msg("Bid price is below the floor price")]
    BelowMinimumPrice,
    #[msg("Quantity must be greater than zero")]
    InvalidQuantity,
    #[msg("Per address cap exceeded")]
    PerAddressCapExceeded,
    #[msg("The auction has issued every bid id")]
    AuctionFull,
    #[msg("The raffle account has reached its maximum size")]
    RaffleFull,
    #[msg("Randomness has not been delivered yet")]
    RandomnessNotReady,
    #[msg("Entropy has already been requested for this raffle")]
    EntropyAlreadyRequested,
    #[msg("No pending randomness request matches this delivery")]
    UnknownRandomnessRequest,
    #[msg("The outcome has already been resolved")]
    AlreadyResolved,
    #[msg("Ticket is not a winner, not owned by the caller, or already claimed")]
    InvalidOrAlreadyClaimedTicket,
    #[msg("Nothing to claim")]
    NothingToClaim,
    #[msg("The outcome has not been resolved yet")]
    NotResolved,
    #[msg("Not enough supply left to mint")]
    SupplyExhausted,
    #[msg("End time must be after start time and within the maximum duration")]
    InvalidWindow,
    #[msg("Available supply must be between 1 and the maximum supply")]
    InvalidSupply,
    #[msg("Per address cap is out of range")]
    InvalidCapacity,
    #[msg("Price is below the minimum allowed")]
    PriceTooLow,
    #[msg("Price exceeds the maximum allowed")]
    PriceTooHigh,
    #[msg("Only the program management authority can create sales")]
    NotProgramManagementAuthority,
    #[msg("Only the payout authority may receive proceeds")]
    NotPayoutAuthority,
    #[msg("Only the randomness authority may deliver entropy")]
    NotRandomnessAuthority,
    #[msg("Treasury does not belong to this sale")]
    InvalidTreasury,
    #[msg("Signer does not own this account")]
    OwnerMismatch,
    #[msg("Treasury transfer failed")]
    TransferFailed,
    #[msg("Bid accounts do not match the bidder's bid ids")]
    BidMismatch,
    #[msg("Admission queue does not hold the expected bid")]
    QueueInvariantViolated,
}
