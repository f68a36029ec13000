pub use claim_bids::*;
pub use claim_raffle::*;
pub use claim_raffle_refund::*;
pub use clear_raffle::*;
pub use close_auction::*;
pub use create_auction::*;
pub use create_raffle::*;
pub use deliver_entropy::*;
pub use enter_raffle::*;
pub use init_bidder_index::*;
pub use init_config::*;
pub use init_ticket_balance::*;
pub use set_clearing_entropy::*;
pub use submit_bid::*;
pub use withdraw_auction_proceeds::*;
pub use withdraw_raffle_proceeds::*;

pub mod claim_bids;
pub mod claim_raffle;
pub mod claim_raffle_refund;
pub mod clear_raffle;
pub mod close_auction;
pub mod create_auction;
pub mod create_raffle;
pub mod deliver_entropy;
pub mod enter_raffle;
pub mod init_bidder_index;
pub mod init_config;
pub mod init_ticket_balance;
pub mod set_clearing_entropy;
pub mod submit_bid;
pub mod withdraw_auction_proceeds;
pub mod withdraw_raffle_proceeds;
