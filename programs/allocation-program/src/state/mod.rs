pub use admission_queue::*;
pub use auction::*;
pub use bid_ledger::*;
pub use bidder_index::*;
pub use config::*;
pub use entry_index::*;
pub use raffle::*;
pub use supply::*;
pub use ticket_balance::*;
pub use treasury::*;
pub use window::*;

pub mod admission_queue;
pub mod auction;
pub mod bid_ledger;
pub mod bidder_index;
pub mod config;
pub mod entry_index;
pub mod raffle;
pub mod supply;
pub mod ticket_balance;
pub mod treasury;
pub mod window;
