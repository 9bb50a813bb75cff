pub mod address;
pub mod amount;
pub mod block;
pub mod event;

pub use address::{lower_hex, parse_address, Address};
pub use amount::{Amount, WEI_PER_ETHER};
pub use block::{Block, Transaction};
pub use event::{CycleSummary, MonitorEvent, Operation};
