pub mod address_monitor;
pub mod address_source;
pub mod chain_reader;
pub mod rpc_client;
pub mod scan_cursor;
pub mod scanner;

pub use address_monitor::{AddressMonitor, MonitorSettings};
pub use address_source::{AddressSource, EnvAddressSource, SharedAddressSource};
pub use chain_reader::ChainReader;
pub use rpc_client::RpcClient;
pub use scan_cursor::ScanCursor;
pub use scanner::{ScanEngine, ScanOutcome};
