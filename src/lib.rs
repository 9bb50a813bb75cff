pub mod blockchain;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod retry;

pub use blockchain::{AddressMonitor, AddressSource, ChainReader, EnvAddressSource, RpcClient, ScanCursor, ScanEngine};
pub use config::{AppConfig, LoggingConfig, MonitorConfig, RpcConfig};
pub use error::{MonitorError, Result};
pub use logging::{ErrorLogger, LogContext, MetricsLogger, PerformanceMonitor};
pub use models::{Address, Amount, Block, CycleSummary, MonitorEvent, Transaction};
pub use output::EventPrinter;
pub use retry::{RetryConfig, RetryManager};
