use std::future::Future;
use std::io::Write;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tokio::time::sleep;

use crate::blockchain::{AddressSource, ChainReader, ScanCursor, ScanEngine};
use crate::config::AppConfig;
use crate::error::{Result, ValidationError};
use crate::logging::{LogContext, MetricsLogger};
use crate::models::{CycleSummary, MonitorEvent};
use crate::output::EventPrinter;
use crate::retry::RetryConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub retry: RetryConfig,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            retry: RetryConfig::default(),
        }
    }
}

impl MonitorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.monitor.poll_interval_seconds),
            retry: RetryConfig::from_rpc_config(&config.rpc),
        }
    }
}

/// The poll loop: owns the scan cursor, the chain reader and the address
/// source, and runs one cycle at a time.
pub struct AddressMonitor<R, S> {
    engine: ScanEngine<R>,
    source: S,
    cursor: ScanCursor,
    settings: MonitorSettings,
}

impl<R: ChainReader, S: AddressSource> AddressMonitor<R, S> {
    /// Start watching from the current chain tip; earlier history is never
    /// scanned.
    pub async fn initialize(reader: R, source: S, settings: MonitorSettings) -> Result<Self> {
        let engine = ScanEngine::new(reader, settings.retry.clone());
        let start_height = engine.current_height().await?;

        info!("Starting from block height {}", start_height);

        Ok(Self {
            engine,
            source,
            cursor: ScanCursor::new(start_height),
            settings,
        })
    }

    /// Build a monitor around an existing cursor
    pub fn with_cursor(reader: R, source: S, cursor: ScanCursor, settings: MonitorSettings) -> Self {
        Self {
            engine: ScanEngine::new(reader, settings.retry.clone()),
            source,
            cursor,
            settings,
        }
    }

    pub fn cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    /// Look up the configured address and point the cursor at it
    pub fn resolve_target(&mut self) -> MonitorEvent {
        match self.source.resolve() {
            Ok(Some(address)) => {
                if self.cursor.retarget(Some(address)) {
                    LogContext::new("monitor", "resolve_target")
                        .with_address(&address.to_string())
                        .with_block_height(self.cursor.last_scanned_height())
                        .info("Monitored address changed, balance baseline reset");
                }
                MonitorEvent::Monitoring { address }
            }
            Ok(None) => {
                self.cursor.retarget(None);
                MonitorEvent::Unmonitored
            }
            Err(e) => {
                self.cursor.retarget(None);
                warn!("Ignoring configured address for this cycle: {}", e);
                let (input, reason) = match e {
                    ValidationError::InvalidAddress { input, reason } => (input, reason),
                    other => (String::new(), other.to_string()),
                };
                MonitorEvent::InvalidAddress { input, reason }
            }
        }
    }

    /// Resolve the address, refresh the balance, then scan new blocks
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let starting_height = self.cursor.last_scanned_height();
        let mut events = vec![self.resolve_target()];

        if !self.cursor.is_monitoring() {
            debug!("No address to monitor this cycle");
            return CycleSummary {
                events,
                starting_height,
                scanned_height: starting_height,
                chain_height: None,
            };
        }

        events.extend(self.engine.refresh_balance(&mut self.cursor).await);

        let scan = self.engine.scan_new_blocks(&mut self.cursor).await;
        events.extend(scan.events);

        CycleSummary {
            events,
            starting_height,
            scanned_height: self.cursor.last_scanned_height(),
            chain_height: scan.chain_height,
        }
    }

    /// Run cycles until `shutdown` resolves, printing every event.
    ///
    /// Shutdown is only observed while sleeping between cycles. Returns the
    /// last scanned height.
    pub async fn run<W, F>(&mut self, printer: &mut EventPrinter<W>, shutdown: F) -> u64
    where
        W: Write,
        F: Future<Output = ()>,
    {
        info!(
            "Starting address monitor with {} second polling interval",
            self.settings.poll_interval.as_secs()
        );

        tokio::pin!(shutdown);

        loop {
            let started = Instant::now();
            let summary = self.run_cycle().await;

            if let Err(e) = printer.print_all(&summary.events) {
                warn!("Failed to write events: {}", e);
            }
            MetricsLogger::log_cycle(&summary, started.elapsed().as_millis() as u64);

            tokio::select! {
                _ = sleep(self.settings.poll_interval) => {}
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping address monitor");
                    break;
                }
            }
        }

        self.cursor.last_scanned_height()
    }
}
