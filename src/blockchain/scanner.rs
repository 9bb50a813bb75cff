use crate::blockchain::{ChainReader, ScanCursor};
use crate::error::Result;
use crate::logging::{ErrorLogger, LogContext, MetricsLogger};
use crate::models::{Address, Amount, Block, MonitorEvent, Operation};
use crate::retry::{RetryConfig, RetryManager};

/// Result of one block scan
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub events: Vec<MonitorEvent>,
    /// Chain tip reported by the node, None if it could not be read
    pub chain_height: Option<u64>,
}

/// Runs the balance refresh and block scan against a chain reader.
///
/// Holds no monitoring state of its own; every operation works on the cursor
/// passed in. Failures are turned into `OperationFailed` events and never
/// leave the cursor ahead of what was actually scanned.
pub struct ScanEngine<R> {
    reader: R,
    retry: RetryConfig,
}

impl<R: ChainReader> ScanEngine<R> {
    pub fn new(reader: R, retry: RetryConfig) -> Self {
        Self { reader, retry }
    }

    /// Latest chain height, retried per the engine's policy
    pub async fn current_height(&self) -> Result<u64> {
        RetryManager::new("eth_blockNumber", self.retry.clone())
            .execute(|| self.reader.current_height())
            .await
    }

    async fn block_at(&self, height: u64) -> Result<Block> {
        RetryManager::new("eth_getBlockByNumber", self.retry.clone())
            .execute(|| self.reader.block_at(height))
            .await
    }

    async fn balance_of(&self, address: &Address) -> Result<Amount> {
        RetryManager::new("eth_getBalance", self.retry.clone())
            .execute(|| self.reader.balance_of(address))
            .await
    }

    /// Fetch the monitored address's balance and report it if it changed
    pub async fn refresh_balance(&self, cursor: &mut ScanCursor) -> Vec<MonitorEvent> {
        let Some(address) = cursor.monitored_address() else {
            return Vec::new();
        };

        match self.balance_of(&address).await {
            Ok(balance) => cursor.observe_balance(balance).into_iter().collect(),
            Err(e) => {
                ErrorLogger::log_error(
                    &e,
                    Some(LogContext::new("scanner", "refresh_balance").with_address(&address.to_string())),
                );
                vec![MonitorEvent::OperationFailed {
                    operation: Operation::FetchBalance,
                    error: e.to_string(),
                }]
            }
        }
    }

    /// Scan every block after the cursor up to the current tip.
    ///
    /// Stops at the first block that cannot be fetched; that height is the
    /// first one scanned next time.
    pub async fn scan_new_blocks(&self, cursor: &mut ScanCursor) -> ScanOutcome {
        let Some(address) = cursor.monitored_address() else {
            return ScanOutcome::default();
        };

        let mut outcome = ScanOutcome::default();

        let current = match self.current_height().await {
            Ok(current) => current,
            Err(e) => {
                ErrorLogger::log_error(&e, Some(LogContext::new("scanner", "current_height")));
                outcome.events.push(MonitorEvent::OperationFailed {
                    operation: Operation::ScanBlocks,
                    error: e.to_string(),
                });
                return outcome;
            }
        };
        outcome.chain_height = Some(current);

        for height in cursor.next_height()..=current {
            let block = match self.block_at(height).await {
                Ok(block) => block,
                Err(e) => {
                    ErrorLogger::log_error(
                        &e,
                        Some(LogContext::new("scanner", "block_at").with_block_height(height)),
                    );
                    outcome.events.push(MonitorEvent::OperationFailed {
                        operation: Operation::ScanBlocks,
                        error: e.to_string(),
                    });
                    break;
                }
            };

            let mut matched = 0;
            for transaction in block.transactions_touching(&address) {
                LogContext::new("scanner", "match")
                    .with_block_height(height)
                    .with_transaction_hash(&transaction.hash)
                    .with_amount(&transaction.value.to_ether_string())
                    .info("Transaction touches monitored address");

                outcome.events.push(MonitorEvent::TransactionMatched {
                    height,
                    transaction: transaction.clone(),
                });
                matched += 1;
            }

            MetricsLogger::log_block_scanned(height, block.transactions.len(), matched);
            cursor.advance_to(height);
        }

        outcome
    }
}
