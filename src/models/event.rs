use std::fmt;

use crate::models::{lower_hex, Address, Amount, Transaction};

/// The operation a recoverable failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchBalance,
    ScanBlocks,
}

impl Operation {
    pub fn describe(&self) -> &'static str {
        match self {
            Operation::FetchBalance => "Error fetching balance",
            Operation::ScanBlocks => "Error scanning blocks",
        }
    }
}

/// Everything a poll cycle reports, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// An address is being watched this cycle
    Monitoring { address: Address },
    /// No address is configured
    Unmonitored,
    /// The configured address string could not be parsed
    InvalidAddress { input: String, reason: String },
    BalanceChanged {
        address: Address,
        previous: Option<Amount>,
        current: Amount,
    },
    TransactionMatched { height: u64, transaction: Transaction },
    OperationFailed { operation: Operation, error: String },
}

impl MonitorEvent {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            MonitorEvent::OperationFailed { .. } | MonitorEvent::InvalidAddress { .. }
        )
    }
}

impl fmt::Display for MonitorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorEvent::Monitoring { address } => {
                write!(f, "Monitoring address: {}", address)
            }
            MonitorEvent::Unmonitored => write!(
                f,
                "ADDRESS not set. Export ADDRESS env var to monitor an address (e.g. export ADDRESS=0x..)."
            ),
            MonitorEvent::InvalidAddress { input, reason } => write!(
                f,
                "ADDRESS {:?} is not a valid address ({}); please set a valid 0x... address.",
                input, reason
            ),
            MonitorEvent::BalanceChanged {
                address,
                previous,
                current,
            } => match previous {
                Some(previous) => write!(
                    f,
                    "Balance for {}: {} (was {})",
                    address, current, previous
                ),
                None => write!(f, "Balance for {}: {}", address, current),
            },
            MonitorEvent::TransactionMatched { height, transaction } => {
                let to = transaction
                    .to
                    .map(|to| lower_hex(&to))
                    .unwrap_or_else(|| "none (contract creation)".to_string());
                write!(
                    f,
                    "[block {}] tx {} from {} to {} value {}",
                    height,
                    transaction.hash,
                    lower_hex(&transaction.from),
                    to,
                    transaction.value
                )
            }
            MonitorEvent::OperationFailed { operation, error } => {
                write!(f, "{}: {}", operation.describe(), error)
            }
        }
    }
}

/// What one poll cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub events: Vec<MonitorEvent>,
    /// Cursor position before the cycle
    pub starting_height: u64,
    /// Cursor position after the cycle
    pub scanned_height: u64,
    /// Chain tip seen this cycle, if the node answered
    pub chain_height: Option<u64>,
}

impl CycleSummary {
    pub fn blocks_scanned(&self) -> u64 {
        self.scanned_height - self.starting_height
    }

    pub fn matched_transactions(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, MonitorEvent::TransactionMatched { .. }))
            .count()
    }

    pub fn failures(&self) -> usize {
        self.events.iter().filter(|event| event.is_failure()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::amount::WEI_PER_ETHER;
    use crate::models::parse_address;

    fn sample_address() -> Address {
        parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap()
    }

    #[test]
    fn test_transaction_line() {
        let event = MonitorEvent::TransactionMatched {
            height: 101,
            transaction: Transaction {
                hash: "0xabc123".to_string(),
                from: sample_address(),
                to: Some(Address::repeat_byte(0xbb)),
                value: Amount::from_wei(5 * WEI_PER_ETHER),
            },
        };

        assert_eq!(
            event.to_string(),
            "[block 101] tx 0xabc123 from 0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed \
             to 0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb value 5 ETH"
        );
    }

    #[test]
    fn test_contract_creation_line() {
        let event = MonitorEvent::TransactionMatched {
            height: 9,
            transaction: Transaction {
                hash: "0xdef".to_string(),
                from: sample_address(),
                to: None,
                value: Amount::ZERO,
            },
        };

        assert!(event.to_string().contains("to none (contract creation) value 0 ETH"));
    }

    #[test]
    fn test_balance_lines() {
        let first = MonitorEvent::BalanceChanged {
            address: sample_address(),
            previous: None,
            current: Amount::from_wei(WEI_PER_ETHER / 2),
        };
        assert_eq!(
            first.to_string(),
            "Balance for 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed: 0.5 ETH"
        );

        let change = MonitorEvent::BalanceChanged {
            address: sample_address(),
            previous: Some(Amount::from_wei(WEI_PER_ETHER / 2)),
            current: Amount::from_wei(WEI_PER_ETHER),
        };
        assert!(change.to_string().ends_with(": 1 ETH (was 0.5 ETH)"));
    }

    #[test]
    fn test_failure_lines_name_the_operation() {
        let balance = MonitorEvent::OperationFailed {
            operation: Operation::FetchBalance,
            error: "timeout".to_string(),
        };
        assert_eq!(balance.to_string(), "Error fetching balance: timeout");
        assert!(balance.is_failure());

        let scan = MonitorEvent::OperationFailed {
            operation: Operation::ScanBlocks,
            error: "Block 12 not found".to_string(),
        };
        assert_eq!(scan.to_string(), "Error scanning blocks: Block 12 not found");
    }

    #[test]
    fn test_summary_counts() {
        let summary = CycleSummary {
            events: vec![
                MonitorEvent::Monitoring { address: sample_address() },
                MonitorEvent::OperationFailed {
                    operation: Operation::ScanBlocks,
                    error: "down".to_string(),
                },
            ],
            starting_height: 100,
            scanned_height: 103,
            chain_height: Some(105),
        };

        assert_eq!(summary.blocks_scanned(), 3);
        assert_eq!(summary.matched_transactions(), 0);
        assert_eq!(summary.failures(), 1);
    }
}
