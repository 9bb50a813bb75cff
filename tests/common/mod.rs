#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use address_monitor::blockchain::{ChainReader, MonitorSettings};
use address_monitor::error::{MonitorError, Result, TransportError};
use address_monitor::models::{parse_address, Address, Amount, Block, Transaction};
use address_monitor::retry::RetryConfig;

pub const ALICE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const BOB: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
pub const CAROL: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";

pub fn address(s: &str) -> Address {
    parse_address(s).expect("valid test address")
}

pub fn transfer(hash: &str, from: &str, to: Option<&str>, wei: u128) -> Transaction {
    Transaction {
        hash: hash.to_string(),
        from: address(from),
        to: to.map(address),
        value: Amount::from_wei(wei),
    }
}

pub fn fast_settings() -> MonitorSettings {
    MonitorSettings {
        poll_interval: Duration::from_millis(10),
        retry: RetryConfig::none(),
    }
}

#[derive(Default)]
struct ChainState {
    height: u64,
    blocks: BTreeMap<u64, Vec<Transaction>>,
    balances: HashMap<Address, Amount>,
    failing_blocks: HashSet<u64>,
    corrupt_blocks: HashSet<u64>,
    block_requests: Vec<u64>,
    height_failures: u32,
    balance_failures: u32,
    fetched: Vec<u64>,
}

/// In-memory chain with failure injection
pub struct FakeChain {
    state: Mutex<ChainState>,
}

impl FakeChain {
    pub fn new(height: u64) -> Self {
        Self {
            state: Mutex::new(ChainState {
                height,
                ..ChainState::default()
            }),
        }
    }

    /// Append a block at the next height and return that height
    pub fn mine(&self, transactions: Vec<Transaction>) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.height += 1;
        let height = state.height;
        state.blocks.insert(height, transactions);
        height
    }

    pub fn mine_empty(&self, count: u64) -> u64 {
        for _ in 0..count {
            self.mine(Vec::new());
        }
        self.height()
    }

    pub fn height(&self) -> u64 {
        self.state.lock().unwrap().height
    }

    pub fn set_balance(&self, who: &str, wei: u128) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert(address(who), Amount::from_wei(wei));
    }

    pub fn fail_block(&self, height: u64) {
        self.state.lock().unwrap().failing_blocks.insert(height);
    }

    pub fn heal_block(&self, height: u64) {
        let mut state = self.state.lock().unwrap();
        state.failing_blocks.remove(&height);
        state.corrupt_blocks.remove(&height);
    }

    /// The block at `height` comes back as a body that cannot be decoded
    pub fn corrupt_block(&self, height: u64) {
        self.state.lock().unwrap().corrupt_blocks.insert(height);
    }

    /// The next `count` height queries fail
    pub fn fail_height_queries(&self, count: u32) {
        self.state.lock().unwrap().height_failures = count;
    }

    /// The next `count` balance queries fail
    pub fn fail_balance_queries(&self, count: u32) {
        self.state.lock().unwrap().balance_failures = count;
    }

    /// Every height passed to `block_at`, including failed calls
    pub fn block_requests(&self) -> Vec<u64> {
        self.state.lock().unwrap().block_requests.clone()
    }

    /// Heights successfully returned by `block_at`, in call order
    pub fn fetched_heights(&self) -> Vec<u64> {
        self.state.lock().unwrap().fetched.clone()
    }
}

fn outage() -> MonitorError {
    MonitorError::Transport(TransportError::Connection("connection refused".to_string()))
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn current_height(&self) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        if state.height_failures > 0 {
            state.height_failures -= 1;
            return Err(outage());
        }
        Ok(state.height)
    }

    async fn block_at(&self, height: u64) -> Result<Block> {
        let mut state = self.state.lock().unwrap();
        state.block_requests.push(height);
        if state.failing_blocks.contains(&height) {
            return Err(outage());
        }
        if state.corrupt_blocks.contains(&height) {
            return Err(MonitorError::Transport(TransportError::InvalidResponse(
                "Invalid amount: 0xnot-a-quantity".to_string(),
            )));
        }
        if height > state.height {
            return Err(MonitorError::NotFound { height });
        }
        state.fetched.push(height);
        Ok(Block {
            height,
            hash: format!("0xblock{}", height),
            transactions: state.blocks.get(&height).cloned().unwrap_or_default(),
        })
    }

    async fn balance_of(&self, address: &Address) -> Result<Amount> {
        let mut state = self.state.lock().unwrap();
        if state.balance_failures > 0 {
            state.balance_failures -= 1;
            return Err(outage());
        }
        Ok(state.balances.get(address).copied().unwrap_or_default())
    }
}
