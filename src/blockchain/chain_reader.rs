use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Address, Amount, Block};

/// Read-only view of the chain.
///
/// Implementations hold no scan state and do not retry; every call stands on
/// its own and may fail with a transport error. `block_at` fails with
/// `MonitorError::NotFound` for heights past the tip.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Latest block height known to the node
    async fn current_height(&self) -> Result<u64>;

    /// One block with its full transaction list
    async fn block_at(&self, height: u64) -> Result<Block>;

    /// Balance of an account at the latest block
    async fn balance_of(&self, address: &Address) -> Result<Amount>;
}

#[async_trait]
impl<R: ChainReader + ?Sized> ChainReader for Arc<R> {
    async fn current_height(&self) -> Result<u64> {
        (**self).current_height().await
    }

    async fn block_at(&self, height: u64) -> Result<Block> {
        (**self).block_at(height).await
    }

    async fn balance_of(&self, address: &Address) -> Result<Amount> {
        (**self).balance_of(address).await
    }
}
