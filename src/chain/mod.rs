pub mod contract;
pub mod evm;
#[cfg(test)]
pub mod memory;

use alloy::primitives::{Address, TxHash, U256};
use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Creator, Memo, Receipt, WriteAction};

/// Every call the client makes against the chain: contract reads, the price
/// oracle, and transaction submission through the connected wallet.
#[async_trait]
pub trait TipJar: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;

    /// Native balance of an account, used for the tip balance check.
    async fn wallet_balance(&self, account: Address) -> Result<U256>;

    /// `None` when the address has never registered.
    async fn creator(&self, owner: Address) -> Result<Option<Creator>>;

    async fn creator_by_name(&self, name: &str) -> Result<Option<Creator>>;

    async fn memos(&self, owner: Address) -> Result<Vec<Memo>>;

    async fn memos_page(&self, owner: Address, offset: u64, limit: u64) -> Result<Vec<Memo>>;

    async fn creator_balance(&self, owner: Address) -> Result<U256>;

    async fn memo_count(&self, owner: Address) -> Result<u64>;

    /// ETH/USD from the price feed, already scaled by the feed decimals.
    async fn eth_usd_price(&self) -> Result<f64>;

    /// Signs and broadcasts the call. Returns once the node accepted it.
    async fn submit(&self, action: &WriteAction) -> Result<TxHash>;

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt>;

    /// Non-blocking receipt lookup; `None` while the transaction is unmined.
    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>>;
}
