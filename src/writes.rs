use alloy::primitives::{Address, TxHash};
use anyhow::{Result, anyhow};
use tracing::{info, warn};

use crate::chain::TipJar;
use crate::db::Journal;
use crate::models::{NewWrite, Receipt, WriteAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStage {
    Idle,
    /// Wallet is signing and broadcasting.
    Pending,
    /// Accepted by the node, not yet included.
    Waiting(TxHash),
    Settled(Receipt),
}

impl WriteStage {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Settled(receipt) if receipt.success)
    }
}

/// Drives one state-changing call through submission and confirmation,
/// journaling the hash as soon as the node accepts it.
pub struct WriteFlow<'a, J: TipJar + ?Sized> {
    jar: &'a J,
    journal: &'a Journal,
    sender: Address,
    action: WriteAction,
    stage: WriteStage,
}

impl<'a, J: TipJar + ?Sized> WriteFlow<'a, J> {
    pub fn new(jar: &'a J, journal: &'a Journal, sender: Address, action: WriteAction) -> Self {
        Self {
            jar,
            journal,
            sender,
            action,
            stage: WriteStage::Idle,
        }
    }

    pub fn stage(&self) -> &WriteStage {
        &self.stage
    }

    pub fn action(&self) -> &WriteAction {
        &self.action
    }

    /// `Idle -> Pending -> Waiting`. A rejected submission drops back to
    /// `Idle` and is never retried.
    pub async fn submit(&mut self) -> Result<TxHash> {
        if self.stage != WriteStage::Idle {
            return Err(anyhow!("{} は既に送信済みです", self.action.label()));
        }
        self.stage = WriteStage::Pending;
        info!(action = self.action.label(), sender = %self.sender, "submitting transaction");

        let tx_hash = match self.jar.submit(&self.action).await {
            Ok(tx_hash) => tx_hash,
            Err(err) => {
                self.stage = WriteStage::Idle;
                warn!(action = self.action.label(), error = %err, "submission rejected");
                return Err(err.context(self.action.failure_notice()));
            }
        };

        self.journal.record_submitted(&NewWrite {
            action: self.action.label().to_string(),
            tx_hash,
            sender: Some(self.sender),
            value: self.action.value(),
        })?;
        self.stage = WriteStage::Waiting(tx_hash);
        info!(action = self.action.label(), %tx_hash, "transaction accepted");
        Ok(tx_hash)
    }

    /// `Waiting -> Settled`. Blocks until the receipt arrives; there is no
    /// timeout beyond the provider's own.
    pub async fn settle(&mut self) -> Result<Receipt> {
        let WriteStage::Waiting(tx_hash) = self.stage else {
            return Err(anyhow!("{} は確認待ちではありません", self.action.label()));
        };

        let receipt = self
            .jar
            .wait_for_receipt(tx_hash)
            .await
            .map_err(|err| err.context(self.action.failure_notice()))?;
        self.journal.mark_settled(&receipt)?;
        self.stage = WriteStage::Settled(receipt.clone());

        if !receipt.success {
            warn!(action = self.action.label(), %tx_hash, "transaction reverted");
            return Err(anyhow!(
                "{}: transaction {tx_hash} reverted",
                self.action.failure_notice()
            ));
        }
        info!(action = self.action.label(), %tx_hash, block = ?receipt.block_number, "transaction confirmed");
        Ok(receipt)
    }
}
