use alloy::primitives::TxHash;
use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use crate::chain::TipJar;
use crate::db::Journal;
use crate::models::{JournalEntry, TxStatus};

#[derive(Debug, Serialize)]
struct EntryView {
    action: String,
    tx_hash: String,
    sender: Option<String>,
    value_wei: String,
    status: String,
    block_number: Option<i64>,
    submitted_at: String,
}

impl From<&JournalEntry> for EntryView {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            action: entry.action.clone(),
            tx_hash: entry.tx_hash.clone(),
            sender: entry.sender.clone(),
            value_wei: entry.value_wei.clone(),
            status: entry.status.to_string(),
            block_number: entry.block_number,
            submitted_at: entry.created_at.clone(),
        }
    }
}

/// Polls receipts for journaled transactions still waiting, then lists the
/// most recent submissions.
pub async fn run<J: TipJar + ?Sized>(
    jar: &J,
    journal: &Journal,
    limit: u32,
    json: bool,
) -> Result<()> {
    for entry in journal.waiting()? {
        let tx_hash = match entry.tx_hash.parse::<TxHash>() {
            Ok(tx_hash) => tx_hash,
            Err(err) => {
                warn!(tx = %entry.tx_hash, error = %err, "unparseable hash in journal");
                continue;
            }
        };
        match jar.receipt(tx_hash).await {
            Ok(Some(receipt)) => journal.mark_settled(&receipt)?,
            Ok(None) => {}
            Err(err) => warn!(tx = %entry.tx_hash, error = %err, "receipt poll failed"),
        }
    }

    let entries = journal.recent(limit)?;
    if json {
        let views: Vec<EntryView> = entries.iter().map(EntryView::from).collect();
        return super::emit_json(&views);
    }

    if entries.is_empty() {
        println!("このマシンから送信したTxはまだありません");
        return Ok(());
    }

    for entry in &entries {
        let block = entry
            .block_number
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "id={} action={} status={} block={} tx={} at={}",
            entry.id, entry.action, entry.status, block, entry.tx_hash, entry.created_at
        );
    }

    let waiting = entries
        .iter()
        .filter(|e| e.status == TxStatus::Waiting)
        .count();
    if waiting > 0 {
        println!("確認待ちのTx: {waiting}件");
    }
    Ok(())
}
