pub mod dashboard;
pub mod history;
pub mod profile;
pub mod register;
pub mod status;
pub mod tip;
pub mod update;
pub mod wallet;
pub mod withdraw;

use alloy::primitives::{Address, U256};
use anyhow::Result;
use serde::Serialize;

use crate::chain::TipJar;
use crate::db::Journal;
use crate::format::{format_address, format_eth, format_time_ago, format_usd};
use crate::models::{Creator, Memo, WriteAction};
use crate::reads::Reads;
use crate::writes::{WriteFlow, WriteStage};

/// Submits `action` and, unless `wait` is off, blocks until it settles.
/// With `wait` the success notice is held back until the receipt confirms
/// inclusion; without it the notice is optimistic. A confirmed write drops
/// every cached read so the caller's next lookups see the new state.
pub(crate) async fn drive_write<J: TipJar + ?Sized>(
    reads: &mut Reads<'_, J>,
    journal: &Journal,
    sender: Address,
    action: WriteAction,
    wait: bool,
) -> Result<WriteStage> {
    let mut flow = WriteFlow::new(reads.jar(), journal, sender, action);
    let tx_hash = flow.submit().await?;
    println!("Txを送信しました: tx={tx_hash}");

    if !wait {
        println!("{} (pending confirmation)", flow.action().success_notice());
        println!("次: coffeechain status");
        return Ok(flow.stage().clone());
    }

    let receipt = flow.settle().await?;
    match receipt.block_number {
        Some(block) => println!("{} block={block}", flow.action().success_notice()),
        None => println!("{}", flow.action().success_notice()),
    }
    if flow.stage().is_confirmed() {
        reads.invalidate();
    }
    Ok(flow.stage().clone())
}

/// State re-read once a write is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Refreshed {
    Profile(Creator),
    Supports {
        creator: Creator,
        supporters: u64,
    },
    Withdrawable(U256),
}

impl Refreshed {
    pub(crate) fn print(&self) {
        match self {
            Self::Profile(creator) => {
                println!("{} ({})", creator.name, format_address(Some(creator.owner)));
                println!("{}", creator.about);
            }
            Self::Supports {
                creator,
                supporters,
            } => println!(
                "{}: {} received from {supporters} supporter(s)",
                creator.name,
                format_eth(creator.total_received)
            ),
            Self::Withdrawable(balance) => println!("Withdrawable: {}", format_eth(*balance)),
        }
    }
}

pub(crate) fn emit_json<T: Serialize>(view: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

pub(crate) fn now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[derive(Debug, Serialize)]
pub(crate) struct MemoView {
    pub from: String,
    pub name: String,
    pub message: String,
    pub timestamp: u64,
}

impl From<&Memo> for MemoView {
    fn from(memo: &Memo) -> Self {
        Self {
            from: memo.from.to_checksum(None),
            name: memo.name.clone(),
            message: memo.message.clone(),
            timestamp: memo.timestamp,
        }
    }
}

pub(crate) fn print_memos(memos: &[Memo], now: u64) {
    for memo in memos {
        println!(
            "{} ({}) {}",
            memo.name,
            format_address(Some(memo.from)),
            format_time_ago(memo.timestamp, now)
        );
        if !memo.message.is_empty() {
            println!("    {}", memo.message);
        }
    }
}

pub(crate) fn print_amount_line(label: &str, wei: U256, eth_usd: f64) {
    println!("{label}: {} ({})", format_eth(wei), format_usd(wei, eth_usd));
}
