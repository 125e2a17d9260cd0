use anyhow::Result;
use serde::Serialize;

use crate::access;
use crate::chain::TipJar;
use crate::format::{format_address, wei_to_eth};
use crate::reads::Reads;
use crate::session::Session;

use super::MemoView;

#[derive(Debug, Serialize)]
struct DashboardView {
    address: String,
    username: String,
    about: String,
    eth_usd: f64,
    total_received_eth: f64,
    total_received_usd: f64,
    withdrawable_eth: f64,
    withdrawable_usd: f64,
    supporters: u64,
    page: u64,
    has_previous: bool,
    has_next: bool,
    supports: Vec<MemoView>,
}

pub async fn run<J: TipJar + ?Sized>(
    jar: &J,
    session: &Session,
    page: u64,
    json: bool,
) -> Result<()> {
    let mut reads = Reads::new(jar);
    let creator = match access::for_creator(session, &mut reads).await? {
        Ok(creator) => creator,
        Err(gate) => {
            gate.print();
            return Ok(());
        }
    };

    let owner = creator.owner;
    let balance = reads.creator_balance(owner).await?;
    let supporters = reads.memo_count(owner).await?;
    let page = reads.memo_page(owner, page).await?;
    let eth_usd = reads.eth_usd_price().await;

    let total_eth = wei_to_eth(creator.total_received);
    let balance_eth = wei_to_eth(balance);

    if json {
        return super::emit_json(&DashboardView {
            address: owner.to_checksum(None),
            username: creator.name.clone(),
            about: creator.about.clone(),
            eth_usd,
            total_received_eth: total_eth,
            total_received_usd: total_eth * eth_usd,
            withdrawable_eth: balance_eth,
            withdrawable_usd: balance_eth * eth_usd,
            supporters,
            page: page.page,
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            supports: page.memos.iter().map(MemoView::from).collect(),
        });
    }

    println!("Dashboard: {} ({})", creator.name, format_address(Some(owner)));
    println!("{}", creator.about);
    println!();
    super::print_amount_line("Total received", creator.total_received, eth_usd);
    super::print_amount_line("Withdrawable", balance, eth_usd);
    println!("Total supporters: {supporters}");
    println!();

    println!("Supports (page {})", page.number());
    if page.memos.is_empty() {
        println!("No supports yet");
    } else {
        super::print_memos(&page.memos, super::now());
    }
    if page.has_previous() {
        println!("前: coffeechain dashboard --page {}", page.page - 1);
    }
    if page.has_next() {
        println!("次: coffeechain dashboard --page {}", page.page + 1);
    }
    if !balance.is_zero() {
        println!("次: coffeechain withdraw");
    }
    Ok(())
}
