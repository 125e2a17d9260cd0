use anyhow::Result;
use serde::Serialize;

use crate::chain::TipJar;
use crate::format::{format_address, format_eth, wei_to_eth};
use crate::reads::{CreatorRef, Reads};

use super::MemoView;

#[derive(Debug, Serialize)]
struct ProfileView {
    address: String,
    username: String,
    about: String,
    total_received_wei: String,
    total_received_eth: f64,
    supports: Vec<MemoView>,
}

/// An unknown username and an address without a record read differently.
fn missing_notice(target: &CreatorRef) -> &'static str {
    match target {
        CreatorRef::Name(_) => "Creator not found",
        CreatorRef::Address(_) => "This creator hasn't set up their profile yet.",
    }
}

pub async fn run<J: TipJar + ?Sized>(jar: &J, creator: &str, json: bool) -> Result<()> {
    let mut reads = Reads::new(jar);
    let target = CreatorRef::parse(creator);
    let Some(resolved) = reads.resolve(&target).await? else {
        println!("{}", missing_notice(&target));
        return Ok(());
    };
    let memos = reads.memos(resolved.address).await?;

    if json {
        return super::emit_json(&ProfileView {
            address: resolved.address.to_checksum(None),
            username: resolved.creator.name.clone(),
            about: resolved.creator.about.clone(),
            total_received_wei: resolved.creator.total_received.to_string(),
            total_received_eth: wei_to_eth(resolved.creator.total_received),
            supports: memos.iter().map(MemoView::from).collect(),
        });
    }

    let creator = &resolved.creator;
    println!("{} ({})", creator.name, format_address(Some(resolved.address)));
    println!("{}", creator.about);
    println!(
        "received {} from {} supporter(s)",
        format_eth(creator.total_received),
        memos.len()
    );
    println!();
    println!("Recent supports");
    if memos.is_empty() {
        println!("No supports yet. Be the first to support this creator!");
    } else {
        super::print_memos(&memos, super::now());
    }

    if creator.total_received.is_zero() {
        println!("次: coffeechain tip {} --name <your name>", creator.name);
    }
    Ok(())
}
