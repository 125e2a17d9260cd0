use anyhow::Result;
use serde::Serialize;

use crate::chain::TipJar;
use crate::format::{format_address, format_eth, wei_to_eth};
use crate::reads::Reads;
use crate::session::Session;

#[derive(Debug, Serialize)]
struct WalletView {
    connected: bool,
    address: Option<String>,
    chain_id: u64,
    expected_chain_id: u64,
    balance_eth: Option<f64>,
    is_creator: bool,
    project_id: String,
}

pub async fn run<J: TipJar + ?Sized>(jar: &J, session: &Session, json: bool) -> Result<()> {
    let chain_id = jar.chain_id().await?;
    let mut reads = Reads::new(jar);

    let (balance, is_creator) = match session.wallet() {
        Some(wallet) => (
            Some(reads.wallet_balance(wallet).await?),
            reads.creator(wallet).await?.is_some(),
        ),
        None => (None, false),
    };

    if json {
        return super::emit_json(&WalletView {
            connected: session.is_connected(),
            address: session.wallet().map(|w| w.to_checksum(None)),
            chain_id,
            expected_chain_id: session.expected_chain(),
            balance_eth: balance.map(wei_to_eth),
            is_creator,
            project_id: session.project_id().to_string(),
        });
    }

    let Some(wallet) = session.wallet() else {
        println!("ウォレット未接続 (chain {chain_id})");
        println!("次: COFFEECHAIN_PRIVATE_KEY を設定してください");
        return Ok(());
    };

    println!("wallet: {} ({wallet})", format_address(Some(wallet)));
    println!("chain: {chain_id}");
    if chain_id != session.expected_chain() {
        println!(
            "warning: the contract lives on chain {}; writes will be refused",
            session.expected_chain()
        );
    }
    if let Some(balance) = balance {
        println!("balance: {}", format_eth(balance));
    }
    if is_creator {
        println!("次: coffeechain dashboard");
    } else {
        println!("次: coffeechain register --name <username> --about <bio>");
    }
    Ok(())
}
