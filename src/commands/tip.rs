use anyhow::{Result, anyhow};
use tracing::warn;

use crate::chain::TipJar;
use crate::db::Journal;
use crate::format::format_eth;
use crate::models::WriteAction;
use crate::reads::{CreatorRef, Reads};
use crate::session::Session;
use crate::validation;

use super::Refreshed;

pub struct TipRequest<'a> {
    pub creator: &'a str,
    pub supporter_name: &'a str,
    pub message: &'a str,
    pub custom_amount: Option<&'a str>,
    pub preset: &'a str,
}

pub async fn run<J: TipJar + ?Sized>(
    jar: &J,
    session: &Session,
    journal: &Journal,
    request: &TipRequest<'_>,
    wait: bool,
) -> Result<Option<Refreshed>> {
    let supporter = session.require_wallet()?;
    let mut reads = Reads::new(jar);

    let target = CreatorRef::parse(request.creator);
    let resolved = reads
        .resolve(&target)
        .await?
        .ok_or_else(|| anyhow!("クリエイターが見つかりません: {}", request.creator))?;

    let balance = match reads.wallet_balance(supporter).await {
        Ok(balance) => Some(balance),
        Err(err) => {
            warn!(error = %err, "wallet balance unavailable, skipping balance check");
            None
        }
    };
    let value = validation::tip(
        request.supporter_name,
        request.custom_amount,
        request.preset,
        balance,
    )?;
    let sender = session.signer_ready(jar).await?;

    println!(
        "supporting {} with {}",
        resolved.creator.name,
        format_eth(value)
    );
    let action = WriteAction::BuyCoffee {
        creator: resolved.address,
        name: request.supporter_name.to_string(),
        message: request.message.to_string(),
        value,
    };
    let stage = super::drive_write(&mut reads, journal, sender, action, wait).await?;
    if !stage.is_confirmed() {
        return Ok(None);
    }

    let creator = reads
        .creator(resolved.address)
        .await?
        .ok_or_else(|| anyhow!("クリエイターが見つかりません: {}", request.creator))?;
    let supporters = reads.memo_count(resolved.address).await?;
    println!("次: coffeechain profile {}", creator.name);
    let refreshed = Refreshed::Supports {
        creator,
        supporters,
    };
    refreshed.print();
    Ok(Some(refreshed))
}
