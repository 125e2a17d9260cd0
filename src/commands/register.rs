use anyhow::{Result, anyhow};

use crate::access;
use crate::chain::TipJar;
use crate::db::Journal;
use crate::models::WriteAction;
use crate::reads::Reads;
use crate::session::Session;
use crate::validation;

use super::Refreshed;

pub async fn run<J: TipJar + ?Sized>(
    jar: &J,
    session: &Session,
    journal: &Journal,
    name: &str,
    about: &str,
    wait: bool,
) -> Result<Option<Refreshed>> {
    let mut reads = Reads::new(jar);
    if let Some(gate) = access::for_registration(session, &mut reads).await? {
        gate.print();
        return Ok(None);
    }

    validation::registration(name, about)?;
    let sender = session.signer_ready(jar).await?;

    let action = WriteAction::RegisterCreator {
        name: name.to_string(),
        about: about.to_string(),
    };
    let stage = super::drive_write(&mut reads, journal, sender, action, wait).await?;
    if !stage.is_confirmed() {
        return Ok(None);
    }

    let creator = reads
        .creator(sender)
        .await?
        .ok_or_else(|| anyhow!("登録後のプロフィールを取得できませんでした: owner={sender}"))?;
    let refreshed = Refreshed::Profile(creator);
    refreshed.print();
    println!("次: coffeechain profile {name}");
    Ok(Some(refreshed))
}
