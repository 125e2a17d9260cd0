use anyhow::{Result, anyhow};

use crate::access;
use crate::chain::TipJar;
use crate::db::Journal;
use crate::models::WriteAction;
use crate::reads::Reads;
use crate::session::Session;
use crate::validation;

use super::Refreshed;

/// Unset fields keep the current profile value.
pub async fn run<J: TipJar + ?Sized>(
    jar: &J,
    session: &Session,
    journal: &Journal,
    name: Option<&str>,
    about: Option<&str>,
    wait: bool,
) -> Result<Option<Refreshed>> {
    let mut reads = Reads::new(jar);
    let current = match access::for_creator(session, &mut reads).await? {
        Ok(creator) => creator,
        Err(gate) => {
            gate.print();
            return Ok(None);
        }
    };

    let name = name.unwrap_or(&current.name);
    let about = about.unwrap_or(&current.about);
    if name == current.name && about == current.about {
        println!("プロフィールに変更はありません");
        return Ok(None);
    }

    validation::profile_update(name, about)?;
    let sender = session.signer_ready(jar).await?;

    let action = WriteAction::UpdateCreator {
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
        .ok_or_else(|| anyhow!("更新後のプロフィールを取得できませんでした: owner={sender}"))?;
    let refreshed = Refreshed::Profile(creator);
    refreshed.print();
    println!("次: coffeechain profile {name}");
    Ok(Some(refreshed))
}
