use anyhow::Result;

use crate::access;
use crate::chain::TipJar;
use crate::db::Journal;
use crate::format::format_eth;
use crate::models::WriteAction;
use crate::reads::Reads;
use crate::session::Session;
use crate::validation;

use super::Refreshed;

pub async fn run<J: TipJar + ?Sized>(
    jar: &J,
    session: &Session,
    journal: &Journal,
    wait: bool,
) -> Result<Option<Refreshed>> {
    let mut reads = Reads::new(jar);
    let creator = match access::for_creator(session, &mut reads).await? {
        Ok(creator) => creator,
        Err(gate) => {
            gate.print();
            return Ok(None);
        }
    };

    let balance = reads.creator_balance(creator.owner).await?;
    validation::withdrawal(balance)?;
    let sender = session.signer_ready(jar).await?;

    println!("引き出し額: {}", format_eth(balance));
    let stage = super::drive_write(&mut reads, journal, sender, WriteAction::Withdraw, wait).await?;
    if !stage.is_confirmed() {
        return Ok(None);
    }

    let refreshed = Refreshed::Withdrawable(reads.creator_balance(creator.owner).await?);
    refreshed.print();
    Ok(Some(refreshed))
}
