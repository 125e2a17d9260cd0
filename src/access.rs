//! Page gating. These checks only decide what to show; the contract's own
//! sender checks are what actually protect creator state.

use anyhow::Result;

use crate::chain::TipJar;
use crate::models::Creator;
use crate::reads::Reads;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    NoWallet,
    AlreadyCreator,
    NotCreator,
}

impl Gate {
    pub fn title(self) -> &'static str {
        match self {
            Self::NoWallet => "Wallet Connection Required",
            Self::AlreadyCreator => "Already a Creator",
            Self::NotCreator => "Creator Profile Required",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::NoWallet => "You need to connect your Ethereum wallet to access this page.",
            Self::AlreadyCreator => {
                "You have already set up your creator profile. You can manage your page from the dashboard."
            }
            Self::NotCreator => {
                "You haven't created a creator profile yet. Create one to start receiving support!"
            }
        }
    }

    pub fn next_step(self) -> &'static str {
        match self {
            Self::NoWallet => "COFFEECHAIN_PRIVATE_KEY を設定する (または --private-key を渡す)",
            Self::AlreadyCreator => "coffeechain dashboard",
            Self::NotCreator => "coffeechain register --name <username> --about <bio>",
        }
    }

    pub fn print(self) {
        println!("{}", self.title());
        println!("{}", self.description());
        println!("次: {}", self.next_step());
    }
}

/// Registration is for connected wallets that are not creators yet.
pub async fn for_registration<J: TipJar + ?Sized>(
    session: &Session,
    reads: &mut Reads<'_, J>,
) -> Result<Option<Gate>> {
    let Some(wallet) = session.wallet() else {
        return Ok(Some(Gate::NoWallet));
    };
    if reads.creator(wallet).await?.is_some() {
        return Ok(Some(Gate::AlreadyCreator));
    }
    Ok(None)
}

/// Creator-only pages: the dashboard and profile editing.
pub async fn for_creator<J: TipJar + ?Sized>(
    session: &Session,
    reads: &mut Reads<'_, J>,
) -> Result<Result<Creator, Gate>> {
    let Some(wallet) = session.wallet() else {
        return Ok(Err(Gate::NoWallet));
    };
    Ok(reads.creator(wallet).await?.ok_or(Gate::NotCreator))
}
