use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, TxHash, U256};
use anyhow::{Result, anyhow};

use crate::chain::contract::BuyMeACoffee;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub name: String,
    pub about: String,
    pub owner: Address,
    pub total_received: U256,
}

impl Creator {
    /// The contract answers unknown owners with a zeroed record; an empty
    /// name is how an unregistered address shows up.
    pub fn is_registered(&self) -> bool {
        !self.name.is_empty()
    }
}

impl From<BuyMeACoffee::Creator> for Creator {
    fn from(raw: BuyMeACoffee::Creator) -> Self {
        Self {
            name: raw.name,
            about: raw.about,
            owner: raw.owner,
            total_received: raw.totalReceived,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo {
    pub from: Address,
    pub timestamp: u64,
    pub name: String,
    pub message: String,
}

impl From<BuyMeACoffee::Memo> for Memo {
    fn from(raw: BuyMeACoffee::Memo) -> Self {
        Self {
            from: raw.from,
            timestamp: raw.timestamp.saturating_to(),
            name: raw.name,
            message: raw.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteAction {
    RegisterCreator {
        name: String,
        about: String,
    },
    UpdateCreator {
        name: String,
        about: String,
    },
    BuyCoffee {
        creator: Address,
        name: String,
        message: String,
        value: U256,
    },
    Withdraw,
}

impl WriteAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RegisterCreator { .. } => "register-creator",
            Self::UpdateCreator { .. } => "update-creator",
            Self::BuyCoffee { .. } => "buy-coffee",
            Self::Withdraw => "withdraw",
        }
    }

    pub fn value(&self) -> U256 {
        match self {
            Self::BuyCoffee { value, .. } => *value,
            _ => U256::ZERO,
        }
    }

    pub fn success_notice(&self) -> &'static str {
        match self {
            Self::RegisterCreator { .. } => "Creator page created!",
            Self::UpdateCreator { .. } => "Profile updated!",
            Self::BuyCoffee { .. } => "Support sent successfully!",
            Self::Withdraw => "Withdrawal initiated!",
        }
    }

    pub fn failure_notice(&self) -> &'static str {
        match self {
            Self::RegisterCreator { .. } => "Failed to create creator page",
            Self::UpdateCreator { .. } => "Failed to update profile",
            Self::BuyCoffee { .. } => "Failed to send support",
            Self::Withdraw => "Failed to withdraw funds",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub success: bool,
    pub block_number: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Waiting,
    Confirmed,
    Reverted,
}

impl TxStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Confirmed => "confirmed",
            Self::Reverted => "reverted",
        }
    }
}

impl From<&Receipt> for TxStatus {
    fn from(receipt: &Receipt) -> Self {
        if receipt.success {
            Self::Confirmed
        } else {
            Self::Reverted
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "confirmed" => Ok(Self::Confirmed),
            "reverted" => Ok(Self::Reverted),
            other => Err(anyhow!("不明なTxステータスです: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewWrite {
    pub action: String,
    pub tx_hash: TxHash,
    pub sender: Option<Address>,
    pub value: U256,
}

#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub id: i64,
    pub action: String,
    pub tx_hash: String,
    pub sender: Option<String>,
    pub value_wei: String,
    pub status: TxStatus,
    pub block_number: Option<i64>,
    pub created_at: String,
}
