use alloy::primitives::Address;
use anyhow::Result;
use tracing::debug;

use crate::chain::TipJar;
use crate::validation::ValidationError;

/// The wallet connection the commands run under. Built once per invocation
/// and passed to every command explicitly.
#[derive(Debug, Clone)]
pub struct Session {
    wallet: Option<Address>,
    expected_chain: u64,
    project_id: String,
}

impl Session {
    pub fn new(wallet: Option<Address>, expected_chain: u64, project_id: String) -> Self {
        debug!(connected = wallet.is_some(), expected_chain, "session initialised");
        Self {
            wallet,
            expected_chain,
            project_id,
        }
    }

    pub fn wallet(&self) -> Option<Address> {
        self.wallet
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn expected_chain(&self) -> u64 {
        self.expected_chain
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn require_wallet(&self) -> Result<Address, ValidationError> {
        self.wallet.ok_or(ValidationError::WalletNotConnected)
    }

    /// Address to sign with, once the wallet is connected and on the
    /// deployment chain.
    pub async fn signer_ready<J: TipJar + ?Sized>(&self, jar: &J) -> Result<Address> {
        let wallet = self.require_wallet()?;
        let actual = jar.chain_id().await?;
        if actual != self.expected_chain {
            return Err(ValidationError::WrongChain {
                expected: self.expected_chain,
                actual,
            }
            .into());
        }
        Ok(wallet)
    }
}
