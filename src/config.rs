use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use clap::Args;

use crate::chain::contract::{CONTRACT_ADDRESS, ETH_USD_FEED_ADDRESS, SEPOLIA_CHAIN_ID};

pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";

/// Public wallet-connect project id, only good for local use.
pub const DEFAULT_PROJECT_ID: &str = "e5e516dabbfc3c7cc81cb51ea65578fe";

#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Network")]
pub struct NetworkArgs {
    #[arg(long, env = "COFFEECHAIN_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Tipping contract address
    #[arg(long, env = "COFFEECHAIN_CONTRACT", default_value_t = CONTRACT_ADDRESS)]
    pub contract: Address,

    /// ETH/USD price feed address
    #[arg(long, env = "COFFEECHAIN_PRICE_FEED", default_value_t = ETH_USD_FEED_ADDRESS)]
    pub price_feed: Address,

    /// Chain the contract is deployed on; writes are refused elsewhere
    #[arg(long, env = "COFFEECHAIN_CHAIN_ID", default_value_t = SEPOLIA_CHAIN_ID)]
    pub chain_id: u64,

    /// Confirmations to wait for before a write counts as settled
    #[arg(long, default_value_t = 1)]
    pub confirmations: u64,
}

#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Wallet")]
pub struct WalletArgs {
    /// Hex private key used to sign transactions
    #[arg(long, env = "COFFEECHAIN_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Run without a connected wallet, even if a key is configured
    #[arg(long)]
    pub no_wallet: bool,

    #[arg(long, env = "NEXT_PUBLIC_PROJECT_ID", default_value = DEFAULT_PROJECT_ID)]
    pub project_id: String,
}

impl WalletArgs {
    pub fn signer(&self) -> Result<Option<PrivateKeySigner>> {
        if self.no_wallet {
            return Ok(None);
        }
        self.private_key
            .as_deref()
            .map(|key| {
                key.trim()
                    .parse::<PrivateKeySigner>()
                    .context("COFFEECHAIN_PRIVATE_KEY の形式が不正です")
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        network: NetworkArgs,
        #[command(flatten)]
        wallet: WalletArgs,
    }

    // Hardhat's first dev account.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn defaults_target_sepolia_deployment() {
        let args = Harness::try_parse_from(["coffeechain"]).expect("parse");
        assert_eq!(args.network.contract, CONTRACT_ADDRESS);
        assert_eq!(args.network.price_feed, ETH_USD_FEED_ADDRESS);
        assert_eq!(args.network.chain_id, SEPOLIA_CHAIN_ID);
    }

    #[test]
    fn no_wallet_wins_over_key() {
        let args = Harness::try_parse_from(["coffeechain", "--private-key", DEV_KEY, "--no-wallet"])
            .expect("parse");
        assert!(args.wallet.signer().expect("signer").is_none());

        let args =
            Harness::try_parse_from(["coffeechain", "--private-key", DEV_KEY]).expect("parse");
        let signer = args.wallet.signer().expect("signer").expect("some signer");
        assert_eq!(
            signer.address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn malformed_key_is_rejected() {
        let args =
            Harness::try_parse_from(["coffeechain", "--private-key", "not-a-key"]).expect("parse");
        assert!(args.wallet.signer().is_err());
    }
}
