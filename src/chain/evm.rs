use alloy::contract::Error as ContractError;
use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::debug;

use crate::chain::TipJar;
use crate::chain::contract::{
    AggregatorV3Interface::{self, AggregatorV3InterfaceInstance},
    BuyMeACoffee::{self, BuyMeACoffeeErrors, BuyMeACoffeeInstance},
    PRICE_FEED_DECIMALS, revert_name,
};
use crate::models::{Creator, Memo, Receipt, WriteAction};

pub struct EvmTipJar {
    provider: DynProvider,
    contract: BuyMeACoffeeInstance<DynProvider>,
    price_feed: AggregatorV3InterfaceInstance<DynProvider>,
    confirmations: u64,
}

impl EvmTipJar {
    pub fn connect(
        rpc_url: &str,
        contract: Address,
        price_feed: Address,
        signer: Option<PrivateKeySigner>,
        confirmations: u64,
    ) -> Result<Self> {
        let url: Url = rpc_url
            .parse()
            .with_context(|| format!("RPC URLの形式が不正です: {rpc_url}"))?;

        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(url)
                .erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        Ok(Self {
            contract: BuyMeACoffee::new(contract, provider.clone()),
            price_feed: AggregatorV3Interface::new(price_feed, provider.clone()),
            provider,
            confirmations,
        })
    }
}

#[async_trait]
impl TipJar for EvmTipJar {
    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("RPCからchain idを取得できませんでした")
    }

    async fn wallet_balance(&self, account: Address) -> Result<U256> {
        self.provider
            .get_balance(account)
            .await
            .with_context(|| format!("残高を取得できませんでした: account={account}"))
    }

    async fn creator(&self, owner: Address) -> Result<Option<Creator>> {
        let raw = self.contract.getCreator(owner).call().await;
        registered_or_none(raw).with_context(|| format!("getCreatorに失敗しました: owner={owner}"))
    }

    async fn creator_by_name(&self, name: &str) -> Result<Option<Creator>> {
        let raw = self.contract.getCreatorByName(name.to_string()).call().await;
        registered_or_none(raw).with_context(|| format!("getCreatorByNameに失敗しました: name={name}"))
    }

    async fn memos(&self, owner: Address) -> Result<Vec<Memo>> {
        let memos = self
            .contract
            .getMemos(owner)
            .call()
            .await
            .with_context(|| format!("getMemosに失敗しました: owner={owner}"))?;
        Ok(memos.into_iter().map(Memo::from).collect())
    }

    async fn memos_page(&self, owner: Address, offset: u64, limit: u64) -> Result<Vec<Memo>> {
        let memos = self
            .contract
            .getMemosPaginated(owner, U256::from(offset), U256::from(limit))
            .call()
            .await
            .with_context(|| {
                format!("getMemosPaginatedに失敗しました: owner={owner} offset={offset} limit={limit}")
            })?;
        Ok(memos.into_iter().map(Memo::from).collect())
    }

    async fn creator_balance(&self, owner: Address) -> Result<U256> {
        self.contract
            .getCreatorBalance(owner)
            .call()
            .await
            .with_context(|| format!("getCreatorBalanceに失敗しました: owner={owner}"))
    }

    async fn memo_count(&self, owner: Address) -> Result<u64> {
        let count = self
            .contract
            .getMemoCount(owner)
            .call()
            .await
            .with_context(|| format!("getMemoCountに失敗しました: owner={owner}"))?;
        Ok(count.saturating_to())
    }

    async fn eth_usd_price(&self) -> Result<f64> {
        let round = self
            .price_feed
            .latestRoundData()
            .call()
            .await
            .context("latestRoundDataに失敗しました")?;
        let answer: f64 = round
            .answer
            .to_string()
            .parse()
            .context("価格フィードの値が数値ではありません")?;
        Ok(answer / 10f64.powi(PRICE_FEED_DECIMALS))
    }

    async fn submit(&self, action: &WriteAction) -> Result<TxHash> {
        let sent = match action {
            WriteAction::RegisterCreator { name, about } => {
                self.contract
                    .registerCreator(name.clone(), about.clone())
                    .send()
                    .await
            }
            WriteAction::UpdateCreator { name, about } => {
                self.contract
                    .updateCreator(name.clone(), about.clone())
                    .send()
                    .await
            }
            WriteAction::BuyCoffee {
                creator,
                name,
                message,
                value,
            } => {
                self.contract
                    .buyCoffee(*creator, name.clone(), message.clone())
                    .value(*value)
                    .send()
                    .await
            }
            WriteAction::Withdraw => self.contract.withdraw().send().await,
        };

        let pending = sent.map_err(describe_rejection)?;
        let tx_hash = *pending.tx_hash();
        debug!(action = action.label(), %tx_hash, "node accepted transaction");
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .with_context(|| format!("レシートの待機に失敗しました: tx={tx_hash}"))?;

        Ok(Receipt {
            tx_hash,
            success: receipt.status(),
            block_number: receipt.block_number(),
        })
    }

    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .with_context(|| format!("レシートを取得できませんでした: tx={tx_hash}"))?;

        Ok(receipt.map(|receipt| Receipt {
            tx_hash,
            success: receipt.status(),
            block_number: receipt.block_number(),
        }))
    }
}

fn registered_or_none(
    raw: std::result::Result<BuyMeACoffee::Creator, ContractError>,
) -> Result<Option<Creator>> {
    match raw {
        Ok(raw) => Ok(Some(Creator::from(raw)).filter(Creator::is_registered)),
        Err(err)
            if matches!(
                err.as_decoded_interface_error::<BuyMeACoffeeErrors>(),
                Some(BuyMeACoffeeErrors::CreatorNotRegistered(_))
            ) =>
        {
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn describe_rejection(err: ContractError) -> anyhow::Error {
    match err.as_decoded_interface_error::<BuyMeACoffeeErrors>() {
        Some(decoded) => anyhow!("コントラクトが呼び出しを拒否しました: {}", revert_name(&decoded)),
        None => anyhow!(err),
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, hex};
    use alloy::rpc::json_rpc::{ErrorPayload, RpcError};
    use alloy::sol_types::SolError;
    use serde_json::value::RawValue;

    use super::*;

    const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");

    fn record(name: &str) -> BuyMeACoffee::Creator {
        BuyMeACoffee::Creator {
            name: name.to_string(),
            about: "bio".to_string(),
            owner: ALICE,
            totalReceived: U256::from(7u64),
        }
    }

    fn reverted_with(revert: impl SolError) -> ContractError {
        let data = format!("\"{}\"", hex::encode_prefixed(revert.abi_encode()));
        ContractError::TransportError(RpcError::ErrorResp(ErrorPayload {
            code: 3,
            message: "execution reverted".into(),
            data: Some(RawValue::from_string(data).expect("raw json")),
        }))
    }

    #[test]
    fn empty_record_reads_as_unregistered() {
        assert_eq!(registered_or_none(Ok(record(""))).expect("read"), None);
    }

    #[test]
    fn named_record_is_returned() {
        let creator = registered_or_none(Ok(record("alice")))
            .expect("read")
            .expect("registered");
        assert_eq!(creator.name, "alice");
        assert_eq!(creator.owner, ALICE);
        assert_eq!(creator.total_received, U256::from(7u64));
    }

    #[test]
    fn not_registered_revert_reads_as_unregistered() {
        let err = reverted_with(BuyMeACoffee::CreatorNotRegistered {});
        assert_eq!(registered_or_none(Err(err)).expect("read"), None);
    }

    #[test]
    fn other_reverts_stay_errors() {
        let err = reverted_with(BuyMeACoffee::NotACreator {});
        assert!(registered_or_none(Err(err)).is_err());
    }
}
