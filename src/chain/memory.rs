//! In-process stand-in for the deployed contract, enforcing the same rules so
//! the read and write paths can be exercised without a node.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash, U256, keccak256};
use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::chain::TipJar;
use crate::chain::contract::SEPOLIA_CHAIN_ID;
use crate::models::{Creator, Memo, Receipt, WriteAction};

#[derive(Default)]
struct Ledger {
    creators: HashMap<Address, Creator>,
    names: HashMap<String, Address>,
    memos: HashMap<Address, Vec<Memo>>,
    balances: HashMap<Address, U256>,
    wallets: HashMap<Address, U256>,
    receipts: HashMap<TxHash, Receipt>,
    nonce: u64,
    clock: u64,
}

#[derive(Clone)]
pub struct MemoryTipJar {
    ledger: Arc<Mutex<Ledger>>,
    sender: Option<Address>,
    reads: Arc<AtomicUsize>,
    submits: Arc<AtomicUsize>,
    price: Option<f64>,
}

impl MemoryTipJar {
    pub fn new() -> Self {
        let ledger = Ledger {
            clock: 1_700_000_000,
            ..Ledger::default()
        };
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            sender: None,
            reads: Arc::new(AtomicUsize::new(0)),
            submits: Arc::new(AtomicUsize::new(0)),
            price: Some(2_500.0),
        }
    }

    /// Handle on the same ledger that signs as `sender`.
    pub fn as_sender(&self, sender: Address) -> Self {
        Self {
            sender: Some(sender),
            ..self.clone()
        }
    }

    pub fn without_price_feed(mut self) -> Self {
        self.price = None;
        self
    }

    pub fn fund(&self, account: Address, amount: U256) {
        let mut ledger = self.ledger.lock().unwrap();
        *ledger.wallets.entry(account).or_default() += amount;
    }

    pub fn read_calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    fn count_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

impl Ledger {
    fn apply(&mut self, sender: Address, action: &WriteAction) -> Result<()> {
        match action {
            WriteAction::RegisterCreator { name, about } => {
                if self.creators.contains_key(&sender) {
                    return Err(anyhow!("execution reverted: AlreadyRegistered"));
                }
                if name.is_empty() {
                    return Err(anyhow!("execution reverted: EmptyName"));
                }
                self.names.insert(name.clone(), sender);
                self.creators.insert(
                    sender,
                    Creator {
                        name: name.clone(),
                        about: about.clone(),
                        owner: sender,
                        total_received: U256::ZERO,
                    },
                );
            }
            WriteAction::UpdateCreator { name, about } => {
                let creator = self
                    .creators
                    .get_mut(&sender)
                    .ok_or_else(|| anyhow!("execution reverted: NotACreator"))?;
                if name.is_empty() {
                    return Err(anyhow!("execution reverted: EmptyName"));
                }
                self.names.remove(&creator.name);
                self.names.insert(name.clone(), sender);
                creator.name = name.clone();
                creator.about = about.clone();
            }
            WriteAction::BuyCoffee {
                creator,
                name,
                message,
                value,
            } => {
                if value.is_zero() {
                    return Err(anyhow!("execution reverted: NoFundsSent"));
                }
                if !self.creators.contains_key(creator) {
                    return Err(anyhow!("execution reverted: CreatorNotRegistered"));
                }
                let wallet = self.wallets.entry(sender).or_default();
                if *wallet < *value {
                    return Err(anyhow!("insufficient funds for transfer"));
                }
                *wallet -= *value;

                if let Some(record) = self.creators.get_mut(creator) {
                    record.total_received += *value;
                }
                *self.balances.entry(*creator).or_default() += *value;

                self.clock += 60;
                self.memos.entry(*creator).or_default().push(Memo {
                    from: sender,
                    timestamp: self.clock,
                    name: name.clone(),
                    message: message.clone(),
                });
            }
            WriteAction::Withdraw => {
                if !self.creators.contains_key(&sender) {
                    return Err(anyhow!("execution reverted: NotACreator"));
                }
                let balance = self.balances.insert(sender, U256::ZERO).unwrap_or_default();
                if balance.is_zero() {
                    return Err(anyhow!("execution reverted: NoFundsToWithdraw"));
                }
                *self.wallets.entry(sender).or_default() += balance;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TipJar for MemoryTipJar {
    async fn chain_id(&self) -> Result<u64> {
        Ok(SEPOLIA_CHAIN_ID)
    }

    async fn wallet_balance(&self, account: Address) -> Result<U256> {
        self.count_read();
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.wallets.get(&account).copied().unwrap_or_default())
    }

    async fn creator(&self, owner: Address) -> Result<Option<Creator>> {
        self.count_read();
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.creators.get(&owner).cloned())
    }

    async fn creator_by_name(&self, name: &str) -> Result<Option<Creator>> {
        self.count_read();
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger
            .names
            .get(name)
            .and_then(|owner| ledger.creators.get(owner))
            .cloned())
    }

    async fn memos(&self, owner: Address) -> Result<Vec<Memo>> {
        self.count_read();
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.memos.get(&owner).cloned().unwrap_or_default())
    }

    async fn memos_page(&self, owner: Address, offset: u64, limit: u64) -> Result<Vec<Memo>> {
        self.count_read();
        let ledger = self.ledger.lock().unwrap();
        let all = ledger.memos.get(&owner).map(Vec::as_slice).unwrap_or_default();
        Ok(all
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn creator_balance(&self, owner: Address) -> Result<U256> {
        self.count_read();
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.balances.get(&owner).copied().unwrap_or_default())
    }

    async fn memo_count(&self, owner: Address) -> Result<u64> {
        self.count_read();
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.memos.get(&owner).map_or(0, |m| m.len() as u64))
    }

    async fn eth_usd_price(&self) -> Result<f64> {
        self.count_read();
        self.price.ok_or_else(|| anyhow!("price feed unreachable"))
    }

    async fn submit(&self, action: &WriteAction) -> Result<TxHash> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        let sender = self
            .sender
            .ok_or_else(|| anyhow!("no signer configured"))?;

        let mut ledger = self.ledger.lock().unwrap();
        ledger.apply(sender, action)?;

        ledger.nonce += 1;
        let tx_hash = keccak256(ledger.nonce.to_be_bytes());
        let block_number = Some(ledger.nonce);
        ledger.receipts.insert(
            tx_hash,
            Receipt {
                tx_hash,
                success: true,
                block_number,
            },
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt> {
        self.receipt(tx_hash)
            .await?
            .ok_or_else(|| anyhow!("unknown transaction: {tx_hash}"))
    }

    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>> {
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger.receipts.get(&tx_hash).cloned())
    }
}
