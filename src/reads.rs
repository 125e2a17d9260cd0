use std::collections::HashMap;
use std::str::FromStr;

use alloy::primitives::{Address, U256};
use anyhow::{Result, anyhow};
use tracing::{debug, warn};

use crate::chain::TipJar;
use crate::models::{Creator, Memo};

pub const PAGE_SIZE: u64 = 10;

/// How a creator is addressed on the command line: by owner address or by
/// registered username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatorRef {
    Address(Address),
    Name(String),
}

impl CreatorRef {
    /// Anything that is not a well-formed `0x` address is treated as a
    /// username, including `0x` strings with a bad checksum.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix("0x").and_then(|_| parse_address(raw)) {
            Some(address) => Self::Address(address),
            None => Self::Name(raw.to_string()),
        }
    }
}

fn parse_address(raw: &str) -> Option<Address> {
    let address = Address::from_str(raw).ok()?;
    let digits = &raw[2..];
    let mixed_case = digits.chars().any(|c| c.is_ascii_uppercase())
        && digits.chars().any(|c| c.is_ascii_lowercase());
    if mixed_case && address.to_checksum(None) != raw {
        return None;
    }
    Some(address)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCreator {
    pub address: Address,
    pub creator: Creator,
}

#[derive(Debug, Clone)]
pub struct MemoPage {
    pub page: u64,
    offset: u64,
    pub memos: Vec<Memo>,
}

impl MemoPage {
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 1-based page number for display.
    pub fn number(&self) -> u64 {
        self.page + 1
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// A short page means the end of the list was reached.
    pub fn has_next(&self) -> bool {
        self.memos.len() as u64 == PAGE_SIZE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ReadKey {
    Creator(Address),
    CreatorByName(String),
    Memos(Address),
    MemosPage {
        owner: Address,
        offset: u64,
        limit: u64,
    },
    CreatorBalance(Address),
    MemoCount(Address),
    WalletBalance(Address),
    EthUsd,
}

#[derive(Debug, Clone)]
enum ReadValue {
    Creator(Option<Creator>),
    Memos(Vec<Memo>),
    Amount(U256),
    Count(u64),
    Price(f64),
}

/// Read-only contract calls behind a cache keyed by function and arguments.
/// Entries live until [`Reads::invalidate`], which callers run after a
/// write settles.
pub struct Reads<'a, J: TipJar + ?Sized> {
    jar: &'a J,
    cache: HashMap<ReadKey, ReadValue>,
}

impl<'a, J: TipJar + ?Sized> Reads<'a, J> {
    pub fn new(jar: &'a J) -> Self {
        Self {
            jar,
            cache: HashMap::new(),
        }
    }

    pub fn jar(&self) -> &'a J {
        self.jar
    }

    pub fn invalidate(&mut self) {
        debug!(entries = self.cache.len(), "read cache invalidated");
        self.cache.clear();
    }

    fn hit(&self, key: &ReadKey) -> Option<ReadValue> {
        self.cache.get(key).cloned()
    }

    pub async fn creator(&mut self, owner: Address) -> Result<Option<Creator>> {
        let key = ReadKey::Creator(owner);
        if let Some(ReadValue::Creator(creator)) = self.hit(&key) {
            return Ok(creator);
        }
        let creator = self.jar.creator(owner).await?;
        self.cache.insert(key, ReadValue::Creator(creator.clone()));
        Ok(creator)
    }

    pub async fn creator_by_name(&mut self, name: &str) -> Result<Option<Creator>> {
        let key = ReadKey::CreatorByName(name.to_string());
        if let Some(ReadValue::Creator(creator)) = self.hit(&key) {
            return Ok(creator);
        }
        let creator = self.jar.creator_by_name(name).await?;
        self.cache.insert(key, ReadValue::Creator(creator.clone()));
        Ok(creator)
    }

    /// Address lookups never fall through to the name registry; a name
    /// lookup takes its address from the record's owner.
    pub async fn resolve(&mut self, target: &CreatorRef) -> Result<Option<ResolvedCreator>> {
        let resolved = match target {
            CreatorRef::Address(address) => {
                self.creator(*address)
                    .await?
                    .map(|creator| ResolvedCreator {
                        address: *address,
                        creator,
                    })
            }
            CreatorRef::Name(name) => {
                self.creator_by_name(name)
                    .await?
                    .map(|creator| ResolvedCreator {
                        address: creator.owner,
                        creator,
                    })
            }
        };
        Ok(resolved)
    }

    pub async fn memos(&mut self, owner: Address) -> Result<Vec<Memo>> {
        let key = ReadKey::Memos(owner);
        if let Some(ReadValue::Memos(memos)) = self.hit(&key) {
            return Ok(memos);
        }
        let memos = self.jar.memos(owner).await?;
        self.cache.insert(key, ReadValue::Memos(memos.clone()));
        Ok(memos)
    }

    /// `page` is 0-based. Pages whose offset does not fit in a `u64` are
    /// rejected before any call is made.
    pub async fn memo_page(&mut self, owner: Address, page: u64) -> Result<MemoPage> {
        let offset = page
            .checked_mul(PAGE_SIZE)
            .filter(|offset| offset.checked_add(PAGE_SIZE).is_some())
            .ok_or_else(|| anyhow!("ページ番号が大きすぎます: page={page}"))?;
        let key = ReadKey::MemosPage {
            owner,
            offset,
            limit: PAGE_SIZE,
        };
        if let Some(ReadValue::Memos(memos)) = self.hit(&key) {
            return Ok(MemoPage { page, offset, memos });
        }
        let memos = self.jar.memos_page(owner, offset, PAGE_SIZE).await?;
        self.cache.insert(key, ReadValue::Memos(memos.clone()));
        Ok(MemoPage { page, offset, memos })
    }

    pub async fn creator_balance(&mut self, owner: Address) -> Result<U256> {
        let key = ReadKey::CreatorBalance(owner);
        if let Some(ReadValue::Amount(balance)) = self.hit(&key) {
            return Ok(balance);
        }
        let balance = self.jar.creator_balance(owner).await?;
        self.cache.insert(key, ReadValue::Amount(balance));
        Ok(balance)
    }

    pub async fn memo_count(&mut self, owner: Address) -> Result<u64> {
        let key = ReadKey::MemoCount(owner);
        if let Some(ReadValue::Count(count)) = self.hit(&key) {
            return Ok(count);
        }
        let count = self.jar.memo_count(owner).await?;
        self.cache.insert(key, ReadValue::Count(count));
        Ok(count)
    }

    pub async fn wallet_balance(&mut self, account: Address) -> Result<U256> {
        let key = ReadKey::WalletBalance(account);
        if let Some(ReadValue::Amount(balance)) = self.hit(&key) {
            return Ok(balance);
        }
        let balance = self.jar.wallet_balance(account).await?;
        self.cache.insert(key, ReadValue::Amount(balance));
        Ok(balance)
    }

    /// Display-only quote. Oracle failures degrade to zero and are not cached.
    pub async fn eth_usd_price(&mut self) -> f64 {
        if let Some(ReadValue::Price(price)) = self.hit(&ReadKey::EthUsd) {
            return price;
        }
        match self.jar.eth_usd_price().await {
            Ok(price) => {
                self.cache.insert(ReadKey::EthUsd, ReadValue::Price(price));
                price
            }
            Err(err) => {
                warn!(error = %err, "price feed unavailable, showing zero");
                0.0
            }
        }
    }
}
