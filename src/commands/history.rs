use anyhow::Result;
use serde::Serialize;

use crate::chain::TipJar;
use crate::reads::{CreatorRef, PAGE_SIZE, Reads};

use super::MemoView;

#[derive(Debug, Serialize)]
struct HistoryView {
    creator: String,
    page: u64,
    page_size: u64,
    has_previous: bool,
    has_next: bool,
    supports: Vec<MemoView>,
}

pub async fn run<J: TipJar + ?Sized>(jar: &J, creator: &str, page: u64, json: bool) -> Result<()> {
    let mut reads = Reads::new(jar);
    let Some(resolved) = reads.resolve(&CreatorRef::parse(creator)).await? else {
        println!("Creator not found");
        return Ok(());
    };
    let page = reads.memo_page(resolved.address, page).await?;

    if json {
        return super::emit_json(&HistoryView {
            creator: resolved.creator.name.clone(),
            page: page.page,
            page_size: PAGE_SIZE,
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            supports: page.memos.iter().map(MemoView::from).collect(),
        });
    }

    if page.memos.is_empty() {
        println!(
            "No supports on page {} for creator={}",
            page.number(),
            resolved.creator.name
        );
        return Ok(());
    }

    println!(
        "supports {}-{} for creator={}",
        page.offset() + 1,
        page.offset() + page.memos.len() as u64,
        resolved.creator.name
    );
    super::print_memos(&page.memos, super::now());

    if page.has_previous() {
        println!("前: coffeechain history {creator} --page {}", page.page - 1);
    }
    if page.has_next() {
        println!("次: coffeechain history {creator} --page {}", page.page + 1);
    }
    Ok(())
}
