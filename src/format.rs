use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};

/// `0x1234...abcd`, or "Unknown" when there is no address to show.
pub fn format_address(address: Option<Address>) -> String {
    let Some(address) = address else {
        return "Unknown".to_string();
    };
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

pub fn format_time_ago(timestamp: u64, now: u64) -> String {
    let seconds_ago = now.saturating_sub(timestamp);
    match seconds_ago {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        s => format!("{}w ago", s / 604_800),
    }
}

pub fn wei_to_eth(wei: U256) -> f64 {
    format_ether(wei).parse().unwrap_or(0.0)
}

pub fn format_eth(wei: U256) -> String {
    format!("{:.4} ETH", wei_to_eth(wei))
}

/// USD value at the quoted price; a zero price renders as `$0.00`.
pub fn format_usd(wei: U256, eth_usd: f64) -> String {
    format!("${:.2}", wei_to_eth(wei) * eth_usd)
}
