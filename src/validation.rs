use alloy::primitives::U256;
use alloy::primitives::utils::parse_ether;

pub const NAME_MAX_CHARS: usize = 50;
pub const ABOUT_MAX_CHARS: usize = 200;

pub const PRESET_AMOUNTS: [&str; 3] = ["0.001", "0.005", "0.01"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please connect your wallet")]
    WalletNotConnected,
    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongChain { expected: u64, actual: u64 },
    #[error("Please enter your display name")]
    DisplayNameRequired,
    #[error("Please enter a short bio")]
    BioRequired,
    #[error("Please enter a username")]
    UsernameRequired,
    #[error("Username must be lowercase, no spaces or special characters")]
    UsernameCharset,
    #[error("Display name must be at most 50 characters")]
    NameTooLong,
    #[error("Bio must be at most 200 characters")]
    BioTooLong,
    #[error("Please enter your name")]
    SupporterNameRequired,
    #[error("Please select or enter an amount")]
    AmountRequired,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("No funds available to withdraw")]
    NothingToWithdraw,
}

pub fn is_valid_username(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Checks for the create page. The name becomes the public handle, so it
/// follows the username charset.
pub fn registration(name: &str, about: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::DisplayNameRequired);
    }
    if about.trim().is_empty() {
        return Err(ValidationError::BioRequired);
    }
    check_profile(name, about)
}

pub fn profile_update(name: &str, about: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    check_profile(name, about)
}

fn check_profile(name: &str, about: &str) -> Result<(), ValidationError> {
    if !is_valid_username(name) {
        return Err(ValidationError::UsernameCharset);
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    if about.chars().count() > ABOUT_MAX_CHARS {
        return Err(ValidationError::BioTooLong);
    }
    Ok(())
}

/// Resolves the tip value in wei. A custom amount wins over the preset; the
/// balance check only runs when the wallet balance could be read.
pub fn tip(
    supporter_name: &str,
    custom_amount: Option<&str>,
    preset: &str,
    wallet_balance: Option<U256>,
) -> Result<U256, ValidationError> {
    if supporter_name.trim().is_empty() {
        return Err(ValidationError::SupporterNameRequired);
    }

    let amount = custom_amount
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(preset);
    let value = parse_amount(amount).ok_or(ValidationError::AmountRequired)?;

    if let Some(balance) = wallet_balance
        && value > balance
    {
        return Err(ValidationError::InsufficientBalance);
    }
    Ok(value)
}

fn parse_amount(amount: &str) -> Option<U256> {
    let as_float: f64 = amount.parse().ok()?;
    if !as_float.is_finite() || as_float <= 0.0 || amount.starts_with('-') {
        return None;
    }
    parse_ether(amount).ok().filter(|wei| !wei.is_zero())
}

pub fn withdrawal(balance: U256) -> Result<(), ValidationError> {
    if balance.is_zero() {
        return Err(ValidationError::NothingToWithdraw);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(amount: &str) -> U256 {
        parse_ether(amount).expect("valid ether amount")
    }

    #[test]
    fn registration_accepts_lowercase_alphanumerics() {
        assert_eq!(registration("alice", "I build things"), Ok(()));
        assert_eq!(registration("bob42", "b"), Ok(()));
    }

    #[test]
    fn registration_rejects_bad_usernames() {
        for name in ["Alice", "al ice", "alice!", "alice_b", "ålice"] {
            assert_eq!(
                registration(name, "bio"),
                Err(ValidationError::UsernameCharset),
                "{name}"
            );
        }
    }

    #[test]
    fn registration_requires_name_and_bio() {
        assert_eq!(
            registration("  ", "bio"),
            Err(ValidationError::DisplayNameRequired)
        );
        assert_eq!(registration("alice", " "), Err(ValidationError::BioRequired));
    }

    #[test]
    fn length_caps_apply() {
        let long_name = "a".repeat(NAME_MAX_CHARS + 1);
        let long_bio = "b".repeat(ABOUT_MAX_CHARS + 1);
        assert_eq!(
            registration(&long_name, "bio"),
            Err(ValidationError::NameTooLong)
        );
        assert_eq!(
            profile_update("alice", &long_bio),
            Err(ValidationError::BioTooLong)
        );
        assert_eq!(
            profile_update(&"a".repeat(NAME_MAX_CHARS), &"b".repeat(ABOUT_MAX_CHARS)),
            Ok(())
        );
    }

    #[test]
    fn update_requires_username() {
        assert_eq!(
            profile_update("", "bio"),
            Err(ValidationError::UsernameRequired)
        );
    }

    #[test]
    fn tip_prefers_custom_amount() {
        let value = tip("bob", Some("0.005"), PRESET_AMOUNTS[0], None).expect("valid tip");
        assert_eq!(value, eth("0.005"));

        let value = tip("bob", Some("  "), PRESET_AMOUNTS[2], None).expect("valid tip");
        assert_eq!(value, eth("0.01"));
    }

    #[test]
    fn tip_rejects_non_positive_amounts() {
        for amount in ["0", "-1", "abc", "0.0", "NaN"] {
            assert_eq!(
                tip("bob", Some(amount), PRESET_AMOUNTS[0], None),
                Err(ValidationError::AmountRequired),
                "{amount}"
            );
        }
    }

    #[test]
    fn tip_checks_balance_when_known() {
        assert_eq!(
            tip("bob", Some("0.02"), PRESET_AMOUNTS[0], Some(eth("0.01"))),
            Err(ValidationError::InsufficientBalance)
        );
        assert_eq!(
            tip("bob", Some("0.01"), PRESET_AMOUNTS[0], Some(eth("0.01"))),
            Ok(eth("0.01"))
        );
    }

    #[test]
    fn tip_requires_supporter_name() {
        assert_eq!(
            tip(" ", None, PRESET_AMOUNTS[0], None),
            Err(ValidationError::SupporterNameRequired)
        );
    }

    #[test]
    fn withdrawal_needs_funds() {
        assert_eq!(
            withdrawal(U256::ZERO),
            Err(ValidationError::NothingToWithdraw)
        );
        assert_eq!(withdrawal(U256::from(1)), Ok(()));
    }

    #[test]
    fn messages_match_user_facing_copy() {
        assert_eq!(
            ValidationError::AmountRequired.to_string(),
            "Please select or enter an amount"
        );
        assert_eq!(
            ValidationError::NothingToWithdraw.to_string(),
            "No funds available to withdraw"
        );
    }
}
