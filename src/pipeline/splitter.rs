//! Name/quantity splitting
//!
//! Task names usually carry the quantity to produce ("Large Pad 4",
//! "12x Cover"). Two policies pull it out:
//!
//! - [`QuantityPolicy::Tokens`] (default): every whitespace token made only of
//!   ASCII digits is removed from the name; the first one is the quantity.
//!   Counts too large for `i64` are clamped to `i64::MAX`.
//! - [`QuantityPolicy::Multiplier`]: a leading `<N>x` or trailing `<N>x`
//!   marker is the quantity; names without one keep no quantity.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static LEADING_MULTIPLIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[xX]\s*(.*)").expect("valid regex"));

static TRAILING_MULTIPLIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(\d+)[xX]$").expect("valid regex"));

/// How a quantity is recognized inside a task name
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum QuantityPolicy {
    /// Digit-only whitespace tokens
    #[default]
    Tokens,
    /// Leading or trailing `<N>x` marker
    Multiplier,
}

impl std::fmt::Display for QuantityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantityPolicy::Tokens => write!(f, "tokens"),
            QuantityPolicy::Multiplier => write!(f, "multiplier"),
        }
    }
}

impl std::str::FromStr for QuantityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tokens" | "token" => Ok(QuantityPolicy::Tokens),
            "multiplier" | "regex" => Ok(QuantityPolicy::Multiplier),
            _ => Err(format!(
                "Invalid quantity policy: '{}'. Use 'tokens' or 'multiplier'",
                s
            )),
        }
    }
}

/// Split a task name into its cleaned name and quantity
pub fn split_name_quantity(
    name: Option<&str>,
    policy: QuantityPolicy,
) -> (Option<String>, Option<i64>) {
    let Some(name) = name else {
        return (None, None);
    };
    match policy {
        QuantityPolicy::Tokens => split_tokens(name),
        QuantityPolicy::Multiplier => split_multiplier(name),
    }
}

fn split_tokens(name: &str) -> (Option<String>, Option<i64>) {
    let mut words = Vec::new();
    let mut quantity = None;

    for token in name.split_whitespace() {
        match parse_count(token) {
            Some(n) => {
                if quantity.is_none() {
                    quantity = Some(n);
                }
            }
            None => words.push(token),
        }
    }

    let cleaned = if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    };
    (cleaned, quantity)
}

fn split_multiplier(name: &str) -> (Option<String>, Option<i64>) {
    let captured = LEADING_MULTIPLIER
        .captures(name)
        .and_then(|caps| Some((caps.get(2)?.as_str(), parse_count(caps.get(1)?.as_str())?)))
        .or_else(|| {
            TRAILING_MULTIPLIER
                .captures(name)
                .and_then(|caps| Some((caps.get(1)?.as_str(), parse_count(caps.get(2)?.as_str())?)))
        });

    match captured {
        Some((rest, n)) => (non_empty(rest.trim()), Some(n)),
        None => (non_empty(name.trim()), None),
    }
}

/// A digit-only token as a quantity, saturating at `i64::MAX`
fn parse_count(token: &str) -> Option<i64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match token.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(token, "quantity does not fit in 64 bits, clamped to {}", i64::MAX);
            Some(i64::MAX)
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
