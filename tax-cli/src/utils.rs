use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use thiserror::Error;

/// Largest amount accepted on the command line.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Error returned when a command-line amount cannot be used.
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount must not be negative, got '{0}'")]
    Negative(String),

    #[error("amount must not exceed {max}, got '{input}'")]
    TooLarge { input: String, max: Decimal },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses a money amount between zero and [`MAX_AMOUNT`]. Used as a clap
/// value parser.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseDecimalError> {
    let value = parse_decimal(s)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ParseDecimalError::Negative(s.trim().to_string()));
    }
    if value > MAX_AMOUNT {
        return Err(ParseDecimalError::TooLarge {
            input: s.trim().to_string(),
            max: MAX_AMOUNT,
        });
    }
    Ok(value)
}

/// Formats an amount with two decimals and comma thousands separators.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

/// Formats a fraction as a percentage, e.g. `0.35` as `35.00%`.
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.2}%")
}
