//! Display formatting for the view layer.
//!
//! The core hands the frontend pre-formatted strings so every surface
//! renders figures identically. Privacy mode is enforced here: when the
//! flag is on, every currency-bearing string becomes a fixed placeholder.
//! Percentages are not currency and stay visible.

/// Fixed placeholder shown for every currency value in privacy mode.
pub const PRIVACY_PLACEHOLDER: &str = "••••••";

/// Format a currency amount, e.g. `1234.5` → `"$1,234.50"`,
/// `-1234.5` → `"-$1,234.50"`.
pub fn currency(value: f64, privacy: bool) -> String {
    if privacy {
        return PRIVACY_PLACEHOLDER.to_string();
    }

    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some(parts) => parts,
        None => (fixed.as_str(), "00"),
    };

    format!(
        "{}${}.{}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part
    )
}

/// Currency with an explicit leading `+` for non-negative values,
/// matching the sign convention of the P&L cards.
pub fn signed_currency(value: f64, privacy: bool) -> String {
    if privacy {
        return PRIVACY_PLACEHOLDER.to_string();
    }
    if value >= 0.0 {
        format!("+{}", currency(value, false))
    } else {
        currency(value, false)
    }
}

/// Percentage with one decimal, e.g. `70.0` → `"70.0%"`. Used for
/// allocation shares.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Signed percentage with two decimals, e.g. `1.234` → `"+1.23%"`.
/// Used for P&L figures.
pub fn signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// Insert `,` separators into an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
