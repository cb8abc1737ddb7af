// src/utils/currency.rs
// Amounts are whole kwanza; the app never shows minor units.

pub const CURRENCY_SYMBOL: &str = "Kz";

/// Largest single amount (fare, top-up) the app accepts.
pub const MAX_AMOUNT: i64 = 10_000_000;

/// Formats an amount the way the pt-AO locale prints it: `Kz 1.200`, `-Kz 850`.
pub fn format_kwanza(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{} {}", sign, CURRENCY_SYMBOL, group_thousands(amount.unsigned_abs()))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Rounds to the nearest whole unit, ties away from zero. Out-of-range values
/// saturate at the `i64` bounds.
pub fn round_to_unit(value: f64) -> i64 {
    value.round() as i64
}
