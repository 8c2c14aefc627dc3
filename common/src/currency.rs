/// Display prefix for Kenyan shilling amounts.
pub const CURRENCY_SYMBOL: &str = "KSh";

/// Format a shilling amount for display, e.g. `KSh 1,234.50`.
///
/// Amounts are rounded to cents. Non-finite input renders as zero.
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}{CURRENCY_SYMBOL} {}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

/// Unit price label for crop cards, e.g. `KSh 45.00/kg`.
pub fn format_unit_price(price_per_unit: f64, unit: &str) -> String {
    format!("{}/{unit}", format_currency(price_per_unit))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
