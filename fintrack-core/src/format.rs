//! Money formatting shared by the list and transfer views.

/// `-$12.50` for debits, `$12.50` otherwise
pub fn format_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${:.2}", amount.abs())
}
