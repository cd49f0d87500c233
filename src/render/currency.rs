use num_format::{Locale, ToFormattedString};

/// Format an amount as US dollars with en-US digit grouping: `$1,234.50`,
/// negative amounts as `-$3.00`. Rounds to whole cents.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{}${}.{:02}",
        sign,
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}
