//! Formatting helpers for UI feedback. None of these values are authoritative.

/// Two-letter avatar initials derived from an email address.
///
/// A dotted local part yields the first letter of its first two segments
/// (`john.doe@x.com` → `JD`); otherwise the first two letters are used
/// (`johndoe@x.com` → `JO`).
pub fn get_initials(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default().trim();
    let parts: Vec<&str> = local.split('.').filter(|p| !p.is_empty()).collect();

    let initials: String = if parts.len() >= 2 {
        parts
            .iter()
            .take(2)
            .filter_map(|p| p.chars().next())
            .collect()
    } else {
        local.chars().filter(|c| *c != '.').take(2).collect()
    };

    if initials.is_empty() {
        return "?".to_string();
    }
    initials.to_uppercase()
}

/// Price after a percentage discount, rounded to cents.
///
/// `percent` is clamped into `0..=100`.
pub fn calculate_discount_price(price: f64, percent: f64) -> f64 {
    let pct = percent.clamp(0.0, 100.0);
    round_cents(price * (1.0 - pct / 100.0))
}

/// `1234.5` → `"1,234.50"`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac:02}")
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
