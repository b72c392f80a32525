//! Number and text formatting for terminal output

/// `1.5M DZD`, `12.3K DZD`, `950 DZD`
pub fn format_currency(amount: f64, unit: &str) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.1}M {}", amount / 1_000_000.0, unit)
    } else if amount >= 1_000.0 {
        format!("{:.1}K {}", amount / 1_000.0, unit)
    } else {
        format!("{} {}", group_thousands(amount), unit)
    }
}

/// Compact form without the unit, used next to bars
pub fn format_compact(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.1}K", amount / 1_000.0)
    } else {
        format!("{:.0}", amount)
    }
}

/// Comma-grouped with at most three decimals: `1,234,567.5`
pub fn group_thousands(amount: f64) -> String {
    let rendered = format!("{:.3}", amount.abs());
    let (integer, fraction) = rendered.split_once('.').unwrap_or((&rendered, ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && (integer != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

/// First `max` characters, with `...` appended when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Horizontal bar of `width` cells filled to `ratio` (clamped to 0..=1)
pub fn bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
