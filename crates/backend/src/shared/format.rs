fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Formats an integer with comma thousand separators: `1234567` -> `1,234,567`
pub fn format_number(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Whole-dollar amount: `5000.0` -> `$5,000`, `-1234.6` -> `-$1,235`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!(
        "{}${}",
        sign,
        group_thousands(&format!("{:.0}", rounded.abs()))
    )
}

/// At most two fraction digits, trailing zeros dropped: `1234.5` -> `1,234.5`
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };

    let mut out = format!("{}{}", sign, group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
