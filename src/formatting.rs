//! Display strings for prices, changes, volumes and funding amounts.
//!
//! Every function accepts missing or non-finite input and renders it as
//! [`PLACEHOLDER`]; nothing here ever prints `NaN`.

/// Shown in place of a missing value
pub const PLACEHOLDER: &str = "—";

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Insert `,` every three digits of an unsigned integer string.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Thousands-grouped decimal with between `min_frac` and `max_frac` fraction digits.
pub fn format_grouped(value: f64, min_frac: usize, max_frac: usize) -> String {
    let rounded = format!("{:.*}", max_frac, value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut frac = frac_part.to_string();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }

    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{}", group_digits(int_part))
    } else {
        format!("{sign}{}.{frac}", group_digits(int_part))
    }
}

/// `$67,432` above 10k, `$1.2345` above 1, `$0.000123` below.
/// Negative values keep the sign ahead of the dollar: `-$0.500000`.
pub fn format_price(value: Option<f64>) -> String {
    let Some(v) = finite(value) else {
        return PLACEHOLDER.to_string();
    };
    let magnitude = v.abs();
    let body = if magnitude >= 10_000.0 {
        format_grouped(magnitude, 0, 0)
    } else if magnitude >= 1.0 {
        format_grouped(magnitude, 2, 4)
    } else {
        format!("{magnitude:.6}")
    };
    let sign = if v < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') { "-" } else { "" };
    format!("{sign}${body}")
}

/// Signed percentage with two decimals: `+1.23%`, `-0.50%`.
pub fn format_change(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) if v >= 0.0 => format!("+{v:.2}%"),
        Some(v) => format!("{v:.2}%"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Compact dollar volume. Zero volume is treated as missing.
pub fn format_volume(value: Option<f64>) -> String {
    let Some(v) = finite(value).filter(|v| *v != 0.0) else {
        return PLACEHOLDER.to_string();
    };
    if v >= 1e9 {
        format!("${:.2}B", v / 1e9)
    } else if v >= 1e6 {
        format!("${:.1}M", v / 1e6)
    } else {
        format!("${}", format_grouped(v, 0, 3))
    }
}

/// Total value locked uses the same scale as volume.
pub fn format_tvl(value: Option<f64>) -> String {
    format_volume(value)
}

/// Raise size given in millions of USD.
pub fn format_funding_amount(millions: Option<f64>) -> String {
    match finite(millions) {
        Some(v) if v >= 1000.0 => format!("${:.1}B", v / 1000.0),
        Some(v) if v >= 1.0 => format!("${v:.1}M"),
        Some(v) => format!("${v:.2}M"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Portfolio weight given as a fraction: `0.4213` -> `42.1%`.
pub fn format_percent_weight(fraction: f64) -> String {
    if !fraction.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.1}%", fraction * 100.0)
}

/// Value that is already a percentage, unsigned: `12.3%`.
pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    match finite(value) {
        Some(v) => format!("{v:.decimals$}%"),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_fixed(value: Option<f64>, decimals: usize) -> String {
    match finite(value) {
        Some(v) => format!("{v:.decimals$}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Ratio such as a volume multiple: `1.84x`.
pub fn format_multiplier(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{v:.2}x"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Price axis label: `67.4k` at or above 1000, two decimals below.
pub fn format_axis_price(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value >= 1000.0 {
        format!("{:.1}k", value / 1000.0)
    } else {
        format!("{value:.2}")
    }
}
