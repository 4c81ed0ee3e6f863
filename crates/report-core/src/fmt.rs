//! Display formatting shared by the report assembler and its tests.
//!
//! All money figures in the report are INR. Statement tables are scaled to
//! crores (1 crore = 1e7) and grouped with thousands separators.

pub const NOT_AVAILABLE: &str = "N/A";

/// Scale a raw currency value to crores
pub fn to_crore(value: f64) -> f64 {
    value / 1.0e7
}

/// Fixed-decimal rendering with thousands separators
pub fn grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }

    if value < 0.0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Market cap header figure, e.g. `₹880,000.00 Cr`
pub fn market_cap(value: f64) -> String {
    format!("₹{} Cr", grouped(to_crore(value), 2))
}

/// Whole-crore statement table cell
pub fn crore_cell(value: f64) -> String {
    grouped(to_crore(value), 0)
}

/// Live price with currency prefix
pub fn price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("₹{}", grouped(v, 2)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Plain ratio with two decimals
pub fn ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Fraction rendered as a percentage with two decimals
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}
