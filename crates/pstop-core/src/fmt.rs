//! Shared formatting helpers for result rows.
//!
//! All pure formatting functions (no layout decisions) live here. Zero values
//! format as an empty string so idle rows stay visually quiet.

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

// ---------------------------------------------------------------------------
// Value formatting
// ---------------------------------------------------------------------------

const PS_PER_NS: u64 = 1_000;
const PS_PER_US: u64 = 1_000_000;
const PS_PER_MS: u64 = 1_000_000_000;
const PS_PER_SEC: u64 = 1_000_000_000_000;
const PS_PER_MIN: u64 = 60 * PS_PER_SEC;
const PS_PER_HOUR: u64 = 60 * PS_PER_MIN;

/// Format a picosecond wait time with the largest fitting unit.
///
/// `"1.50 h"`, `"2.00 m"`, `"12.34 s"`, `"5.00 ms"`, `"7.25 us"`, `"3.00 ns"`, `"999 ps"`
pub fn format_time(picos: u64) -> String {
    if picos == 0 {
        return String::new();
    }
    let units = [
        (PS_PER_HOUR, "h"),
        (PS_PER_MIN, "m"),
        (PS_PER_SEC, "s"),
        (PS_PER_MS, "ms"),
        (PS_PER_US, "us"),
        (PS_PER_NS, "ns"),
    ];
    for (scale, suffix) in units {
        if picos >= scale {
            return format!("{:.2} {}", picos as f64 / scale as f64, suffix);
        }
    }
    format!("{} ps", picos)
}

/// Format a ratio as a percentage: `0.125` -> `" 12.5%"`.
///
/// Anything below 0.01% formats as an empty string.
pub fn format_pct(ratio: f64) -> String {
    if ratio < 0.0001 {
        String::new()
    } else {
        format!("{:5.1}%", 100.0 * ratio)
    }
}

/// Format a count or byte amount with a binary suffix.
///
/// `"512"`, `"1.50 k"`, `"3.00 M"`, `"2.25 G"`, `"1.00 T"`
pub fn format_amount(amount: u64) -> String {
    const K: u64 = 1024;
    if amount == 0 {
        return String::new();
    }
    if amount <= K {
        return amount.to_string();
    }
    let f = amount as f64;
    if amount >= K * K * K * K {
        format!("{:.2} T", f / (K * K * K * K) as f64)
    } else if amount >= K * K * K {
        format!("{:.2} G", f / (K * K * K) as f64)
    } else if amount >= K * K {
        format!("{:.2} M", f / (K * K) as f64)
    } else {
        format!("{:.2} k", f / K as f64)
    }
}
