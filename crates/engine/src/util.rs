//! Internal helpers for exact integer arithmetic and label normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! rounding rules so every calculator rounds the same way.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Ceiling division for a non-negative numerator and a positive denominator.
pub(crate) fn ceil_div(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    let quotient = num / den;
    if num % den > 0 { quotient + 1 } else { quotient }
}

/// Division rounded half away from zero. `den` must be positive.
pub(crate) fn round_div(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    let half = num.abs() * 2 + den;
    let magnitude = half / (den * 2);
    if num < 0 { -magnitude } else { magnitude }
}

/// `num / den` rounded to one decimal place, ties to even.
///
/// Returns `0.0` when `den` is zero.
pub(crate) fn round_tenths(num: i128, den: i128) -> f64 {
    if den == 0 {
        return 0.0;
    }
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    let scaled = num.abs() * 10;
    let mut tenths = scaled / den;
    let remainder = scaled % den;
    if remainder * 2 > den || (remainder * 2 == den && tenths % 2 == 1) {
        tenths += 1;
    }
    let signed = if num < 0 { -tenths } else { tenths };
    signed as f64 / 10.0
}

/// Fold a label into a lookup key: compatibility decomposition, accents
/// dropped, lowercase, runs of non-alphanumerics collapsed to one space.
pub(crate) fn normalize_key(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::new();
    let mut prev_space = false;
    for ch in trimmed.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}
