//! Slug normalization for deal keys.
//!
//! Share links already in the wild embed keys produced by this exact
//! algorithm, so every step below is load-bearing. Changing the order or the
//! folding table breaks existing links.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::products::ProductRecord;

/// Normalizes arbitrary text into a deal-key slug.
///
/// Steps, in order:
/// 1. lowercase (Unicode-aware)
/// 2. trim surrounding whitespace
/// 3. fold `ä`→`ae`, `ö`→`oe`, `ü`→`ue`, `ß`→`ss`
/// 4. treat `.` as a separator, so `1.99` becomes `1-99`
/// 5. collapse every run of characters outside `[a-z0-9]` into one `-`
/// 6. drop leading and trailing `-`
///
/// The result matches `^[a-z0-9]+(-[a-z0-9]+)*$` or is empty, and
/// `normalize(normalize(s)) == normalize(s)` for every `s`.
#[must_use]
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for c in lowered.trim().chars() {
        let folded = match c {
            'ä' => "ae",
            'ö' => "oe",
            'ü' => "ue",
            'ß' => "ss",
            _ => {
                if c.is_ascii_lowercase() || c.is_ascii_digit() {
                    push_slug_char(&mut slug, &mut pending_separator, c);
                } else {
                    pending_separator = true;
                }
                continue;
            }
        };
        for f in folded.chars() {
            push_slug_char(&mut slug, &mut pending_separator, f);
        }
    }

    slug
}

fn push_slug_char(slug: &mut String, pending_separator: &mut bool, c: char) {
    if *pending_separator && !slug.is_empty() {
        slug.push('-');
    }
    *pending_separator = false;
    slug.push(c);
}

/// Formats a price with exactly two fractional digits, e.g. `1` → `"1.00"`.
///
/// Rounding works on the exact binary value of `price`, and exact ties round
/// away from zero: `2.125` → `"2.13"`, while `1.005` (stored just below the
/// tie) → `"1.00"`. Magnitudes of `1e21` and above use exponent notation
/// (`"1e+21"`). Non-finite values render as `NaN`, `Infinity` and `-Infinity`
/// so keys built from broken catalog rows stay stable.
#[must_use]
pub fn format_price(price: f64) -> String {
    if price.is_nan() {
        return "NaN".to_owned();
    }
    if price.is_infinite() {
        return if price.is_sign_positive() {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        };
    }

    let magnitude = price.abs();
    if magnitude >= 1e21 {
        return format!("{price:e}").replacen('e', "e+", 1);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    match Decimal::from_f64_retain(magnitude) {
        Some(exact) => {
            let mut rounded =
                exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            format!("{sign}{rounded}")
        }
        None => format!("{price:.2}"),
    }
}

/// Derives the canonical matching key of a product:
/// `normalize("{supermarket}-{brand}-{name}-{price:.2}")`.
#[must_use]
pub fn build_key(product: &ProductRecord) -> String {
    normalize(&format!(
        "{}-{}-{}-{}",
        product.supermarket,
        product.brand,
        product.name,
        format_price(product.price)
    ))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
