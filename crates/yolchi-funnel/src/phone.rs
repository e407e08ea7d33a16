// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number canonicalization and the last-9 matching key.
//!
//! Upload sources and the registry disagree on prefixes (`+998`, `998`, bare
//! mobile numbers, stray punctuation). Normalization gives a stable digit
//! string; equality between two numbers is decided on the last nine digits.

/// Country calling code prepended to bare mobile numbers.
pub const COUNTRY_PREFIX: &str = "998";

/// Digits in a bare mobile number and in the matching key.
pub const KEY_LEN: usize = 9;

const FULL_LEN: usize = COUNTRY_PREFIX.len() + KEY_LEN;

/// All ASCII digits of `raw`, in order.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Canonical digit-only form.
///
/// Twelve digits with the country prefix are kept, nine digits starting with
/// `9` get the prefix, anything else passes through as its digits. Never fails.
pub fn normalize(raw: &str) -> String {
    let digits = digits(raw);
    if digits.len() == FULL_LEN && digits.starts_with(COUNTRY_PREFIX) {
        digits
    } else if digits.len() == KEY_LEN && digits.starts_with('9') {
        format!("{COUNTRY_PREFIX}{digits}")
    } else {
        digits
    }
}

/// Matching key: the last nine digits (fewer if the number is shorter).
pub fn last_nine(raw: &str) -> String {
    let digits = digits(raw);
    let start = digits.len().saturating_sub(KEY_LEN);
    digits[start..].to_string()
}

/// Normalized numbers shorter than nine digits are dropped on import.
pub fn is_importable(normalized: &str) -> bool {
    normalized.len() >= KEY_LEN
}
