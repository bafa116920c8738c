//! DTC code normalization and system inference

use crate::record::SystemCategory;

/// Width the numeric tail of a code is zero-padded to
pub const CODE_TAIL_WIDTH: usize = 4;

/// Normalize a raw DTC code.
///
/// The code is trimmed and uppercased. When the second character is a
/// digit, punctuation is dropped from the tail and an all-digit tail is
/// left-padded with zeros to [`CODE_TAIL_WIDTH`]. Tails longer than that are
/// kept whole. Anything else is returned trimmed and uppercased.
///
/// Examples:
/// - "p123" -> "P0123"
/// - " b1-234 " -> "B1234"
/// - "U0100" -> "U0100"
/// - "P0A12" -> "P0A12"
pub fn normalize_code(raw: &str) -> String {
    let code = raw.trim().to_uppercase();

    let mut chars = code.chars();
    let (Some(head), Some(second)) = (chars.next(), chars.next()) else {
        return code;
    };
    if !second.is_ascii_digit() {
        return code;
    }

    let tail: String = code[head.len_utf8()..]
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();

    if tail.chars().all(|c| c.is_ascii_digit()) {
        format!("{}{:0>width$}", head, tail, width = CODE_TAIL_WIDTH)
    } else {
        code
    }
}

/// Infer the system category from a normalized code's leading letter
pub fn infer_system(code: &str) -> SystemCategory {
    code.trim()
        .chars()
        .next()
        .map(SystemCategory::from_prefix)
        .unwrap_or(SystemCategory::Powertrain)
}
