//! Base-62 encoding of numeric link identifiers.
//!
//! Short codes are the positional base-62 representation of a database id,
//! not a hash: the mapping is a bijection, so there are no collisions and no
//! uniqueness checks beyond the store's own id assignment.

use crate::error::AppError;
use serde_json::json;

/// Digit alphabet, ordered so that a symbol's index is its value.
const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u64 = 62;

/// Encodes an id as a base-62 string, most significant digit first.
///
/// Zero encodes as `"0"` so that every id round-trips through
/// [`decode`]; no other value produces a leading zero digit.
///
/// # Examples
///
/// ```
/// use shortlink::utils::base62::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(125), "21");
/// ```
pub fn encode(mut id: u64) -> String {
    if id == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while id > 0 {
        digits.push(ALPHABET[(id % BASE) as usize] as char);
        id /= BASE;
    }

    digits.iter().rev().collect()
}

/// Decodes a base-62 string back into the id it was encoded from.
///
/// # Errors
///
/// Returns [`AppError::InvalidCode`] if the input is empty, contains a
/// character outside the 62-symbol alphabet, or encodes a value that does
/// not fit in 64 bits. Invalid characters are never skipped.
pub fn decode(code: &str) -> Result<u64, AppError> {
    if code.is_empty() {
        return Err(AppError::invalid_code(
            "Short code must not be empty",
            json!({}),
        ));
    }

    let mut id: u64 = 0;
    for c in code.bytes() {
        let value = digit_value(c).ok_or_else(|| {
            AppError::invalid_code(
                "Short code contains characters outside the base-62 alphabet",
                json!({ "code": code }),
            )
        })?;

        id = id
            .checked_mul(BASE)
            .and_then(|acc| acc.checked_add(value))
            .ok_or_else(|| {
                AppError::invalid_code(
                    "Short code encodes a value outside the id range",
                    json!({ "code": code }),
                )
            })?;
    }

    Ok(id)
}

fn digit_value(c: u8) -> Option<u64> {
    match c {
        b'0'..=b'9' => Some(u64::from(c - b'0')),
        b'a'..=b'z' => Some(u64::from(c - b'a') + 10),
        b'A'..=b'Z' => Some(u64::from(c - b'A') + 36),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_values() {
        assert_eq!(encode(0), "0");
        assert_eq!(encode(1), "1");
        assert_eq!(encode(9), "9");
        assert_eq!(encode(10), "a");
        assert_eq!(encode(35), "z");
        assert_eq!(encode(36), "A");
        assert_eq!(encode(61), "Z");
        assert_eq!(encode(62), "10");
        // 125 = 2*62 + 1
        assert_eq!(encode(125), "21");
    }

    #[test]
    fn decodes_known_values() {
        assert_eq!(decode("0").unwrap(), 0);
        assert_eq!(decode("Z").unwrap(), 61);
        assert_eq!(decode("10").unwrap(), 62);
        assert_eq!(decode("21").unwrap(), 125);
    }

    #[test]
    fn round_trips_across_the_full_range() {
        let ids = [
            0,
            1,
            61,
            62,
            63,
            125,
            3843,
            3844,
            1_000_000,
            u64::from(u32::MAX),
            i64::MAX as u64,
            u64::MAX,
        ];

        for id in ids {
            assert_eq!(decode(&encode(id)).unwrap(), id, "id {id} must round-trip");
        }
    }

    #[test]
    fn code_length_never_shrinks_as_ids_grow() {
        let mut previous = encode(0).len();
        for id in 1..10_000u64 {
            let len = encode(id).len();
            assert!(len >= previous, "length shrank at id {id}");
            previous = len;
        }

        // Spot checks around power-of-62 boundaries.
        assert!(encode(62u64.pow(5)).len() > encode(62u64.pow(5) - 1).len());
    }

    #[test]
    fn rejects_characters_outside_the_alphabet() {
        for code in ["abc!@#", "with space", "dash-ed", "under_score", "ümlaut"] {
            let err = decode(code).unwrap_err();
            assert!(
                matches!(err, AppError::InvalidCode { .. }),
                "{code:?} must be rejected as InvalidCode"
            );
        }
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            decode("").unwrap_err(),
            AppError::InvalidCode { .. }
        ));
    }

    #[test]
    fn rejects_values_that_overflow() {
        // u64::MAX encodes to 11 digits; one more digit always overflows.
        let too_long = format!("{}0", encode(u64::MAX));
        assert!(matches!(
            decode(&too_long).unwrap_err(),
            AppError::InvalidCode { .. }
        ));
    }
}
