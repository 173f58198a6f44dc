//! Mobile phone canonicalization.
//!
//! OCR output for handwritten phone boxes is noisy: separators, a dropped
//! leading zero, an extra digit picked up from a neighbouring box. The
//! normalizer recovers the canonical `05XXXXXXXX` form where the digits allow
//! it and otherwise clears the field so the validator does not see garbage.

use tracing::debug;

use crate::models::record::Record;

use super::patterns::{MOBILE_EMBEDDED, NON_DIGIT};

/// Record key holding the mobile phone number.
pub const MOBILE_PHONE_FIELD: &str = "mobilePhone";

/// Canonicalize a raw mobile phone number.
///
/// Returns exactly 10 digits starting with `05`, or an empty string when the
/// input cannot be repaired.
pub fn normalize_mobile(raw: &str) -> String {
    let digits = NON_DIGIT.replace_all(raw, "");

    let candidate = if is_canonical(&digits) {
        digits.to_string()
    } else if let Some(m) = MOBILE_EMBEDDED.find(&digits) {
        m.as_str().to_string()
    } else {
        repair(&digits)
    };

    if is_canonical(&candidate) {
        candidate
    } else {
        String::new()
    }
}

/// Rewrite the mobile phone field of a record in place.
///
/// The key is always written; a missing or non-string value becomes "".
pub fn normalize_mobile_field(record: &mut Record) {
    let raw = record.get_str(MOBILE_PHONE_FIELD).to_string();
    let normalized = normalize_mobile(&raw);

    if normalized != raw {
        debug!("Normalized {} from {:?} to {:?}", MOBILE_PHONE_FIELD, raw, normalized);
    }

    record.insert(MOBILE_PHONE_FIELD, normalized);
}

fn is_canonical(digits: &str) -> bool {
    digits.len() == 10 && digits.starts_with("05")
}

// `digits` is ASCII-only, so byte slicing is safe.
fn repair(digits: &str) -> String {
    let len = digits.len();

    if len == 9 && digits.starts_with('5') {
        format!("0{}", digits)
    } else if len == 9 && digits.starts_with('0') {
        format!("05{}", &digits[1..])
    } else if len >= 9 {
        format!("0{}", &digits[len - 9..])
    } else {
        digits.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_canonical_is_identity() {
        for phone in ["0500000000", "0541234567", "0599999999"] {
            assert_eq!(normalize_mobile(phone), phone);
        }
    }

    #[test]
    fn test_strips_separators() {
        assert_eq!(normalize_mobile("054-123-4567"), "0541234567");
        assert_eq!(normalize_mobile("(054) 123 4567"), "0541234567");
        assert_eq!(normalize_mobile(" 054.123.45.67 "), "0541234567");
    }

    #[test]
    fn test_extracts_embedded_number() {
        assert_eq!(normalize_mobile("tel: 9720541234567"), "0541234567");
        assert_eq!(normalize_mobile("x1 0521112223 ext 9"), "0521112223");
        assert_eq!(normalize_mobile("3105412345678"), "0541234567");
    }

    #[test]
    fn test_missing_leading_zero() {
        assert_eq!(normalize_mobile("541234567"), "0541234567");
        assert_eq!(normalize_mobile("54-123-4567"), "0541234567");
    }

    #[test]
    fn test_missing_five() {
        assert_eq!(normalize_mobile("041234567"), "0541234567");
    }

    #[test]
    fn test_takes_last_nine_digits() {
        // 10 digits, no "05" run: last nine behind a zero
        assert_eq!(normalize_mobile("1541234567"), "0541234567");
        // 11 digits with the last nine not starting with 5
        assert_eq!(normalize_mobile("97241234567"), "");
    }

    #[test]
    fn test_unrepairable() {
        assert_eq!(normalize_mobile("12"), "");
        assert_eq!(normalize_mobile(""), "");
        assert_eq!(normalize_mobile("no phone"), "");
        assert_eq!(normalize_mobile("12345678"), "");
        assert_eq!(normalize_mobile("123456789"), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "054-123-4567",
            "541234567",
            "041234567",
            "1541234567",
            "12",
            "",
            "+972 54 123 4567",
            "0771234567",
            "abc",
        ];
        for input in inputs {
            let once = normalize_mobile(input);
            assert_eq!(normalize_mobile(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_normalize_field() {
        let mut record = Record::from_value(json!({
            "firstName": "Dana",
            "mobilePhone": "054 123 4567"
        }))
        .unwrap();

        normalize_mobile_field(&mut record);
        assert_eq!(record.get_str("mobilePhone"), "0541234567");
    }

    #[test]
    fn test_normalize_field_inserts_missing_key() {
        let mut record = Record::new();
        normalize_mobile_field(&mut record);
        assert_eq!(record.get("mobilePhone"), Some(&json!("")));
    }
}
