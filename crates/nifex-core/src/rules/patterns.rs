//! Common regex patterns for claim form fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Anything that is not an ASCII digit
    pub static ref NON_DIGIT: Regex = Regex::new(r"[^0-9]").unwrap();

    // Israeli mobile number somewhere inside a digit run
    pub static ref MOBILE_EMBEDDED: Regex = Regex::new(r"05[0-9]{8}").unwrap();

    // Israeli mobile number, whole value
    pub static ref MOBILE_PHONE: Regex = Regex::new(r"^05[0-9]{8}$").unwrap();

    // Landline: leading 0, 9 or 10 digits in total
    pub static ref LANDLINE_PHONE: Regex = Regex::new(r"^0[0-9]{8,9}$").unwrap();

    // Identity number (teudat zehut)
    pub static ref ID_NUMBER: Regex = Regex::new(r"^[0-9]{9}$").unwrap();

    // Exercise identifier in a file name, e.g. "scan_ex3.pdf"
    pub static ref EXERCISE_ID: Regex = Regex::new(r"ex[0-9]+").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_phone() {
        assert!(MOBILE_PHONE.is_match("0541234567"));
        assert!(!MOBILE_PHONE.is_match("054123456"));
        assert!(!MOBILE_PHONE.is_match("05412345678"));
        assert!(!MOBILE_PHONE.is_match("0641234567"));
    }

    #[test]
    fn test_landline_phone() {
        assert!(LANDLINE_PHONE.is_match("041234567"));
        assert!(LANDLINE_PHONE.is_match("0771234567"));
        assert!(!LANDLINE_PHONE.is_match("04123456"));
        assert!(!LANDLINE_PHONE.is_match("41234567890"));
    }

    #[test]
    fn test_id_number() {
        assert!(ID_NUMBER.is_match("012345678"));
        assert!(!ID_NUMBER.is_match("12345678"));
        assert!(!ID_NUMBER.is_match("01234567a"));
    }
}
