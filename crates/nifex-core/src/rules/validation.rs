//! Structural validation of extracted claim forms.
//!
//! All checks run on every record; the result lists every violation found,
//! not just the first.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::models::record::Record;

use super::patterns::{ID_NUMBER, LANDLINE_PHONE, MOBILE_PHONE};

/// Top-level fields that must be present and non-blank.
pub const MANDATORY_FIELDS: [&str; 7] = [
    "lastName",
    "firstName",
    "idNumber",
    "gender",
    "dateOfBirth",
    "address",
    "medicalInstitutionFields",
];

/// Date fields checked for completeness and DD/MM/YYYY shape.
pub const DATE_FIELDS: [&str; 4] = [
    "dateOfBirth",
    "dateOfInjury",
    "formFillingDate",
    "formReceiptDateAtClinic",
];

/// A single rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A mandatory field is missing or blank.
    MissingField(&'static str),
    /// The identity number is not 9 digits.
    InvalidIdNumber,
    /// The mobile number is not `05` followed by 8 digits.
    InvalidMobilePhone,
    /// The landline is not `0` followed by 8 or 9 digits.
    InvalidLandlinePhone,
    /// A date has an empty day, month or year.
    IncompleteDate(&'static str),
    /// A date is complete but not DD/MM/YYYY sized.
    DateFormat(&'static str),
    /// Neither street nor city is filled.
    IncompleteAddress,
    /// No health fund is marked.
    MissingHealthFund,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => {
                write!(f, "Missing or empty required field: {}", field)
            }
            Self::InvalidIdNumber => {
                write!(f, "idNumber is missing or not a valid 9-digit number.")
            }
            Self::InvalidMobilePhone => {
                write!(f, "mobilePhone must be 10 digits and start with '05'.")
            }
            Self::InvalidLandlinePhone => {
                write!(f, "landlinePhone must be 9 or 10 digits and start with '0'.")
            }
            Self::IncompleteDate(label) => write!(f, "{} is incomplete.", label),
            Self::DateFormat(label) => write!(f, "{} should be in DD/MM/YYYY format.", label),
            Self::IncompleteAddress => write!(
                f,
                "Address is incomplete (at least street and city should be filled)."
            ),
            Self::MissingHealthFund => write!(f, "Health fund membership field is missing."),
        }
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Validate a record and return every violation, in check order.
///
/// An empty result means the record passed.
pub fn validate(record: &Record) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Mandatory fields
    for field in MANDATORY_FIELDS {
        if record.get(field).is_none_or(is_blank) {
            violations.push(Violation::MissingField(field));
        }
    }

    // Identity number
    if !ID_NUMBER.is_match(record.get_str("idNumber")) {
        violations.push(Violation::InvalidIdNumber);
    }

    // Phones are optional, but must be well formed when present
    let mobile = record.get_str("mobilePhone");
    if !mobile.is_empty() && !MOBILE_PHONE.is_match(mobile) {
        violations.push(Violation::InvalidMobilePhone);
    }

    let landline = record.get_str("landlinePhone");
    if !landline.is_empty() && !LANDLINE_PHONE.is_match(landline) {
        violations.push(Violation::InvalidLandlinePhone);
    }

    // Dates
    let empty = Map::new();
    for label in DATE_FIELDS {
        let date = record.get_mapping(label).unwrap_or(&empty);
        if let Some(violation) = check_date(date, label) {
            violations.push(violation);
        }
    }

    // Address needs at least a street or a city
    let address = record.get_mapping("address").unwrap_or(&empty);
    if ["street", "city"]
        .iter()
        .all(|key| leaf_str(address, key).trim().is_empty())
    {
        violations.push(Violation::IncompleteAddress);
    }

    // Health fund
    let medical = record.get_mapping("medicalInstitutionFields").unwrap_or(&empty);
    if leaf_str(medical, "healthFundMember").is_empty() {
        violations.push(Violation::MissingHealthFund);
    }

    violations
}

fn check_date(date: &Map<String, Value>, label: &'static str) -> Option<Violation> {
    let day = leaf_str(date, "day");
    let month = leaf_str(date, "month");
    let year = leaf_str(date, "year");

    if [day, month, year].iter().any(|part| part.trim().is_empty()) {
        return Some(Violation::IncompleteDate(label));
    }

    let sized = day.chars().count() == 2
        && month.chars().count() == 2
        && year.chars().count() == 4;
    if !sized {
        return Some(Violation::DateFormat(label));
    }

    None
}

fn leaf_str<'a>(map: &'a Map<String, Value>, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or("")
}

// Blank means: null, false, zero, whitespace-only string, empty array or mapping.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
