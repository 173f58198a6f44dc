//! Rule-based normalization and validation for claim form fields.

pub mod patterns;
pub mod phone;
pub mod validation;

pub use phone::{normalize_mobile, normalize_mobile_field, MOBILE_PHONE_FIELD};
pub use validation::{validate, Violation, DATE_FIELDS, MANDATORY_FIELDS};
