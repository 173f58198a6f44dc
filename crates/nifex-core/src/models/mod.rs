//! Data models for claim form extraction.

pub mod config;
pub mod form;
pub mod record;

pub use config::NifexConfig;
pub use form::{Address, ClaimForm, DateParts, MedicalInstitutionFields};
pub use record::Record;
