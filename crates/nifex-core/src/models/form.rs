//! Claim form data model for National Insurance work-injury forms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A complete claim form as returned by the extraction step.
///
/// Every leaf is a string. Fields the model could not read are empty strings,
/// so `ClaimForm::default()` doubles as the output template shown to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimForm {
    /// Family name (שם משפחה).
    pub last_name: String,

    /// Given name (שם פרטי).
    pub first_name: String,

    /// National identity number, 9 digits.
    pub id_number: String,

    /// Gender as marked on the form.
    pub gender: String,

    /// Date of birth.
    pub date_of_birth: DateParts,

    /// Home address.
    pub address: Address,

    /// Landline phone number.
    pub landline_phone: String,

    /// Mobile phone number.
    pub mobile_phone: String,

    /// Occupation.
    pub job_type: String,

    /// Date of the injury.
    pub date_of_injury: DateParts,

    /// Time of the injury.
    pub time_of_injury: String,

    /// Where the accident happened (workplace, on the way, ...).
    pub accident_location: String,

    /// Street address of the accident.
    pub accident_address: String,

    /// Free-text description of the accident.
    pub accident_description: String,

    /// Injured body part.
    pub injured_body_part: String,

    /// Applicant signature.
    pub signature: String,

    /// Date the form was filled in.
    pub form_filling_date: DateParts,

    /// Date the clinic received the form.
    pub form_receipt_date_at_clinic: DateParts,

    /// Section filled in by the medical institution.
    pub medical_institution_fields: MedicalInstitutionFields,
}

/// A date split into the three boxes printed on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateParts {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DateParts {
    /// Create a date from its parts.
    pub fn new(day: impl Into<String>, month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            month: month.into(),
            year: year.into(),
        }
    }

    /// Check if all parts are empty.
    pub fn is_empty(&self) -> bool {
        self.day.trim().is_empty() && self.month.trim().is_empty() && self.year.trim().is_empty()
    }

    /// Convert to a calendar date, if the parts form a real one.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let day: u32 = self.day.trim().parse().ok()?;
        let month: u32 = self.month.trim().parse().ok()?;
        let year: i32 = self.year.trim().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Format as DD/MM/YYYY.
    pub fn format(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("{}/{}/{}", self.day, self.month, self.year)
    }
}

/// Home address block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub house_number: String,
    pub entrance: String,
    pub apartment: String,
    pub city: String,
    pub postal_code: String,
    pub po_box: String,
}

impl Address {
    /// Format address as a single line.
    pub fn format(&self) -> String {
        let mut parts = Vec::new();

        let street = [self.street.trim(), self.house_number.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if !street.is_empty() {
            parts.push(street);
        }
        if !self.entrance.trim().is_empty() {
            parts.push(format!("entrance {}", self.entrance.trim()));
        }
        if !self.apartment.trim().is_empty() {
            parts.push(format!("apt {}", self.apartment.trim()));
        }

        let city = [self.city.trim(), self.postal_code.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if !city.is_empty() {
            parts.push(city);
        }
        if !self.po_box.trim().is_empty() {
            parts.push(format!("P.O.B. {}", self.po_box.trim()));
        }

        parts.join(", ")
    }
}

/// Section filled in by the medical institution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalInstitutionFields {
    /// Health fund (kupat holim) the applicant belongs to.
    pub health_fund_member: String,
    pub nature_of_accident: String,
    pub medical_diagnoses: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_serializes_in_form_order() {
        let value = serde_json::to_value(ClaimForm::default()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        assert_eq!(
            keys,
            vec![
                "lastName",
                "firstName",
                "idNumber",
                "gender",
                "dateOfBirth",
                "address",
                "landlinePhone",
                "mobilePhone",
                "jobType",
                "dateOfInjury",
                "timeOfInjury",
                "accidentLocation",
                "accidentAddress",
                "accidentDescription",
                "injuredBodyPart",
                "signature",
                "formFillingDate",
                "formReceiptDateAtClinic",
                "medicalInstitutionFields",
            ]
        );
        assert_eq!(value["address"]["poBox"], "");
        assert_eq!(value["medicalInstitutionFields"]["healthFundMember"], "");
    }

    #[test]
    fn test_deserialize_partial() {
        let form: ClaimForm = serde_json::from_str(
            r#"{"firstName": "Dana", "dateOfBirth": {"day": "03", "month": "11", "year": "1988"}}"#,
        )
        .unwrap();

        assert_eq!(form.first_name, "Dana");
        assert_eq!(form.last_name, "");
        assert_eq!(form.date_of_birth, DateParts::new("03", "11", "1988"));
    }

    #[test]
    fn test_date_parts_to_naive_date() {
        assert_eq!(
            DateParts::new("03", "11", "1988").to_naive_date(),
            NaiveDate::from_ymd_opt(1988, 11, 3)
        );
        assert_eq!(DateParts::new("31", "02", "2020").to_naive_date(), None);
        assert_eq!(DateParts::default().to_naive_date(), None);
    }

    #[test]
    fn test_date_parts_format() {
        assert_eq!(DateParts::new("03", "11", "1988").format(), "03/11/1988");
        assert_eq!(DateParts::default().format(), "");
    }

    #[test]
    fn test_address_format() {
        let address = Address {
            street: "הרצל".to_string(),
            house_number: "12".to_string(),
            apartment: "4".to_string(),
            city: "חיפה".to_string(),
            postal_code: "3303112".to_string(),
            ..Default::default()
        };

        assert_eq!(address.format(), "הרצל 12, apt 4, חיפה 3303112");
        assert_eq!(Address::default().format(), "");
    }
}
