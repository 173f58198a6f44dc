//! Prompt construction for the structured-extraction step.

use crate::models::form::ClaimForm;

/// System message sent with every extraction request.
pub const SYSTEM_PROMPT: &str = "You are an expert at form field extraction.";

const INSTRUCTIONS: &str = r#"You are an expert at extracting structured information from scanned Hebrew/English insurance forms.
You are given the OCR result of the form as markdown text. It includes checkboxes (☒ = selected, ☐ = unselected) and Hebrew labels (could be English as well).

Instructions:
- Extract the information and return it in the JSON format below.
- Use the visible `☒` or `☐` symbols next to Hebrew/English text to infer fields like `gender` and `healthFundMember`, etc.
- For gender, look for a ☒ next to זכר or נקבה.
- For healthFundMember, look for ☒ next to any of: כללית, מכבי, מאוחדת, לאומית.
- For signature, if the form includes the word "חתימה" or "חתימהX" with the person's name, consider it signed.
- idNumber should be a valid 9-digit number.
- For both `landlinePhone` and `mobilePhone`:
    1. If the number starts with `0`, leave it as is.
    2. If the number starts with any other digit, remove that digit and put a single `0` at the beginning.
    3. Do not allow more than one leading zero.
    Examples:
        - If the number is `8975423541`, output `0975423541`
        - If the number is `08975423541`, output `08975423541`
        - If the number is `1234567890`, output `0234567890`
        - If the number is `0541234567`, output `0541234567`
- Dates are objects with two-digit `day`, two-digit `month` and four-digit `year`.
- If any field is missing or uncertain, return an empty string for it.
- Output only valid JSON. No comments or explanations."#;

/// Render the output template shown to the model.
pub fn output_template() -> String {
    // Serializing a struct of strings cannot fail.
    serde_json::to_string_pretty(&ClaimForm::default()).unwrap_or_default()
}

/// Build the extraction prompt for a page of OCR markdown.
pub fn build_prompt(markdown: &str) -> String {
    format!(
        "{}\n\nHere is the markdown-formatted OCR content:\n\n{}\n\nOUTPUT FORMAT:\n{}\n",
        INSTRUCTIONS,
        markdown.trim(),
        output_template()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_markdown_and_template() {
        let prompt = build_prompt("\n## טופס 283\n☒ זכר ☐ נקבה\n");

        assert!(prompt.contains("## טופס 283\n☒ זכר ☐ נקבה"));
        assert!(prompt.contains("\"medicalInstitutionFields\""));
        assert!(prompt.contains("\"healthFundMember\": \"\""));
        assert!(prompt.contains("\"poBox\": \"\""));
        assert!(prompt.ends_with("}\n"));
    }

    #[test]
    fn test_markdown_precedes_template() {
        let prompt = build_prompt("MARKER");
        let marker = prompt.find("MARKER").unwrap();
        let template = prompt.find("OUTPUT FORMAT:").unwrap();
        assert!(marker < template);
    }

    #[test]
    fn test_template_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(&output_template()).unwrap();
        assert_eq!(value["dateOfBirth"]["year"], "");
    }
}
