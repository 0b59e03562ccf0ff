//! Uploaded-resume parsing: PDF bytes to text to structured sections.
//!
//! Uploads are bounded at 10 MB by the router's body limit; the handler also
//! checks the decoded field size so a misconfigured limit cannot slip
//! oversized files through. Structuring failures degrade to the raw text.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::resume::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};

/// Hard cap for uploaded resume files.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedPersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedExperience {
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedEducation {
    pub school: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Structured form of an uploaded resume, mirroring the profile shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedResume {
    pub personal_info: ParsedPersonalInfo,
    #[serde(default)]
    pub experiences: Vec<ParsedExperience>,
    #[serde(default)]
    pub education: Vec<ParsedEducation>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Validates size and type, then extracts text from the PDF bytes.
pub fn extract_pdf_text(bytes: &[u8], content_type: Option<&str>) -> Result<String, AppError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(
            "Resume file exceeds the 10MB limit".to_string(),
        ));
    }
    if !matches!(content_type, Some("application/pdf")) {
        return Err(AppError::Validation(
            "Only PDF files are allowed".to_string(),
        ));
    }
    // Magic-number check; browsers occasionally mislabel content types.
    if !bytes.starts_with(b"%PDF") {
        return Err(AppError::Validation(
            "File does not appear to be a valid PDF".to_string(),
        ));
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the PDF".to_string(),
        ));
    }
    Ok(text)
}

/// Asks the LLM to structure extracted text. On failure the caller still
/// gets the raw text with empty sections.
pub async fn structure_resume_text(text: &str, llm: &LlmClient) -> ParsedResume {
    let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace("{text}", text);
    match llm.call_json::<ParsedResume>(&prompt, RESUME_PARSE_SYSTEM).await {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("resume structuring failed, returning raw text only: {e}");
            ParsedResume::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_oversized_upload() {
        let bytes = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let err = extract_pdf_text(&bytes, Some("application/pdf")).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_rejects_non_pdf_content_type() {
        let err = extract_pdf_text(b"%PDF-1.4", Some("application/msword")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_missing_content_type() {
        assert!(extract_pdf_text(b"%PDF-1.4", None).is_err());
    }

    #[test]
    fn test_rejects_wrong_magic_number() {
        let err = extract_pdf_text(b"PK\x03\x04 not a pdf", Some("application/pdf")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_parsed_resume_tolerates_missing_sections() {
        let json = r#"{"personal_info": {"name": "Jane Doe", "email": null,
            "phone": null, "linkedin": null, "address": null}}"#;
        let parsed: ParsedResume = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.personal_info.name.as_deref(), Some("Jane Doe"));
        assert!(parsed.experiences.is_empty());
        assert!(parsed.skills.is_empty());
    }

    #[test]
    fn test_parsed_resume_full_shape() {
        let json = r#"{
            "personal_info": {"name": "Jane", "email": "j@x.y", "phone": null,
                              "linkedin": null, "address": null},
            "experiences": [{"title": "Dev", "company": "Acme",
                             "description": null,
                             "start_date": "2020-01-01", "end_date": null}],
            "education": [{"school": "MIT", "degree": "BSc",
                           "field_of_study": null,
                           "start_date": "2014-09-01", "end_date": "2018-06-01"}],
            "skills": ["Python"]
        }"#;
        let parsed: ParsedResume = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.experiences.len(), 1);
        assert_eq!(parsed.education[0].school, "MIT");
        assert_eq!(parsed.skills, vec!["Python"]);
    }
}
