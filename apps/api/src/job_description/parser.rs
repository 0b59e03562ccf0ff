//! Job-description extraction: LLM-backed with static fallback defaults so a
//! provider failure never blocks saving the posting.

use serde::{Deserialize, Serialize};

use crate::job_description::prompts::{JD_PARSE_PROMPT_TEMPLATE, JD_PARSE_SYSTEM};
use crate::llm_client::LlmClient;

/// Structured extraction stored alongside the raw posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedJobDescription {
    pub skills: Vec<String>,
    pub experience_level: String,
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

impl ParsedJobDescription {
    /// Defaults used when the LLM call fails or returns malformed JSON.
    pub fn fallback() -> Self {
        ParsedJobDescription {
            skills: vec![],
            experience_level: "Not specified".to_string(),
            responsibilities: vec![],
            questions: vec![],
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.skills.is_empty()
            && self.responsibilities.is_empty()
            && self.experience_level == "Not specified"
    }
}

/// Extracts structure from a raw posting. Provider or parse failures are
/// logged and downgraded to `fallback()`.
pub async fn parse_job_description(content: &str, llm: &LlmClient) -> ParsedJobDescription {
    let prompt = JD_PARSE_PROMPT_TEMPLATE.replace("{content}", content);
    match llm
        .call_json::<ParsedJobDescription>(&prompt, JD_PARSE_SYSTEM)
        .await
    {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("JD extraction failed, storing fallback defaults: {e}");
            ParsedJobDescription::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_jd_deserializes() {
        let json = r#"{
            "skills": ["Rust", "PostgreSQL"],
            "experience_level": "Senior",
            "responsibilities": ["Own the API layer"],
            "questions": ["Describe a service you scaled"]
        }"#;
        let parsed: ParsedJobDescription = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.skills.len(), 2);
        assert_eq!(parsed.experience_level, "Senior");
        assert!(!parsed.is_fallback());
    }

    #[test]
    fn test_questions_field_is_optional() {
        let json = r#"{
            "skills": ["Go"],
            "experience_level": "Mid",
            "responsibilities": ["Ship features"]
        }"#;
        let parsed: ParsedJobDescription = serde_json::from_str(json).unwrap();
        assert!(parsed.questions.is_empty());
    }

    #[test]
    fn test_fallback_shape() {
        let fb = ParsedJobDescription::fallback();
        assert!(fb.is_fallback());
        assert_eq!(fb.experience_level, "Not specified");
    }

    #[test]
    fn test_extra_fields_rejected_by_schema_is_not_required() {
        // The LLM sometimes adds fields; deserialization must tolerate them.
        let json = r#"{
            "skills": [],
            "experience_level": "Junior",
            "responsibilities": [],
            "questions": [],
            "confidence": 0.9
        }"#;
        assert!(serde_json::from_str::<ParsedJobDescription>(json).is_ok());
    }
}
