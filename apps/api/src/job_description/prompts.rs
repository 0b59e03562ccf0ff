// LLM prompt constants for job-description extraction.

/// System prompt; enforces JSON-only output.
pub const JD_PARSE_SYSTEM: &str =
    "You are an expert job description analyst. \
    Extract structured hiring requirements from a job posting. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Extraction prompt template. Replace `{content}` before sending.
pub const JD_PARSE_PROMPT_TEMPLATE: &str = r#"Extract structured information from the following job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": ["React", "TypeScript", "REST APIs"],
  "experience_level": "3+ years",
  "responsibilities": ["Build and maintain frontend features"],
  "questions": ["Tell us about a UI you shipped end to end"]
}

Rules:
- "skills": every technical, soft, or industry-specific skill the posting asks for
- "experience_level": the required level as written (e.g. "3+ years", "Entry-level", "Senior"); use "Not specified" if absent
- "responsibilities": the key duties of the role, one string each
- "questions": 3-5 screening questions a recruiter for this role would ask

JOB DESCRIPTION:
{content}"#;
