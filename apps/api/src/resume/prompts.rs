// LLM prompt constants for resume generation and uploaded-resume parsing.

/// System prompt for tailored bullet generation; enforces JSON-only output.
pub const GENERATION_SYSTEM: &str =
    "You are a resume AI assistant. \
    Based on a user's real experience and a target job description, you write \
    tailored, ATS-friendly resume content. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent employers, titles, or dates not present in the input.";

/// Per-experience generation template.
/// Replace: {keywords}, {responsibilities}, {questions}, {title}, {company},
///          {start_date}, {end_date}, {description}, {user_responsibilities},
///          {user_skills}, {education}
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"Generate a structured JSON object for one job experience, tailored to the target job description.

Return your output in valid JSON only. No extra commentary.

Format:
{
  "sections": [
    {
      "jobTitle": "Frontend Developer",
      "company": "PixelCraft Inc",
      "bullets": [
        "Built 20+ scalable UI components using React and Tailwind CSS, reducing load times by 30%",
        "Collaborated with backend engineers to integrate REST APIs",
        "Optimized performance with lazy loading and memoization"
      ]
    }
  ]
}

Rules:
- 3-4 bullets, each a full sentence in ATS-friendly language
- Weave in terminology from the job description where the user's experience genuinely supports it
- Keep jobTitle and company exactly as given in the user experience

Job Description Keywords:
{keywords}

Job Responsibilities:
{responsibilities}

Screening Questions:
{questions}

User Experience:
- Title: {title}
- Company: {company}
- Duration: {start_date} to {end_date}
- Description: {description}
- Responsibilities:
{user_responsibilities}

User Skills:
{user_skills}

Education:
{education}"#;

/// System prompt for structuring an uploaded resume's extracted text.
pub const RESUME_PARSE_SYSTEM: &str =
    "You are a resume parsing assistant. \
    Convert raw resume text into structured JSON. \
    You MUST respond with valid JSON only. \
    Do NOT use markdown code fences. \
    Use null for fields that are not present in the text.";

/// Uploaded-resume structuring template. Replace `{text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Structure the following resume text.

Return a JSON object with this EXACT schema:
{
  "personal_info": {
    "name": "Jane Doe",
    "email": "jane@example.com",
    "phone": null,
    "linkedin": null,
    "address": null
  },
  "experiences": [
    {
      "title": "Software Engineer",
      "company": "Acme",
      "description": null,
      "start_date": "2020-01-01",
      "end_date": null
    }
  ],
  "education": [
    {
      "school": "State University",
      "degree": "BSc",
      "field_of_study": "Computer Science",
      "start_date": "2014-09-01",
      "end_date": "2018-06-01"
    }
  ],
  "skills": ["Python", "SQL"]
}

Dates must be ISO (YYYY-MM-DD); approximate the day as 01 when only month/year is given. An ongoing position has "end_date": null.

RESUME TEXT:
{text}"#;
