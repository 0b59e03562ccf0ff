//! AI resume generation: one LLM call per stored experience, tailored to the
//! parsed job description, aggregated into a single resume document.
//!
//! A failed call for one experience degrades to a section built from the
//! stored responsibilities, so generation never fails because of the model.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::job_description::handlers::find_owned;
use crate::job_description::parser::ParsedJobDescription;
use crate::llm_client::LlmClient;
use crate::models::profile::{EducationRow, ExperienceRow, SkillRow};
use crate::models::resume::ResumeRow;
use crate::resume::prompts::{EXPERIENCE_PROMPT_TEMPLATE, GENERATION_SYSTEM};

/// One generated resume section; field names match the stored JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSection {
    pub job_title: String,
    pub company: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SectionsEnvelope {
    sections: Vec<GeneratedSection>,
}

/// Full generation pipeline: load the JD and the user's normalized sections,
/// generate tailored bullets per experience, persist the assembled document.
pub async fn generate_resume(
    db: &sqlx::PgPool,
    llm: &LlmClient,
    user_id: Uuid,
    job_description_id: Uuid,
) -> Result<ResumeRow, AppError> {
    let job = find_owned(db, job_description_id, user_id).await?;
    let parsed: ParsedJobDescription = job
        .parsed_data
        .as_ref()
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_else(ParsedJobDescription::fallback);

    let experiences = sqlx::query_as::<_, ExperienceRow>(
        "SELECT * FROM experiences WHERE user_id = $1 ORDER BY start_date DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    if experiences.is_empty() {
        return Err(AppError::Validation(
            "Add at least one experience before generating a resume".to_string(),
        ));
    }

    let education = sqlx::query_as::<_, EducationRow>(
        "SELECT * FROM educations WHERE user_id = $1 ORDER BY start_date DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    let skills = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;

    let skills_line = skills.map(|s| s.flattened().join(", ")).unwrap_or_default();
    let education_block = format_education(&education);

    let mut sections: Vec<GeneratedSection> = Vec::with_capacity(experiences.len());
    for exp in &experiences {
        sections.extend(generate_for_experience(llm, exp, &parsed, &skills_line, &education_block).await);
    }

    let document = json!({ "sections": sections });

    let resume: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (user_id, job_description_id, template, output_format, json_data)
        VALUES ($1, $2, 'ai', 'json', $3)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(job_description_id)
    .bind(document)
    .fetch_one(db)
    .await?;

    tracing::info!(
        resume_id = %resume.id,
        sections = sections_count(&resume),
        "AI resume generated"
    );
    Ok(resume)
}

fn sections_count(resume: &ResumeRow) -> usize {
    resume.json_data["sections"].as_array().map(Vec::len).unwrap_or(0)
}

async fn generate_for_experience(
    llm: &LlmClient,
    exp: &ExperienceRow,
    parsed: &ParsedJobDescription,
    skills_line: &str,
    education_block: &str,
) -> Vec<GeneratedSection> {
    let prompt = build_experience_prompt(exp, parsed, skills_line, education_block);
    match llm.call_json::<SectionsEnvelope>(&prompt, GENERATION_SYSTEM).await {
        Ok(envelope) if !envelope.sections.is_empty() => envelope.sections,
        Ok(_) => {
            tracing::warn!(experience_id = %exp.id, "LLM returned no sections, using fallback");
            vec![fallback_section(exp)]
        }
        Err(e) => {
            tracing::warn!(experience_id = %exp.id, "generation failed, using fallback: {e}");
            vec![fallback_section(exp)]
        }
    }
}

fn build_experience_prompt(
    exp: &ExperienceRow,
    parsed: &ParsedJobDescription,
    skills_line: &str,
    education_block: &str,
) -> String {
    EXPERIENCE_PROMPT_TEMPLATE
        .replace("{keywords}", &parsed.skills.join(", "))
        .replace("{responsibilities}", &parsed.responsibilities.join("\n"))
        .replace("{questions}", &parsed.questions.join("\n"))
        .replace("{title}", &exp.title)
        .replace("{company}", &exp.company)
        .replace("{start_date}", &exp.start_date.to_string())
        .replace(
            "{end_date}",
            &exp.end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "Present".to_string()),
        )
        .replace("{description}", exp.description.as_deref().unwrap_or(""))
        .replace("{user_responsibilities}", &exp.responsibilities_list().join("\n"))
        .replace("{user_skills}", skills_line)
        .replace("{education}", education_block)
}

/// Static fallback: the stored responsibilities become the bullets.
fn fallback_section(exp: &ExperienceRow) -> GeneratedSection {
    let mut bullets: Vec<String> = exp.responsibilities_list().into_iter().take(4).collect();
    if bullets.is_empty() {
        if let Some(desc) = exp.description.as_deref().filter(|d| !d.trim().is_empty()) {
            bullets.push(desc.trim().to_string());
        } else {
            bullets.push(format!("{} at {}", exp.title, exp.company));
        }
    }
    GeneratedSection {
        job_title: exp.title.clone(),
        company: exp.company.clone(),
        bullets,
    }
}

fn format_education(education: &[EducationRow]) -> String {
    education
        .iter()
        .map(|e| {
            format!(
                "- {} in {} from {} ({} - {})",
                e.degree,
                e.field_of_study.as_deref().unwrap_or(""),
                e.school,
                e.start_date,
                e.end_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "Present".to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn sample_experience() -> ExperienceRow {
        ExperienceRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            description: Some("Worked on the billing platform".to_string()),
            responsibilities: json!(["Owned invoicing service", "Mentored two juniors"]),
            start_date: NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
            end_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fallback_section_uses_responsibilities() {
        let section = fallback_section(&sample_experience());
        assert_eq!(section.job_title, "Backend Engineer");
        assert_eq!(section.bullets.len(), 2);
        assert_eq!(section.bullets[0], "Owned invoicing service");
    }

    #[test]
    fn test_fallback_section_uses_description_when_no_responsibilities() {
        let mut exp = sample_experience();
        exp.responsibilities = json!([]);
        let section = fallback_section(&exp);
        assert_eq!(section.bullets, vec!["Worked on the billing platform"]);
    }

    #[test]
    fn test_fallback_section_never_empty() {
        let mut exp = sample_experience();
        exp.responsibilities = json!([]);
        exp.description = None;
        let section = fallback_section(&exp);
        assert_eq!(section.bullets, vec!["Backend Engineer at Acme"]);
    }

    #[test]
    fn test_fallback_caps_bullets_at_four() {
        let mut exp = sample_experience();
        exp.responsibilities = json!(["a", "b", "c", "d", "e", "f"]);
        assert_eq!(fallback_section(&exp).bullets.len(), 4);
    }

    #[test]
    fn test_prompt_substitutes_placeholders() {
        let exp = sample_experience();
        let parsed = ParsedJobDescription {
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            experience_level: "Senior".to_string(),
            responsibilities: vec!["Own the API".to_string()],
            questions: vec![],
        };
        let prompt = build_experience_prompt(&exp, &parsed, "Rust, SQL", "- BSc from MIT");
        assert!(prompt.contains("Rust, SQL"));
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("2021-02-01 to Present"));
        assert!(!prompt.contains("{title}"));
        assert!(!prompt.contains("{education}"));
    }

    #[test]
    fn test_generated_section_uses_camel_case() {
        let section = GeneratedSection {
            job_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            bullets: vec![],
        };
        let value = serde_json::to_value(&section).unwrap();
        assert!(value.get("jobTitle").is_some());
        assert!(value.get("job_title").is_none());
    }

    #[test]
    fn test_format_education_with_open_end_date() {
        let education = vec![EducationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            school: "MIT".to_string(),
            degree: "BSc".to_string(),
            field_of_study: Some("CS".to_string()),
            start_date: NaiveDate::from_ymd_opt(2019, 9, 1).unwrap(),
            end_date: None,
            created_at: Utc::now(),
        }];
        let block = format_education(&education);
        assert_eq!(block, "- BSc in CS from MIT (2019-09-01 - Present)");
    }
}
