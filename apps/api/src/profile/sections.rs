//! Positional edits on the JSON array sections of a profile row.
//!
//! The profile stores education, experience, skills, projects and
//! achievements as JSON arrays edited by index. These functions are pure so
//! the index and shape rules are testable without a database.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SectionError {
    #[error("Invalid {0} index")]
    InvalidIndex(&'static str),

    #[error("Skill already exists")]
    DuplicateSkill,

    #[error("Skill is required and must be a string")]
    InvalidSkill,
}

/// Education entry as stored inside the profile's education array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Experience entry as stored inside the profile's experience array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub responsibilities: Vec<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

fn as_array(section: &Value) -> Vec<Value> {
    section.as_array().cloned().unwrap_or_default()
}

/// Appends an entry, tolerating a section that is not yet an array.
pub fn push_entry(section: &Value, entry: Value) -> Value {
    let mut arr = as_array(section);
    arr.push(entry);
    Value::Array(arr)
}

/// Replaces the entry at `index`, failing on out-of-range positions.
pub fn replace_entry(
    section: &Value,
    index: usize,
    entry: Value,
    name: &'static str,
) -> Result<Value, SectionError> {
    let mut arr = as_array(section);
    if index >= arr.len() {
        return Err(SectionError::InvalidIndex(name));
    }
    arr[index] = entry;
    Ok(Value::Array(arr))
}

/// Removes the entry at `index`, failing on out-of-range positions.
pub fn remove_entry(
    section: &Value,
    index: usize,
    name: &'static str,
) -> Result<Value, SectionError> {
    let mut arr = as_array(section);
    if index >= arr.len() {
        return Err(SectionError::InvalidIndex(name));
    }
    arr.remove(index);
    Ok(Value::Array(arr))
}

/// Adds a skill string, rejecting exact duplicates (case-sensitive).
pub fn add_skill(section: &Value, skill: &str) -> Result<Value, SectionError> {
    if skill.is_empty() {
        return Err(SectionError::InvalidSkill);
    }
    let arr = as_array(section);
    if arr.iter().any(|v| v.as_str() == Some(skill)) {
        return Err(SectionError::DuplicateSkill);
    }
    Ok(push_entry(section, Value::String(skill.to_string())))
}

/// Replaces the skill at `index`, rejecting duplicates elsewhere in the list.
pub fn replace_skill(section: &Value, index: usize, skill: &str) -> Result<Value, SectionError> {
    if skill.is_empty() {
        return Err(SectionError::InvalidSkill);
    }
    let arr = as_array(section);
    if index >= arr.len() {
        return Err(SectionError::InvalidIndex("skill"));
    }
    let duplicate = arr
        .iter()
        .enumerate()
        .any(|(i, v)| i != index && v.as_str() == Some(skill));
    if duplicate {
        return Err(SectionError::DuplicateSkill);
    }
    replace_entry(section, index, Value::String(skill.to_string()), "skill")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_entry_onto_empty_section() {
        let section = json!([]);
        let updated = push_entry(&section, json!({"school": "MIT"}));
        assert_eq!(updated.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_push_entry_coerces_non_array() {
        // A null/missing section becomes a one-element array
        let updated = push_entry(&Value::Null, json!({"title": "Engineer"}));
        assert_eq!(updated.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_replace_entry_in_range() {
        let section = json!([{"school": "A"}, {"school": "B"}]);
        let updated = replace_entry(&section, 1, json!({"school": "C"}), "education").unwrap();
        assert_eq!(updated[1]["school"], "C");
        assert_eq!(updated[0]["school"], "A");
    }

    #[test]
    fn test_replace_entry_out_of_range() {
        let section = json!([{"school": "A"}]);
        let err = replace_entry(&section, 1, json!({}), "education").unwrap_err();
        assert_eq!(err, SectionError::InvalidIndex("education"));
    }

    #[test]
    fn test_remove_entry() {
        let section = json!(["a", "b", "c"]);
        let updated = remove_entry(&section, 1, "skill").unwrap();
        assert_eq!(updated, json!(["a", "c"]));
    }

    #[test]
    fn test_remove_entry_out_of_range() {
        let section = json!([]);
        assert!(remove_entry(&section, 0, "skill").is_err());
    }

    #[test]
    fn test_add_skill_rejects_duplicate() {
        let section = json!(["rust"]);
        assert_eq!(add_skill(&section, "rust").unwrap_err(), SectionError::DuplicateSkill);
    }

    #[test]
    fn test_add_skill_appends() {
        let section = json!(["rust"]);
        let updated = add_skill(&section, "sql").unwrap();
        assert_eq!(updated, json!(["rust", "sql"]));
    }

    #[test]
    fn test_add_skill_rejects_empty() {
        assert_eq!(add_skill(&json!([]), "").unwrap_err(), SectionError::InvalidSkill);
    }

    #[test]
    fn test_replace_skill_allows_same_position() {
        let section = json!(["rust", "sql"]);
        let updated = replace_skill(&section, 0, "rust").unwrap();
        assert_eq!(updated, json!(["rust", "sql"]));
    }

    #[test]
    fn test_replace_skill_rejects_duplicate_elsewhere() {
        let section = json!(["rust", "sql"]);
        assert_eq!(
            replace_skill(&section, 0, "sql").unwrap_err(),
            SectionError::DuplicateSkill
        );
    }

    #[test]
    fn test_education_entry_serializes_without_empty_field_of_study() {
        let entry = EducationEntry {
            school: "MIT".to_string(),
            degree: "BSc".to_string(),
            field_of_study: None,
            start_date: "2018-09-01".to_string(),
            end_date: None,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("field_of_study").is_none());
        assert_eq!(value["end_date"], Value::Null);
    }
}
