//! Normalized resume-section tables: experiences, educations and the
//! categorized skill map. These rows are what AI generation reads.

pub mod education;
pub mod experience;
pub mod skills;
