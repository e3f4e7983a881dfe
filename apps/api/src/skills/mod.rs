// Skill extraction: resume text → categorized skill keywords.
// Pure and synchronous. Never fails; unmatched input yields an empty SkillSet.

pub mod extractor;
pub mod models;
pub mod vocabulary;

pub use extractor::{extract_skills, parse_skill_list, ExtractOptions};
pub use models::{SkillCategory, SkillSet};
