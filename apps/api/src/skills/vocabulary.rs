//! Static skill vocabulary and context-cue phrases.

use crate::skills::models::SkillCategory;

/// Recognized keywords per category. All lowercase; multi-word entries are matched as phrases.
pub fn keywords_for(category: SkillCategory) -> &'static [&'static str] {
    match category {
        SkillCategory::Programming => PROGRAMMING,
        SkillCategory::Frameworks => FRAMEWORKS,
        SkillCategory::Databases => DATABASES,
        SkillCategory::Cloud => CLOUD,
        SkillCategory::Tools => TOOLS,
        SkillCategory::SoftSkills => SOFT_SKILLS,
    }
}

const PROGRAMMING: &[&str] = &[
    "python", "java", "javascript", "html", "css", "c++", "c#", "ruby", "php", "typescript",
    "sql", "r", "perl", "swift", "kotlin", "scala", "go", "rust",
];

const FRAMEWORKS: &[&str] = &[
    "react", "angular", "vue", "django", "flask", "spring", "node.js", "express", ".net",
    "laravel", "ruby on rails", "tensorflow", "pytorch",
];

const DATABASES: &[&str] = &[
    "sql", "mysql", "postgresql", "mongodb", "oracle", "sqlite", "cassandra", "redis",
    "elasticsearch", "dynamodb",
];

const CLOUD: &[&str] = &[
    "aws", "azure", "gcp", "google cloud", "cloud computing", "docker", "kubernetes",
    "serverless",
];

const TOOLS: &[&str] = &[
    "git", "github", "bitbucket", "jira", "confluence", "jenkins", "travis ci", "circle ci",
    "agile", "scrum", "kanban", "figma", "sketch",
];

const SOFT_SKILLS: &[&str] = &[
    "communication", "leadership", "teamwork", "problem solving", "critical thinking",
    "creativity", "time management", "project management",
];

/// Phrases that mark a line or sentence as describing the candidate's skills.
/// A keyword found in resume text only counts when one of these shares its segment.
pub const CONTEXT_CUES: &[&str] = &[
    "experience",
    "experienced",
    "skills",
    "skilled",
    "proficient",
    "proficiency",
    "knowledge",
    "familiar",
    "expertise",
    "expert",
    "worked with",
    "working with",
    "using",
    "technologies",
    "tech stack",
    "tools",
    "languages",
    "frameworks",
];

/// Fallback profile used when manual entry still yields nothing.
pub const SEED_SKILLS: &[(SkillCategory, &str)] = &[
    (SkillCategory::Programming, "python"),
    (SkillCategory::Tools, "git"),
    (SkillCategory::SoftSkills, "communication"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercase_and_trimmed() {
        for category in SkillCategory::ALL {
            for keyword in keywords_for(category) {
                assert_eq!(*keyword, keyword.to_lowercase());
                assert_eq!(*keyword, keyword.trim());
            }
        }
    }

    #[test]
    fn test_no_duplicates_within_a_category() {
        for category in SkillCategory::ALL {
            let list = keywords_for(category);
            for (i, keyword) in list.iter().enumerate() {
                assert!(!list[i + 1..].contains(keyword), "{keyword} repeated in {category}");
            }
        }
    }
}
