use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of skill categories. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Programming,
    Frameworks,
    Databases,
    Cloud,
    Tools,
    SoftSkills,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 6] = [
        SkillCategory::Programming,
        SkillCategory::Frameworks,
        SkillCategory::Databases,
        SkillCategory::Cloud,
        SkillCategory::Tools,
        SkillCategory::SoftSkills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Programming => "programming",
            Self::Frameworks => "frameworks",
            Self::Databases => "databases",
            Self::Cloud => "cloud",
            Self::Tools => "tools",
            Self::SoftSkills => "soft_skills",
        }
    }

    /// Human label used in exports, e.g. `Soft skills`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Programming => "Programming",
            Self::Frameworks => "Frameworks",
            Self::Databases => "Databases",
            Self::Cloud => "Cloud",
            Self::Tools => "Tools",
            Self::SoftSkills => "Soft skills",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skills recognized for one candidate, grouped by category.
///
/// Keywords keep their insertion order inside a category and are never duplicated
/// within it. The same keyword may live in two categories (`sql` is both a language
/// and a database skill); the question selector counts that as a higher frequency.
/// Empty categories are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet {
    categories: BTreeMap<SkillCategory, Vec<String>>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Adds a keyword (lowercased) to a category. Returns false if it was already there.
    pub fn insert(&mut self, category: SkillCategory, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return false;
        }
        let entry = self.categories.entry(category).or_default();
        if entry.contains(&keyword) {
            return false;
        }
        entry.push(keyword);
        true
    }

    /// Merges another set into this one. Returns the number of newly added keywords.
    pub fn merge(&mut self, other: &SkillSet) -> usize {
        let mut added = 0;
        for (category, keywords) in other.iter() {
            for keyword in keywords {
                if self.insert(category, keyword) {
                    added += 1;
                }
            }
        }
        added
    }

    pub fn get(&self, category: SkillCategory) -> Option<&[String]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    pub fn contains(&self, category: SkillCategory, keyword: &str) -> bool {
        self.get(category)
            .is_some_and(|keywords| keywords.iter().any(|k| k == keyword))
    }

    /// Iterates categories in display order with their keywords.
    pub fn iter(&self) -> impl Iterator<Item = (SkillCategory, &[String])> {
        self.categories.iter().map(|(c, k)| (*c, k.as_slice()))
    }

    /// Every keyword in category order, duplicates across categories included.
    pub fn flatten(&self) -> Vec<&str> {
        self.categories
            .values()
            .flat_map(|keywords| keywords.iter().map(String::as_str))
            .collect()
    }

    pub fn keyword_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.categories.clear();
    }

    /// Multi-line `Category: a, b` summary for chat replies.
    pub fn describe(&self) -> String {
        self.iter()
            .map(|(category, keywords)| format!("{}: {}", category.label(), keywords.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
