//! Keyword extractor: whole-word matching of the static vocabulary against free text.
//!
//! Keywords may contain `+`, `#` and `.` (`c++`, `c#`, `node.js`, `.net`), so word
//! boundaries are spelled out instead of relying on `\b`:
//! - before a keyword: start of text or a char that is not `[a-z0-9+#.]`
//! - after a keyword: end of text or a char that is not `[a-z0-9+#]`
//!
//! A trailing `.` is allowed after a keyword so sentence ends still match, but a leading
//! one is not, which keeps `asp.net` from reporting `.net`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::skills::models::{SkillCategory, SkillSet};
use crate::skills::vocabulary::{keywords_for, CONTEXT_CUES};

/// Matching policy for one extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Only count keywords that share a line or sentence with a context cue.
    pub require_context_cue: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            require_context_cue: true,
        }
    }
}

struct KeywordMatcher {
    category: SkillCategory,
    keyword: &'static str,
    pattern: Regex,
}

static MATCHERS: Lazy<Vec<KeywordMatcher>> = Lazy::new(|| {
    SkillCategory::ALL
        .iter()
        .flat_map(|&category| {
            keywords_for(category).iter().filter_map(move |&keyword| {
                phrase_pattern(keyword).map(|pattern| KeywordMatcher {
                    category,
                    keyword,
                    pattern,
                })
            })
        })
        .collect()
});

static CUE_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| CONTEXT_CUES.iter().filter_map(|cue| phrase_pattern(cue)).collect());

/// Line breaks and sentence-ending punctuation followed by whitespace.
static SEGMENT_BREAK: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\n|[.!?;](?:\s|$)").ok());

fn phrase_pattern(phrase: &str) -> Option<Regex> {
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!(r"(?:^|[^a-z0-9+#.]){body}(?:$|[^a-z0-9+#])")).ok()
}

/// Extracts categorized skills from resume text.
///
/// Empty or whitespace-only input yields an empty set. Categories with no match are
/// omitted. Keywords come out in vocabulary order.
pub fn extract_skills(text: &str, options: ExtractOptions) -> SkillSet {
    let mut skills = SkillSet::new();
    let text = text.to_lowercase();
    if text.trim().is_empty() {
        return skills;
    }

    let segments: Vec<&str> = if options.require_context_cue {
        split_segments(&text)
            .into_iter()
            .filter(|segment| has_context_cue(segment))
            .collect()
    } else {
        vec![text.as_str()]
    };

    if segments.is_empty() {
        debug!("No context cue found in resume text");
        return skills;
    }

    for matcher in MATCHERS.iter() {
        if segments.iter().any(|s| matcher.pattern.is_match(s)) {
            skills.insert(matcher.category, matcher.keyword);
        }
    }

    debug!(
        "Extracted {} skill keywords from {} segments",
        skills.keyword_count(),
        segments.len()
    );
    skills
}

/// Parses a user-typed list of skills (`"rust, docker and aws"`). No context cue is required.
pub fn parse_skill_list(text: &str) -> SkillSet {
    extract_skills(
        text,
        ExtractOptions {
            require_context_cue: false,
        },
    )
}

fn split_segments(text: &str) -> Vec<&str> {
    match SEGMENT_BREAK.as_ref() {
        Some(re) => re
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect(),
        None => text.lines().collect(),
    }
}

fn has_context_cue(segment: &str) -> bool {
    CUE_PATTERNS.iter().any(|cue| cue.is_match(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::vocabulary::keywords_for;

    fn plain(text: &str) -> SkillSet {
        parse_skill_list(text)
    }

    #[test]
    fn test_empty_text_returns_empty_set() {
        assert!(extract_skills("", ExtractOptions::default()).is_empty());
        assert!(extract_skills("   \n\t", ExtractOptions::default()).is_empty());
    }

    #[test]
    fn test_python_and_aws_experience() {
        let skills =
            extract_skills("5 years of Python and AWS experience", ExtractOptions::default());
        assert_eq!(skills.get(SkillCategory::Programming), Some(&["python".to_string()][..]));
        assert_eq!(skills.get(SkillCategory::Cloud), Some(&["aws".to_string()][..]));
        assert_eq!(skills.keyword_count(), 2);
    }

    #[test]
    fn test_keyword_without_cue_is_ignored() {
        let text = "I once read a blog post about Kubernetes.\nSkills: Python";
        let skills = extract_skills(text, ExtractOptions::default());
        assert!(skills.contains(SkillCategory::Programming, "python"));
        assert!(skills.get(SkillCategory::Cloud).is_none());
    }

    #[test]
    fn test_cue_scope_is_one_sentence() {
        let text = "Worked with Docker daily. Enjoys hiking in Oracle state park";
        let skills = extract_skills(text, ExtractOptions::default());
        assert!(skills.contains(SkillCategory::Cloud, "docker"));
        assert!(skills.get(SkillCategory::Databases).is_none());
    }

    #[test]
    fn test_cues_disabled_matches_anywhere() {
        let skills = extract_skills(
            "Kubernetes clusters",
            ExtractOptions {
                require_context_cue: false,
            },
        );
        assert!(skills.contains(SkillCategory::Cloud, "kubernetes"));
    }

    #[test]
    fn test_whole_word_only() {
        let skills = plain("javascript, gopher, rusty, scalable");
        assert!(skills.contains(SkillCategory::Programming, "javascript"));
        assert!(!skills.contains(SkillCategory::Programming, "java"));
        assert!(!skills.contains(SkillCategory::Programming, "go"));
        assert!(!skills.contains(SkillCategory::Programming, "rust"));
        assert!(!skills.contains(SkillCategory::Programming, "scala"));
    }

    #[test]
    fn test_punctuated_keywords() {
        let skills = plain("C++, C# and Node.js services on .NET");
        assert!(skills.contains(SkillCategory::Programming, "c++"));
        assert!(skills.contains(SkillCategory::Programming, "c#"));
        assert!(skills.contains(SkillCategory::Frameworks, "node.js"));
        assert!(skills.contains(SkillCategory::Frameworks, ".net"));
        assert!(!skills.contains(SkillCategory::Programming, "c"));
    }

    #[test]
    fn test_dotted_prefix_does_not_leak() {
        let skills = plain("asp.net");
        assert!(!skills.contains(SkillCategory::Frameworks, ".net"));
    }

    #[test]
    fn test_keyword_at_sentence_end() {
        let skills = plain("my favourite language is rust.");
        assert!(skills.contains(SkillCategory::Programming, "rust"));
    }

    #[test]
    fn test_multi_word_phrase_spans_whitespace() {
        let skills = plain("Ruby  on\nRails and strong problem solving");
        assert!(skills.contains(SkillCategory::Frameworks, "ruby on rails"));
        assert!(skills.contains(SkillCategory::SoftSkills, "problem solving"));
    }

    #[test]
    fn test_sql_lands_in_both_categories() {
        let skills = plain("SQL");
        assert!(skills.contains(SkillCategory::Programming, "sql"));
        assert!(skills.contains(SkillCategory::Databases, "sql"));
    }

    #[test]
    fn test_only_vocabulary_keywords_are_returned() {
        let text = "Skills: Python, Haskell, Kafka, Docker, Elixir, leadership, Zig";
        let skills = extract_skills(text, ExtractOptions::default());
        for (category, keywords) in skills.iter() {
            for keyword in keywords {
                assert!(keywords_for(category).contains(&keyword.as_str()));
            }
        }
        assert_eq!(skills.keyword_count(), 3);
    }
}
