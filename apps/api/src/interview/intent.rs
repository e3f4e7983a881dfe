//! Intent parsing. Free text is classified once per turn; the state machine matches on
//! the resulting enum.

use crate::export::ExportFormat;
use crate::skills::{parse_skill_list, SkillSet};

/// What the user means while reviewing extracted skills.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmIntent {
    /// Begin now, after merging any skills named in the same message.
    StartInterview(SkillSet),
    AddSkills(SkillSet),
    Unrecognized,
}

/// What the user means once the interview is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompleteIntent {
    Review,
    Export(ExportFormat),
    NewSession,
    Unrecognized,
}

pub fn parse_confirm_intent(text: &str) -> ConfirmIntent {
    let lower = text.to_lowercase();
    let words = words(&lower);

    let skills = parse_skill_list(text);
    if lower.contains("start interview")
        || words.iter().any(|w| matches!(*w, "ready" | "yes"))
    {
        // "yes, let's go" must not add Go; only an explicit add carries skills along.
        let adding = words
            .iter()
            .any(|w| matches!(*w, "add" | "also" | "plus" | "include"));
        return ConfirmIntent::StartInterview(if adding { skills } else { SkillSet::new() });
    }

    if skills.is_empty() {
        ConfirmIntent::Unrecognized
    } else {
        ConfirmIntent::AddSkills(skills)
    }
}

pub fn parse_complete_intent(text: &str) -> CompleteIntent {
    let lower = text.to_lowercase();
    let words = words(&lower);
    let has = |w: &str| words.contains(&w);

    let reset_phrase = ["new session", "new interview", "start over"]
        .iter()
        .any(|p| lower.contains(p));
    if reset_phrase || has("restart") {
        CompleteIntent::NewSession
    } else if has("pdf") {
        CompleteIntent::Export(ExportFormat::Pdf)
    } else if has("json") {
        CompleteIntent::Export(ExportFormat::Json)
    } else if has("text") || has("txt") {
        CompleteIntent::Export(ExportFormat::Text)
    } else if has("summary") || has("detailed") || has("markdown") {
        CompleteIntent::Export(ExportFormat::Markdown)
    } else if has("review") || has("answers") {
        CompleteIntent::Review
    } else {
        CompleteIntent::Unrecognized
    }
}

fn words(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}
