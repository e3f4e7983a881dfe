//! Question Selector: turns a SkillSet into an ordered, deduplicated question list.
//!
//! Algorithm:
//! 1. Flatten the SkillSet and count each keyword (a keyword listed under two
//!    categories counts twice).
//! 2. Rank keywords by descending count; ties keep first-seen order (stable sort).
//! 3. Take each ranked keyword's bank questions in declaration order.
//! 4. If still short of `max_questions`, add the generic pool in shuffled order.
//! 5. Dedup by question text and stop at `max_questions`.
//!
//! The result can be shorter than `max_questions` when the pools run out.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::questions::bank::{Question, QuestionBank};
use crate::skills::SkillSet;

pub fn select_questions<R: Rng + ?Sized>(
    skills: &SkillSet,
    bank: &QuestionBank,
    max_questions: usize,
    rng: &mut R,
) -> Vec<Question> {
    let ranked = rank_keywords(skills);
    let mut selected: Vec<Question> = Vec::with_capacity(max_questions);
    let mut seen: HashSet<String> = HashSet::new();

    for keyword in &ranked {
        for question in bank.for_skill(keyword) {
            if selected.len() >= max_questions {
                break;
            }
            if seen.insert(question.text.clone()) {
                selected.push(question.clone());
            }
        }
    }
    let from_skills = selected.len();

    if selected.len() < max_questions {
        let mut generic: Vec<&Question> = bank.generic().iter().collect();
        generic.shuffle(rng);
        for question in generic {
            if selected.len() >= max_questions {
                break;
            }
            if seen.insert(question.text.clone()) {
                selected.push(question.clone());
            }
        }
    }

    debug!(
        "Selected {} questions ({} skill-specific) from {} ranked skills",
        selected.len(),
        from_skills,
        ranked.len()
    );
    selected
}

/// Keywords ordered by descending frequency, first-seen order on ties.
pub fn rank_keywords(skills: &SkillSet) -> Vec<&str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for keyword in skills.flatten() {
        match counts.iter_mut().find(|(k, _)| *k == keyword) {
            Some((_, count)) => *count += 1,
            None => counts.push((keyword, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(k, _)| k).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillCategory;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn skills(entries: &[(SkillCategory, &str)]) -> SkillSet {
        let mut set = SkillSet::new();
        for (category, keyword) in entries {
            set.insert(*category, keyword);
        }
        set
    }

    #[test]
    fn test_python_only_two_questions_are_bank_order() {
        let bank = QuestionBank::builtin();
        let set = skills(&[(SkillCategory::Programming, "python")]);
        let selected = select_questions(&set, &bank, 2, &mut rng());
        let python = bank.for_skill("python");
        assert_eq!(selected, vec![python[0].clone(), python[1].clone()]);
    }

    #[test]
    fn test_empty_skills_returns_generic_only() {
        let bank = QuestionBank::builtin();
        let selected = select_questions(&SkillSet::new(), &bank, 5, &mut rng());
        assert_eq!(selected.len(), 5);
        assert!(selected.iter().all(|q| bank.generic().contains(q)));
    }

    #[test]
    fn test_length_capped_and_unique() {
        let bank = QuestionBank::builtin();
        let set = skills(&[
            (SkillCategory::Programming, "python"),
            (SkillCategory::Programming, "java"),
            (SkillCategory::Cloud, "aws"),
            (SkillCategory::Cloud, "docker"),
        ]);
        for max in 0..12 {
            let selected = select_questions(&set, &bank, max, &mut rng());
            assert!(selected.len() <= max);
            let mut texts: Vec<&str> = selected.iter().map(|q| q.text.as_str()).collect();
            texts.sort_unstable();
            texts.dedup();
            assert_eq!(texts.len(), selected.len());
        }
    }

    #[test]
    fn test_highest_frequency_skill_comes_first() {
        let bank = QuestionBank::builtin();
        let set = skills(&[
            (SkillCategory::Programming, "python"),
            (SkillCategory::Programming, "sql"),
            (SkillCategory::Databases, "sql"),
        ]);
        let selected = select_questions(&set, &bank, 4, &mut rng());
        let sql = bank.for_skill("sql");
        assert_eq!(selected[0], sql[0]);
        assert_eq!(selected[1], sql[1]);
        assert_eq!(selected[2], bank.for_skill("python")[0]);
    }

    #[test]
    fn test_rank_ties_keep_first_seen_order() {
        let set = skills(&[
            (SkillCategory::Programming, "rust"),
            (SkillCategory::Programming, "go"),
            (SkillCategory::Cloud, "aws"),
        ]);
        assert_eq!(rank_keywords(&set), vec!["rust", "go", "aws"]);
    }

    #[test]
    fn test_skill_questions_precede_generic_padding() {
        let bank = QuestionBank::builtin();
        let set = skills(&[(SkillCategory::Programming, "typescript")]);
        let selected = select_questions(&set, &bank, 4, &mut rng());
        assert_eq!(selected.len(), 4);
        assert_eq!(selected[0], bank.for_skill("typescript")[0]);
        assert!(selected[1..].iter().all(|q| bank.generic().contains(q)));
    }

    #[test]
    fn test_same_seed_same_selection() {
        let bank = QuestionBank::builtin();
        let a = select_questions(&SkillSet::new(), &bank, 6, &mut StdRng::seed_from_u64(42));
        let b = select_questions(&SkillSet::new(), &bank, 6, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_pools_return_fewer_than_max() {
        let bank = QuestionBank::from_parts(
            vec![("rust", vec![Question::new("Q1", &["a"])])],
            vec![Question::new("G1", &["b"]), Question::new("Q1", &["a"])],
        );
        let set = skills(&[(SkillCategory::Programming, "rust")]);
        let selected = select_questions(&set, &bank, 5, &mut rng());
        let texts: Vec<&str> = selected.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["Q1", "G1"]);
    }
}
