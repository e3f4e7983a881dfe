//! Keyword-coverage evaluator.
//!
//! score = min(matched / total, 1.0) × 100, rounded. A concept is matched when it occurs
//! in the answer as a case-insensitive substring. An empty concept list counts as full
//! coverage. Feedback wording is drawn from a per-band phrase set using the injected RNG;
//! the score never depends on it.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::evaluation::{AnswerEvaluator, Evaluation};
use crate::questions::Question;

const POSITIVE_FEEDBACK: &[&str] = &[
    "Excellent answer! You covered the key concepts well.",
    "Great job! Your answer shows a solid understanding of the topic.",
    "Very good response that hits the important points.",
];

const AVERAGE_FEEDBACK: &[&str] = &[
    "Good answer, but some concepts could be explained in more depth.",
    "Decent response. A few important points are missing.",
    "You are on the right track; expand on the remaining concepts.",
];

const NEEDS_IMPROVEMENT_FEEDBACK: &[&str] = &[
    "Your answer needs improvement. Try to cover more of the key concepts.",
    "This answer misses several important points. Review the topic and try again.",
    "Consider structuring your answer around the core concepts of the question.",
];

/// Result of comparing an answer against expected concepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    pub score: u32,
    pub missing: Vec<String>,
}

/// Pure coverage computation. Deterministic for a given input.
pub fn compute_coverage(expected_concepts: &[String], answer: &str) -> Coverage {
    if expected_concepts.is_empty() {
        return Coverage {
            score: 100,
            missing: vec![],
        };
    }

    let answer_lower = answer.to_lowercase();
    let missing: Vec<String> = expected_concepts
        .iter()
        .filter(|concept| !answer_lower.contains(&concept.to_lowercase()))
        .cloned()
        .collect();

    let matched = expected_concepts.len() - missing.len();
    let ratio = (matched as f64 / expected_concepts.len() as f64).min(1.0);

    Coverage {
        score: (ratio * 100.0).round() as u32,
        missing,
    }
}

/// Picks band feedback and appends the missing concepts, if any.
pub fn band_feedback<R: Rng + ?Sized>(score: u32, missing: &[String], rng: &mut R) -> String {
    let phrases = if score >= 80 {
        POSITIVE_FEEDBACK
    } else if score >= 60 {
        AVERAGE_FEEDBACK
    } else {
        NEEDS_IMPROVEMENT_FEEDBACK
    };
    let base = phrases.choose(rng).copied().unwrap_or(phrases[0]);

    if missing.is_empty() {
        base.to_string()
    } else {
        format!("{base} Consider discussing: {}.", missing.join(", "))
    }
}

/// Local evaluator. Holds its own RNG so feedback wording can be pinned in tests.
pub struct KeywordEvaluator {
    rng: Mutex<StdRng>,
}

impl KeywordEvaluator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Synchronous core of `evaluate`.
    pub fn grade(&self, question: &Question, answer: &str) -> Evaluation {
        if answer.trim().is_empty() {
            return Evaluation::no_answer(question);
        }
        let coverage = compute_coverage(&question.expected_concepts, answer);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let feedback = band_feedback(coverage.score, &coverage.missing, &mut *rng);
        Evaluation {
            score: coverage.score,
            feedback,
            missing_concepts: coverage.missing,
        }
    }
}

impl Default for KeywordEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerEvaluator for KeywordEvaluator {
    async fn evaluate(&self, question: &Question, answer: &str) -> Evaluation {
        self.grade(question, answer)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}
