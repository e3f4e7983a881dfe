//! Answer evaluation: pluggable, trait-based scorer for a single answer.
//!
//! Default: `KeywordEvaluator` (pure-Rust, deterministic score, no network).
//! With a grading credential: `LlmEvaluator`, which never lets a remote failure escape.
//!
//! `AppState` holds an `Arc<dyn AnswerEvaluator>`, chosen once at startup from config.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::llm_client::{LlmClient, LlmError};
use crate::questions::Question;

pub mod keyword;
pub mod llm;
pub mod prompts;

pub use keyword::KeywordEvaluator;
pub use llm::LlmEvaluator;

pub const NO_ANSWER_FEEDBACK: &str = "No answer provided.";

/// Normalized result of grading one answer. Every evaluator returns all three fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// 0 – 100
    pub score: u32,
    pub feedback: String,
    pub missing_concepts: Vec<String>,
}

impl Evaluation {
    /// The record for a blank answer: zero score, every concept missing.
    pub fn no_answer(question: &Question) -> Self {
        Self {
            score: 0,
            feedback: NO_ANSWER_FEEDBACK.to_string(),
            missing_concepts: question.expected_concepts.clone(),
        }
    }
}

/// The evaluator trait. Implement this to swap grading backends without touching the
/// interview state machine.
#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    /// Grades `answer` against the question's expected concepts. Infallible by contract.
    async fn evaluate(&self, question: &Question, answer: &str) -> Evaluation;

    /// "keyword" or "llm", reported in session snapshots.
    fn backend(&self) -> &'static str;
}

/// Remote grading when a credential is configured, keyword coverage otherwise.
/// Without a credential no HTTP client is built at all.
pub fn evaluator_from_config(config: &Config) -> Result<Arc<dyn AnswerEvaluator>, LlmError> {
    match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(
                key.clone(),
                config.grading_api_url.clone(),
                config.grading_timeout,
            )?;
            Ok(Arc::new(LlmEvaluator::new(llm)))
        }
        None => Ok(Arc::new(KeywordEvaluator::new())),
    }
}
