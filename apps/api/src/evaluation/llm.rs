//! Remote evaluator: grades through the LLM client, normalizes whatever comes back.
//!
//! Failure handling: a transport error, non-2xx status, empty content or unparseable
//! payload all produce `fallback_evaluation()` (score 50). Blank answers never reach
//! the network.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::evaluation::prompts::{build_grade_prompt, GRADE_SYSTEM};
use crate::evaluation::{AnswerEvaluator, Evaluation};
use crate::llm_client::LlmClient;
use crate::questions::Question;

pub const FALLBACK_SCORE: u32 = 50;
pub const FALLBACK_FEEDBACK: &str =
    "Unable to parse the evaluation response. A neutral score was recorded for this answer.";

pub struct LlmEvaluator {
    llm: LlmClient,
}

impl LlmEvaluator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AnswerEvaluator for LlmEvaluator {
    async fn evaluate(&self, question: &Question, answer: &str) -> Evaluation {
        if answer.trim().is_empty() {
            return Evaluation::no_answer(question);
        }

        let prompt = build_grade_prompt(&question.text, &question.expected_concepts, answer);
        match self.llm.call_json::<Value>(&prompt, GRADE_SYSTEM).await {
            Ok(payload) => {
                debug!("Remote grading returned payload for '{}'", question.text);
                normalize_payload(&payload)
            }
            Err(e) => {
                warn!("Remote grading failed, using fallback evaluation: {e}");
                fallback_evaluation()
            }
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

pub fn fallback_evaluation() -> Evaluation {
    Evaluation {
        score: FALLBACK_SCORE,
        feedback: FALLBACK_FEEDBACK.to_string(),
        missing_concepts: vec![],
    }
}

/// Coerces a grading payload into an `Evaluation`.
///
/// - `score`: number or numeric string, clamped to 0–100 and rounded; absent → 50
/// - `feedback`: string; absent or blank → the fallback wording
/// - `missing_concepts`: array of strings (non-strings dropped) or a single string
/// A payload that is not an object is treated as unparseable.
pub fn normalize_payload(payload: &Value) -> Evaluation {
    let Some(object) = payload.as_object() else {
        warn!("Remote grading payload is not a JSON object");
        return fallback_evaluation();
    };

    let score = match object.get("score") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches("/100").trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|s| s.is_finite())
    .map(|s| s.clamp(0.0, 100.0).round() as u32)
    .unwrap_or(FALLBACK_SCORE);

    let feedback = object
        .get("feedback")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_FEEDBACK)
        .to_string();

    let missing_concepts = match object.get("missing_concepts") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => vec![],
    };

    Evaluation {
        score,
        feedback,
        missing_concepts,
    }
}
