use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::AnswerEvaluator;
use crate::interview::{SessionContext, SessionStore};
use crate::mail::Mailer;
use crate::questions::QuestionBank;
use crate::skills::ExtractOptions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable answer grader. Keyword coverage unless a grading credential is configured.
    pub evaluator: Arc<dyn AnswerEvaluator>,
    /// SMTP relay, or `DisabledMailer` when none is configured.
    pub mailer: Arc<dyn Mailer>,
    pub bank: Arc<QuestionBank>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        config: Config,
        evaluator: Arc<dyn AnswerEvaluator>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            evaluator,
            mailer,
            bank: Arc::new(QuestionBank::builtin()),
            sessions: SessionStore::new(),
        }
    }

    /// Collaborators for one state-machine turn.
    pub fn session_context(&self) -> SessionContext<'_> {
        SessionContext {
            evaluator: self.evaluator.as_ref(),
            bank: self.bank.as_ref(),
            extract: ExtractOptions {
                require_context_cue: self.config.skill_context_cues,
            },
        }
    }
}
