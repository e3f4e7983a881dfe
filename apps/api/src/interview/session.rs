//! Interview Session State Machine.
//!
//! # States
//! - `CollectingProfile` with sub-step `AwaitingResume` or `ManualSkillEntry`
//! - `ConfirmingSkills`
//! - `Interviewing`
//! - `Complete`
//!
//! # Invariants
//! - `answers` keys are question texts from `questions`
//! - `questions` has unique texts and `len() <= max_questions`
//! - `current_question_index` is in `0..=questions.len()`; equal to `len()` only when complete
//!
//! Every turn returns a `Reply`. Nothing here returns an error for ordinary input:
//! extraction and evaluation degrade to defaults, export failures become messages.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::evaluation::{AnswerEvaluator, Evaluation};
use crate::export::{self, Artifact, ExportFormat};
use crate::interview::intent::{
    parse_complete_intent, parse_confirm_intent, CompleteIntent, ConfirmIntent,
};
use crate::interview::scoring::{aggregate_score, Rating};
use crate::questions::{select_questions, Question, QuestionBank};
use crate::skills::vocabulary::SEED_SKILLS;
use crate::skills::{extract_skills, parse_skill_list, ExtractOptions, SkillSet};

pub const GREETING: &str =
    "Welcome! Upload your resume (PDF, DOCX or TXT) or paste its text to begin.";
const COMPLETE_MENU: &str = "What would you like to do next? You can:\n\
    - review your answers\n\
    - export as PDF\n\
    - export a detailed summary (markdown, json or text)\n\
    - start a new session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    CollectingProfile,
    ConfirmingSkills,
    Interviewing,
    Complete,
}

/// Sub-steps of `Phase::CollectingProfile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStep {
    AwaitingResume,
    ManualSkillEntry,
}

/// One graded answer. At most one per question; resubmission overwrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub evaluation: Evaluation,
}

/// The question currently shown to the candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedQuestion {
    /// 1-based
    pub number: usize,
    pub total: usize,
    pub text: String,
}

/// Input for one turn.
#[derive(Debug, Clone)]
pub enum SessionInput {
    /// Text extracted from an uploaded resume file.
    Resume(String),
    /// Anything typed into the conversation.
    Message(String),
}

/// Outcome of one turn.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub phase: Phase,
    pub messages: Vec<String>,
    pub question: Option<PresentedQuestion>,
    /// Grade of the answer submitted in this turn, if any.
    pub evaluation: Option<Evaluation>,
    #[serde(skip)]
    pub artifact: Option<Artifact>,
}

/// Collaborators the state machine needs for one turn.
pub struct SessionContext<'a> {
    pub evaluator: &'a dyn AnswerEvaluator,
    pub bank: &'a QuestionBank,
    pub extract: ExtractOptions,
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Question {0} does not exist")]
    UnknownQuestion(usize),

    #[error("Question {0} has not been answered yet")]
    NotAnswered(usize),

    #[error("Answer text cannot be empty")]
    EmptyAnswer,
}

pub struct InterviewSession {
    pub id: Uuid,
    resume_text: String,
    skills: SkillSet,
    questions: Vec<Question>,
    answers: HashMap<String, AnswerRecord>,
    phase: Phase,
    profile_step: ProfileStep,
    current_question_index: usize,
    candidate_name: Option<String>,
    interview_date: Option<NaiveDate>,
    max_questions: usize,
    rng: StdRng,
}

impl InterviewSession {
    pub fn new(max_questions: usize, candidate_name: Option<String>) -> Self {
        Self::with_rng(max_questions, candidate_name, StdRng::from_entropy())
    }

    /// Session with an explicit RNG; the RNG drives generic-question shuffling.
    pub fn with_rng(max_questions: usize, candidate_name: Option<String>, rng: StdRng) -> Self {
        Self {
            id: Uuid::new_v4(),
            resume_text: String::new(),
            skills: SkillSet::new(),
            questions: Vec::new(),
            answers: HashMap::new(),
            phase: Phase::CollectingProfile,
            profile_step: ProfileStep::AwaitingResume,
            current_question_index: 0,
            candidate_name: normalize_name(candidate_name),
            interview_date: None,
            max_questions,
            rng,
        }
    }

    // ── accessors ──────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn profile_step(&self) -> ProfileStep {
        self.profile_step
    }

    #[cfg(test)]
    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn candidate_name(&self) -> Option<&str> {
        self.candidate_name.as_deref()
    }

    pub fn interview_date(&self) -> Option<NaiveDate> {
        self.interview_date
    }

    pub fn max_questions(&self) -> usize {
        self.max_questions
    }

    pub fn answer_for(&self, question_text: &str) -> Option<&AnswerRecord> {
        self.answers.get(question_text)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Answer records in question order, paired with their 1-based question number.
    pub fn records_in_order(&self) -> Vec<(usize, &Question, &AnswerRecord)> {
        self.questions
            .iter()
            .enumerate()
            .filter_map(|(i, q)| self.answers.get(&q.text).map(|r| (i + 1, q, r)))
            .collect()
    }

    /// Mean of recorded scores; `None` before the first answer.
    pub fn average_score(&self) -> Option<f64> {
        aggregate_score(self.answers.values().map(|r| r.evaluation.score))
    }

    pub fn rating(&self) -> Option<Rating> {
        self.average_score().map(Rating::from_score)
    }

    pub fn current_question(&self) -> Option<PresentedQuestion> {
        if self.phase != Phase::Interviewing {
            return None;
        }
        self.questions
            .get(self.current_question_index)
            .map(|q| PresentedQuestion {
                number: self.current_question_index + 1,
                total: self.questions.len(),
                text: q.text.clone(),
            })
    }

    pub fn set_candidate_name(&mut self, name: Option<String>) {
        self.candidate_name = normalize_name(name);
    }

    /// Pins the interview date (the date the question list was built).
    pub fn set_interview_date(&mut self, date: NaiveDate) {
        self.interview_date = Some(date);
    }

    // ── turn dispatch ──────────────────────────────────────────────────────

    pub async fn handle(&mut self, input: SessionInput, ctx: &SessionContext<'_>) -> Reply {
        let before = self.phase;
        let reply = match (self.phase, input) {
            (Phase::CollectingProfile, SessionInput::Resume(text)) => {
                self.analyze_resume(&text, ctx)
            }
            (Phase::CollectingProfile, SessionInput::Message(text)) => match self.profile_step {
                ProfileStep::AwaitingResume => self.analyze_resume(&text, ctx),
                ProfileStep::ManualSkillEntry => self.accept_manual_skills(&text),
            },
            (_, SessionInput::Resume(_)) => self.reply(vec![
                "A resume has already been analyzed for this session. \
                 Start a new session to use a different one."
                    .to_string(),
            ]),
            (Phase::ConfirmingSkills, SessionInput::Message(text)) => {
                self.confirm_skills(&text, ctx)
            }
            (Phase::Interviewing, SessionInput::Message(text)) => {
                self.submit_answer(&text, ctx).await
            }
            (Phase::Complete, SessionInput::Message(text)) => self.complete_command(&text),
        };

        if before != self.phase {
            info!(session_id = %self.id, "Session phase {:?} → {:?}", before, self.phase);
        }
        reply
    }

    fn analyze_resume(&mut self, text: &str, ctx: &SessionContext<'_>) -> Reply {
        if text.trim().is_empty() {
            return self.reply(vec![
                "The resume appears to be empty. Please upload a PDF, DOCX or TXT file, \
                 or paste the resume text."
                    .to_string(),
            ]);
        }

        self.resume_text = text.to_string();
        self.skills = extract_skills(text, ctx.extract);

        if self.skills.is_empty() {
            self.profile_step = ProfileStep::ManualSkillEntry;
            return self.reply(vec![
                "I couldn't identify specific skills in your resume. \
                 Please list your main technical skills (for example: Python, SQL, AWS)."
                    .to_string(),
            ]);
        }

        self.enter_confirming_skills("I analyzed your resume and found these skills:")
    }

    fn accept_manual_skills(&mut self, text: &str) -> Reply {
        let mut skills = parse_skill_list(text);
        let mut messages = Vec::new();
        if skills.is_empty() {
            for (category, keyword) in SEED_SKILLS {
                skills.insert(*category, keyword);
            }
            messages.push(
                "I didn't recognize any skills in that list, so I'll start from a general profile."
                    .to_string(),
            );
        }
        self.skills = skills;
        let mut reply = self.enter_confirming_skills("Your skills profile:");
        messages.append(&mut reply.messages);
        reply.messages = messages;
        reply
    }

    fn enter_confirming_skills(&mut self, heading: &str) -> Reply {
        self.phase = Phase::ConfirmingSkills;
        self.profile_step = ProfileStep::AwaitingResume;
        self.reply(vec![
            format!("{heading}\n{}", self.skills.describe()),
            "Type additional skills to add them, or say \"start interview\" when you're ready."
                .to_string(),
        ])
    }

    fn confirm_skills(&mut self, text: &str, ctx: &SessionContext<'_>) -> Reply {
        match parse_confirm_intent(text) {
            ConfirmIntent::StartInterview(extra) => {
                let added = self.skills.merge(&extra);
                let mut reply = self.start_interview(ctx);
                if added > 0 {
                    reply.messages.insert(0, format!("Added {added} skill(s) before starting."));
                }
                reply
            }
            ConfirmIntent::AddSkills(extra) => {
                let added = self.skills.merge(&extra);
                self.reply(vec![
                    format!("Added {added} skill(s). Current profile:\n{}", self.skills.describe()),
                    "Say \"start interview\" when you're ready.".to_string(),
                ])
            }
            ConfirmIntent::Unrecognized => self.reply(vec![
                "Sorry, I didn't catch that. List more skills to add, \
                 or say \"start interview\" to begin."
                    .to_string(),
            ]),
        }
    }

    fn start_interview(&mut self, ctx: &SessionContext<'_>) -> Reply {
        self.questions =
            select_questions(&self.skills, ctx.bank, self.max_questions, &mut self.rng);
        self.answers.clear();
        self.current_question_index = 0;
        if self.interview_date.is_none() {
            self.interview_date = Some(Local::now().date_naive());
        }

        if self.questions.is_empty() {
            warn!(session_id = %self.id, "No questions available; completing immediately");
            return self.enter_complete(vec!["No interview questions are available.".to_string()]);
        }

        self.phase = Phase::Interviewing;
        info!(
            session_id = %self.id,
            "Interview started with {} questions",
            self.questions.len()
        );
        self.reply(vec![format!(
            "Let's begin. I'll ask {} questions; answer each one in your own words.",
            self.questions.len()
        )])
    }

    async fn submit_answer(&mut self, text: &str, ctx: &SessionContext<'_>) -> Reply {
        if text.trim().is_empty() {
            return self.reply(vec!["Please type an answer before submitting.".to_string()]);
        }
        let Some(question) = self.questions.get(self.current_question_index).cloned() else {
            return self.enter_complete(vec![]);
        };

        let evaluation = ctx.evaluator.evaluate(&question, text).await;
        self.record_answer(&question, text, evaluation.clone());
        self.current_question_index += 1;

        let graded = format!("Score: {}/100. {}", evaluation.score, evaluation.feedback);
        let mut reply = if self.current_question_index < self.questions.len() {
            self.reply(vec![graded])
        } else {
            self.enter_complete(vec![graded])
        };
        reply.evaluation = Some(evaluation);
        reply
    }

    fn record_answer(&mut self, question: &Question, answer: &str, evaluation: Evaluation) {
        self.answers.insert(
            question.text.clone(),
            AnswerRecord {
                question: question.text.clone(),
                answer: answer.to_string(),
                evaluation,
            },
        );
    }

    fn enter_complete(&mut self, mut messages: Vec<String>) -> Reply {
        self.phase = Phase::Complete;
        self.current_question_index = self.questions.len();
        messages.push(self.summary_line());
        messages.push(COMPLETE_MENU.to_string());
        info!(
            session_id = %self.id,
            "Interview complete: {} answers, average {:?}",
            self.answers.len(),
            self.average_score()
        );
        self.reply(messages)
    }

    fn summary_line(&self) -> String {
        match (self.average_score(), self.rating()) {
            (Some(avg), Some(rating)) => {
                format!("Interview complete! Overall score: {avg:.1}/100 ({rating}).")
            }
            _ => "Interview complete! Overall score: N/A.".to_string(),
        }
    }

    fn complete_command(&mut self, text: &str) -> Reply {
        match parse_complete_intent(text) {
            CompleteIntent::Review => self.reply(vec![self.review_text()]),
            CompleteIntent::Export(format) => self.export(format),
            CompleteIntent::NewSession => {
                self.reset();
                self.reply(vec![
                    "Starting a new session.".to_string(),
                    GREETING.to_string(),
                ])
            }
            CompleteIntent::Unrecognized => self.reply(vec![COMPLETE_MENU.to_string()]),
        }
    }

    fn review_text(&self) -> String {
        let records = self.records_in_order();
        if records.is_empty() {
            return "No answers were recorded.".to_string();
        }
        records
            .iter()
            .map(|(n, q, r)| {
                format!(
                    "Q{n}: {}\nYour answer: {}\nScore: {}/100\nFeedback: {}",
                    q.text, r.answer, r.evaluation.score, r.evaluation.feedback
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn export(&self, format: ExportFormat) -> Reply {
        match export::render(self, format) {
            Ok(artifact) => {
                let message =
                    format!("Your {} export is ready: {}", format.label(), artifact.filename);
                let mut reply = self.reply(vec![message]);
                reply.artifact = Some(artifact);
                reply
            }
            Err(e) => {
                warn!(session_id = %self.id, "Export failed: {e}");
                self.reply(vec![format!("Sorry, the {} export failed: {e}", format.label())])
            }
        }
    }

    /// Re-answers an already-answered question (1-based `number`). The new grade replaces
    /// the old record; phase and current question are unchanged.
    pub async fn revise_answer(
        &mut self,
        number: usize,
        text: &str,
        ctx: &SessionContext<'_>,
    ) -> Result<Evaluation, SessionError> {
        let question = number
            .checked_sub(1)
            .and_then(|i| self.questions.get(i))
            .cloned()
            .ok_or(SessionError::UnknownQuestion(number))?;
        if !self.answers.contains_key(&question.text) {
            return Err(SessionError::NotAnswered(number));
        }
        if text.trim().is_empty() {
            return Err(SessionError::EmptyAnswer);
        }

        let evaluation = ctx.evaluator.evaluate(&question, text).await;
        self.record_answer(&question, text, evaluation.clone());
        info!(session_id = %self.id, "Answer {number} revised, new score {}", evaluation.score);
        Ok(evaluation)
    }

    /// Wipes every field back to its initial value. Keeps id, question limit and RNG.
    pub fn reset(&mut self) {
        self.resume_text.clear();
        self.skills.clear();
        self.questions.clear();
        self.answers.clear();
        self.phase = Phase::CollectingProfile;
        self.profile_step = ProfileStep::AwaitingResume;
        self.current_question_index = 0;
        self.candidate_name = None;
        self.interview_date = None;
    }

    fn reply(&self, mut messages: Vec<String>) -> Reply {
        let question = self.current_question();
        if let Some(q) = &question {
            messages.push(format!("Question {} of {}: {}", q.number, q.total, q.text));
        }
        Reply {
            phase: self.phase,
            messages,
            question,
            evaluation: None,
            artifact: None,
        }
    }
}

fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
