//! Result Exporter: renders a session's results as Markdown, JSON, plain text or PDF.
//!
//! Every format is rendered from one `InterviewReport`, which is also the JSON schema:
//! `{date, overall_score, rating, skills, questions: [{question_number, question_text,
//! answer, score, feedback, missing_concepts}]}` plus an optional `candidate_name`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interview::InterviewSession;
use crate::skills::SkillSet;

pub mod markdown;
pub mod pdf;
pub mod text;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const NO_DATE: &str = "Not specified";
const NOT_RATED: &str = "Not rated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[serde(alias = "md")]
    Markdown,
    Json,
    Pdf,
    #[serde(alias = "txt")]
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Pdf => "pdf",
            Self::Text => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown; charset=utf-8",
            Self::Json => "application/json",
            Self::Pdf => "application/pdf",
            Self::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Json => "JSON",
            Self::Pdf => "PDF",
            Self::Text => "text",
        }
    }

    pub fn filename(&self) -> String {
        format!("interview_results.{}", self.extension())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// A rendered export, ready to download or attach.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub format: ExportFormat,
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// Colour cue for a single question score. Not the overall rating bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// ≥ 80
    Strong,
    /// 60 – 79
    Fair,
    /// < 60
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::Strong
        } else if score >= 60 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionReport {
    pub question_number: usize,
    pub question_text: String,
    pub answer: String,
    pub score: u32,
    pub feedback: String,
    pub missing_concepts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    pub date: String,
    pub overall_score: f64,
    pub rating: String,
    pub skills: SkillSet,
    pub questions: Vec<QuestionReport>,
}

impl InterviewReport {
    /// Snapshot of a session. Unanswered questions are left out; an interview without
    /// answers reports 0 and "Not rated".
    pub fn from_session(session: &InterviewSession) -> Self {
        let questions = session
            .records_in_order()
            .into_iter()
            .map(|(number, question, record)| QuestionReport {
                question_number: number,
                question_text: question.text.clone(),
                answer: record.answer.clone(),
                score: record.evaluation.score,
                feedback: record.evaluation.feedback.clone(),
                missing_concepts: record.evaluation.missing_concepts.clone(),
            })
            .collect();

        Self {
            candidate_name: session.candidate_name().map(str::to_string),
            date: session
                .interview_date()
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| NO_DATE.to_string()),
            overall_score: session.average_score().unwrap_or(0.0),
            rating: session
                .rating()
                .map(|r| r.label().to_string())
                .unwrap_or_else(|| NOT_RATED.to_string()),
            skills: session.skills().clone(),
            questions,
        }
    }
}

pub fn render(session: &InterviewSession, format: ExportFormat) -> Result<Artifact, ExportError> {
    render_report(&InterviewReport::from_session(session), format)
}

pub fn render_report(
    report: &InterviewReport,
    format: ExportFormat,
) -> Result<Artifact, ExportError> {
    let bytes = match format {
        ExportFormat::Markdown => Bytes::from(markdown::render_markdown(report)),
        ExportFormat::Json => Bytes::from(serde_json::to_vec_pretty(report)?),
        ExportFormat::Text => Bytes::from(text::render_text(report)),
        ExportFormat::Pdf => Bytes::from(pdf::render_pdf(report)?),
    };
    Ok(Artifact {
        format,
        filename: format.filename(),
        content_type: format.content_type(),
        bytes,
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_report;
    use super::*;
    use crate::evaluation::KeywordEvaluator;
    use crate::interview::session::{SessionContext, SessionInput};
    use crate::questions::QuestionBank;
    use crate::skills::ExtractOptions;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let artifact = render_report(&report, ExportFormat::Json).unwrap();
        let parsed: InterviewReport = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_json_schema_keys() {
        let artifact = render_report(&sample_report(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
        for key in ["date", "overall_score", "rating", "skills", "questions"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        let q = &value["questions"][1];
        for key in [
            "question_number",
            "question_text",
            "answer",
            "score",
            "feedback",
            "missing_concepts",
        ] {
            assert!(q.get(key).is_some(), "missing question key {key}");
        }
        assert_eq!(value["skills"]["programming"][0], "python");
    }

    #[test]
    fn test_artifact_metadata() {
        let artifact = render_report(&sample_report(), ExportFormat::Markdown).unwrap();
        assert_eq!(artifact.filename, "interview_results.md");
        assert_eq!(artifact.content_type, "text/markdown; charset=utf-8");
    }

    #[test]
    fn test_format_parses_aliases() {
        let f: ExportFormat = serde_json::from_str("\"md\"").unwrap();
        assert_eq!(f, ExportFormat::Markdown);
        let f: ExportFormat = serde_json::from_str("\"pdf\"").unwrap();
        assert_eq!(f, ExportFormat::Pdf);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(60), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(59), ScoreBand::Weak);
    }

    #[test]
    fn test_empty_session_report() {
        let session = InterviewSession::new(5, None);
        let report = InterviewReport::from_session(&session);
        assert_eq!(report.date, "Not specified");
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.rating, "Not rated");
        assert!(report.questions.is_empty());
    }

    #[tokio::test]
    async fn test_session_round_trips_through_json() {
        let evaluator = KeywordEvaluator::with_rng(StdRng::seed_from_u64(2));
        let bank = QuestionBank::builtin();
        let ctx = SessionContext {
            evaluator: &evaluator,
            bank: &bank,
            extract: ExtractOptions::default(),
        };
        let mut session = InterviewSession::with_rng(3, None, StdRng::seed_from_u64(4));
        session.set_interview_date(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        for text in ["Skills: Python", "yes", "mutable tuple", "closure wrapper", "gil thread"] {
            session.handle(SessionInput::Message(text.to_string()), &ctx).await;
        }

        let artifact = render(&session, ExportFormat::Json).unwrap();
        let parsed: InterviewReport = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(parsed.date, "2026-10-16");
        assert_eq!(Some(parsed.overall_score), session.average_score());
        assert_eq!(parsed.rating, session.rating().unwrap().label());
        assert_eq!(&parsed.skills, session.skills());
        assert_eq!(parsed.questions.len(), 3);
        let records = session.records_in_order();
        for (q, (number, question, record)) in parsed.questions.iter().zip(records) {
            assert_eq!(q.question_number, number);
            assert_eq!(q.question_text, question.text);
            assert_eq!(q.answer, record.answer);
            assert_eq!(q.score, record.evaluation.score);
            assert_eq!(q.feedback, record.evaluation.feedback);
            assert_eq!(q.missing_concepts, record.evaluation.missing_concepts);
        }
    }
}
