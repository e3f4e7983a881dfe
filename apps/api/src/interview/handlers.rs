use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::config::validate_max_questions;
use crate::errors::AppError;
use crate::evaluation::Evaluation;
use crate::export::{self, ExportFormat, InterviewReport};
use crate::ingest;
use crate::interview::session::{PresentedQuestion, SessionInput, GREETING};
use crate::interview::{InterviewSession, Phase, ProfileStep, Rating, Reply};
use crate::mail::{self, DeliveryStatus};
use crate::skills::SkillSet;
use crate::state::AppState;

const RESUME_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / response bodies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub candidate_name: Option<String>,
    pub max_questions: Option<usize>,
}

/// `candidate_name: null` (or blank) clears the name.
#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub candidate_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub phase: Phase,
    pub max_questions: usize,
    pub messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    #[serde(flatten)]
    pub reply: Reply,
    /// Set when the turn produced an export; fetch it from this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub number: usize,
    pub text: String,
    pub answered: bool,
}

#[derive(Debug, Serialize)]
pub struct AnswerView {
    pub question_number: usize,
    pub question: String,
    pub answer: String,
    pub evaluation: Evaluation,
}

#[derive(Debug, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub profile_step: Option<ProfileStep>,
    pub candidate_name: Option<String>,
    pub interview_date: Option<String>,
    pub max_questions: usize,
    pub grading_backend: &'static str,
    pub skills: SkillSet,
    pub questions: Vec<QuestionView>,
    pub current_question: Option<PresentedQuestion>,
    pub answers: Vec<AnswerView>,
    pub progress: Progress,
    pub average_score: Option<f64>,
    pub rating: Option<Rating>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct RevisionResponse {
    pub question_number: usize,
    pub evaluation: Evaluation,
    pub average_score: Option<f64>,
    pub rating: Option<Rating>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<ExportFormat>,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub recipient: String,
    pub subject: Option<String>,
    pub format: Option<ExportFormat>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let max_questions = req.max_questions.unwrap_or(state.config.max_questions);
    validate_max_questions(max_questions).map_err(|e| AppError::Validation(e.to_string()))?;

    let session = InterviewSession::new(max_questions, req.candidate_name);
    let phase = session.phase();
    let session_id = state.sessions.insert(session).await;
    info!(%session_id, max_questions, "Session created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            phase,
            max_questions,
            messages: vec![GREETING.to_string()],
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = load_session(&state, id).await?;
    let session = session.lock().await;
    Ok(Json(snapshot(&session, state.evaluator.backend())))
}

/// PATCH /api/v1/sessions/:id
///
/// Sets the name shown in exports. A chat reset clears it, so clients re-send it here.
pub async fn handle_update_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = load_session(&state, id).await?;
    let mut session = session.lock().await;
    session.set_candidate_name(req.candidate_name);
    info!(session_id = %id, "Candidate name updated");
    Ok(Json(snapshot(&session, state.evaluator.backend())))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(session_not_found(id));
    }
    info!(session_id = %id, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/messages
pub async fn handle_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let session = load_session(&state, id).await?;
    let mut session = session.lock().await;
    let reply = session
        .handle(SessionInput::Message(req.text), &state.session_context())
        .await;
    Ok(Json(turn_response(id, reply)))
}

/// POST /api/v1/sessions/:id/resume (multipart, field `file`)
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<TurnResponse>, AppError> {
    let session = load_session(&state, id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("The resume upload needs a filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read the upload: {e}")))?;
        upload = Some((filename, bytes));
        break;
    }
    let (filename, bytes) = upload.ok_or_else(|| {
        AppError::Validation(format!("Missing multipart field '{RESUME_FIELD}'"))
    })?;

    let text = ingest::extract_text(&filename, bytes).await.map_err(|e| {
        tracing::warn!(session_id = %id, filename = %filename, "Resume ingestion failed: {e}");
        AppError::from(e)
    })?;

    let mut session = session.lock().await;
    let reply = session
        .handle(SessionInput::Resume(text), &state.session_context())
        .await;
    Ok(Json(turn_response(id, reply)))
}

/// PUT /api/v1/sessions/:id/answers/:number
pub async fn handle_revise_answer(
    State(state): State<AppState>,
    Path((id, number)): Path<(Uuid, usize)>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<RevisionResponse>, AppError> {
    let session = load_session(&state, id).await?;
    let mut session = session.lock().await;
    let evaluation = session
        .revise_answer(number, &req.text, &state.session_context())
        .await?;
    Ok(Json(RevisionResponse {
        question_number: number,
        evaluation,
        average_score: session.average_score(),
        rating: session.rating(),
    }))
}

/// GET /api/v1/sessions/:id/export?format=markdown|json|pdf|text
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format = query.format.unwrap_or(ExportFormat::Markdown);
    let report = {
        let session = load_session(&state, id).await?;
        let session = session.lock().await;
        InterviewReport::from_session(&session)
    };
    let artifact = export::render_report(&report, format)?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    let disposition =
        HeaderValue::from_str(&disposition).map_err(|e| AppError::Internal(e.into()))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(artifact.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// POST /api/v1/sessions/:id/email
pub async fn handle_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<DeliveryStatus>, AppError> {
    let report = {
        let session = load_session(&state, id).await?;
        let session = session.lock().await;
        InterviewReport::from_session(&session)
    };
    let status = mail::send_results(
        state.mailer.as_ref(),
        &report,
        &req.recipient,
        req.subject.as_deref(),
        req.format.unwrap_or(ExportFormat::Pdf),
    )
    .await;
    Ok(Json(status))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_session(
    state: &AppState,
    id: Uuid,
) -> Result<Arc<Mutex<InterviewSession>>, AppError> {
    state.sessions.get(id).await.ok_or_else(|| session_not_found(id))
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

fn turn_response(id: Uuid, reply: Reply) -> TurnResponse {
    let download_url = reply
        .artifact
        .as_ref()
        .map(|a| format!("/api/v1/sessions/{id}/export?format={}", export_param(a.format)));
    TurnResponse {
        reply,
        download_url,
    }
}

fn export_param(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Markdown => "markdown",
        ExportFormat::Json => "json",
        ExportFormat::Pdf => "pdf",
        ExportFormat::Text => "text",
    }
}

fn snapshot(session: &InterviewSession, backend: &'static str) -> SessionSnapshot {
    let questions = session
        .questions()
        .iter()
        .enumerate()
        .map(|(i, q)| QuestionView {
            number: i + 1,
            text: q.text.clone(),
            answered: session.answer_for(&q.text).is_some(),
        })
        .collect();
    let answers = session
        .records_in_order()
        .into_iter()
        .map(|(number, question, record)| AnswerView {
            question_number: number,
            question: question.text.clone(),
            answer: record.answer.clone(),
            evaluation: record.evaluation.clone(),
        })
        .collect();

    SessionSnapshot {
        session_id: session.id,
        phase: session.phase(),
        profile_step: (session.phase() == Phase::CollectingProfile).then(|| session.profile_step()),
        candidate_name: session.candidate_name().map(str::to_string),
        interview_date: session
            .interview_date()
            .map(|d| d.format(export::DATE_FORMAT).to_string()),
        max_questions: session.max_questions(),
        grading_backend: backend,
        skills: session.skills().clone(),
        questions,
        current_question: session.current_question(),
        answers,
        progress: Progress {
            answered: session.answered_count(),
            total: session.questions().len(),
        },
        average_score: session.average_score(),
        rating: session.rating(),
    }
}
