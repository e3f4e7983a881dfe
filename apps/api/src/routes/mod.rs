pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session)
                .patch(handlers::handle_update_session)
                .delete(handlers::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/messages", post(handlers::handle_message))
        .route("/api/v1/sessions/:id/resume", post(handlers::handle_upload_resume))
        .route(
            "/api/v1/sessions/:id/answers/:number",
            put(handlers::handle_revise_answer),
        )
        .route("/api/v1/sessions/:id/export", get(handlers::handle_export))
        .route("/api/v1/sessions/:id/email", post(handlers::handle_email))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::evaluation::KeywordEvaluator;
    use crate::mail::tests::RecordingMailer;

    fn test_state() -> (AppState, Arc<RecordingMailer>) {
        let config = Config::from_lookup(|_| None).unwrap();
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(
            config,
            Arc::new(KeywordEvaluator::with_rng(StdRng::seed_from_u64(11))),
            mailer.clone(),
        );
        (state, mailer)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_session(app: &Router, body: Value) -> String {
        let (status, value) = send_json(app, Method::POST, "/api/v1/sessions", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        value["session_id"].as_str().unwrap().to_string()
    }

    async fn say(app: &Router, id: &str, text: &str) -> Value {
        let (status, value) = send_json(
            app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({ "text": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{value}");
        value
    }

    /// Runs a three-question interview to completion.
    async fn completed_session(app: &Router) -> String {
        let body = json!({ "max_questions": 3, "candidate_name": "Ada" });
        let id = create_session(app, body).await;
        let reply = say(app, &id, "Technical skills: Python").await;
        assert_eq!(reply["phase"], "confirming_skills");
        let reply = say(app, &id, "start interview").await;
        assert_eq!(reply["phase"], "interviewing");
        for answer in [
            "Lists are mutable, tuples are immutable and hashable.",
            "A decorator is a function wrapper using a closure.",
            "The GIL blocks threads on cpu-bound work.",
        ] {
            say(app, &id, answer).await;
        }
        id
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state();
        let app = build_router(state);
        let (status, value) = send_json(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["service"], "interview-api");
        assert_eq!(value["grading_backend"], "keyword");
        assert_eq!(value["active_sessions"], 0);

        create_session(&app, json!({})).await;
        let (_, value) = send_json(&app, Method::GET, "/health", None).await;
        assert_eq!(value["active_sessions"], 1);
    }

    #[tokio::test]
    async fn test_create_session_validates_limit() {
        let (state, _) = test_state();
        let app = build_router(state);
        let (status, value) =
            send_json(&app, Method::POST, "/api/v1/sessions", Some(json!({ "max_questions": 11 })))
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"]["code"], "VALIDATION_ERROR");

        let (status, value) =
            send_json(&app, Method::POST, "/api/v1/sessions", Some(json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(value["max_questions"], 5);
        assert_eq!(value["phase"], "collecting_profile");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (state, _) = test_state();
        let app = build_router(state);
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, value) = send_json(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_full_interview_over_http() {
        let (state, _) = test_state();
        let app = build_router(state);
        let id = completed_session(&app).await;

        let (status, snapshot) =
            send_json(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["phase"], "complete");
        assert_eq!(snapshot["progress"]["answered"], 3);
        assert_eq!(snapshot["progress"]["total"], 3);
        assert_eq!(snapshot["answers"].as_array().unwrap().len(), 3);
        assert_eq!(snapshot["skills"]["programming"][0], "python");
        assert!(snapshot["average_score"].as_f64().is_some());
        assert!(snapshot["rating"].is_string());
    }

    #[tokio::test]
    async fn test_chat_export_returns_download_url() {
        let (state, _) = test_state();
        let app = build_router(state);
        let id = completed_session(&app).await;
        let reply = say(&app, &id, "export as pdf").await;
        assert_eq!(
            reply["download_url"],
            format!("/api/v1/sessions/{id}/export?format=pdf")
        );
    }

    #[tokio::test]
    async fn test_export_download_headers() {
        let (state, _) = test_state();
        let app = build_router(state);
        let id = completed_session(&app).await;

        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{id}/export?format=pdf"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"interview_results.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let uri = format!("/api/v1/sessions/{id}/export?format=json");
        let (status, json_bytes) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let report: Value = serde_json::from_slice(&json_bytes).unwrap();
        assert_eq!(report["candidate_name"], "Ada");
        assert_eq!(report["questions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_revise_answer() {
        let (state, _) = test_state();
        let app = build_router(state);
        let id = completed_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}/answers/1");

        let body = json!({ "text": "no idea" });
        let (status, value) = send_json(&app, Method::PUT, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["question_number"], 1);
        assert!(value["evaluation"]["score"].as_u64().is_some());

        let (status, _) = send_json(&app, Method::PUT, &uri, Some(json!({ "text": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send_json(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/answers/9"),
            Some(json!({ "text": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_email_endpoint_reports_status() {
        let (state, mailer) = test_state();
        let app = build_router(state);
        let id = completed_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}/email");

        let (status, value) = send_json(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "recipient": "hiring@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["success"], true);
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);

        let (status, value) =
            send_json(&app, Method::POST, &uri, Some(json!({ "recipient": "" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["success"], false);
    }

    fn multipart_body(boundary: &str, filename: &str, content: &str) -> String {
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        )
    }

    async fn upload(app: &Router, id: &str, filename: &str, content: &str) -> (StatusCode, Value) {
        let boundary = "interview-boundary";
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/v1/sessions/{id}/resume"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(multipart_body(boundary, filename, content)))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_resume_upload() {
        let (state, _) = test_state();
        let app = build_router(state);
        let id = create_session(&app, json!({})).await;

        let (status, value) = upload(&app, &id, "resume.txt", "Skills: Python, Docker, SQL").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["phase"], "confirming_skills");
    }

    #[tokio::test]
    async fn test_resume_upload_rejects_unsupported_type() {
        let (state, _) = test_state();
        let app = build_router(state);
        let id = create_session(&app, json!({})).await;

        let (status, value) = upload(&app, &id, "resume.png", "binary").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"]["code"], "VALIDATION_ERROR");

        let (_, snapshot) =
            send_json(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(snapshot["phase"], "collecting_profile");
        assert_eq!(snapshot["profile_step"], "awaiting_resume");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (state, _) = test_state();
        let app = build_router(state);
        let id = create_session(&app, json!({})).await;
        let uri = format!("/api/v1/sessions/{id}");
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_candidate_name_survives_chat_reset_via_patch() {
        let (state, _) = test_state();
        let app = build_router(state);
        let id = completed_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");

        let reply = say(&app, &id, "new session").await;
        assert_eq!(reply["phase"], "collecting_profile");
        let (_, snapshot) = send_json(&app, Method::GET, &uri, None).await;
        assert!(snapshot["candidate_name"].is_null());

        let body = json!({ "candidate_name": "  Ada Lovelace " });
        let (status, snapshot) = send_json(&app, Method::PATCH, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["candidate_name"], "Ada Lovelace");
        assert_eq!(snapshot["phase"], "collecting_profile");

        let body = json!({ "candidate_name": null });
        let (_, snapshot) = send_json(&app, Method::PATCH, &uri, Some(body)).await;
        assert!(snapshot["candidate_name"].is_null());

        let missing = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let body = json!({ "candidate_name": "x" });
        let (status, _) = send_json(&app, Method::PATCH, &missing, Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
