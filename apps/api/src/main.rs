mod config;
mod errors;
mod evaluation;
mod export;
mod ingest;
mod interview;
mod llm_client;
mod mail;
mod questions;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation::evaluator_from_config;
use crate::mail::{DisabledMailer, Mailer, SmtpMailer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    let evaluator =
        evaluator_from_config(&config).context("failed to build the grading HTTP client")?;
    if config.anthropic_api_key.is_some() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    }
    info!("Answer grading backend: {}", evaluator.backend());

    let mailer = build_mailer(&config)?;

    let state = AppState::new(config.clone(), evaluator, mailer);
    info!("Question limit per session: {}", config.max_questions);
    match config.session_idle_timeout {
        Some(idle) => {
            state.sessions.spawn_eviction(idle);
            info!("Idle sessions expire after {} minutes", idle.as_secs() / 60);
        }
        None => warn!("SESSION_IDLE_MINUTES=0; sessions are kept until deleted"),
    }

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_mailer(config: &Config) -> Result<Arc<dyn Mailer>> {
    match &config.smtp {
        Some(smtp) => {
            let mailer = SmtpMailer::new(smtp).context("invalid SMTP configuration")?;
            info!("SMTP relay configured: {}:{}", smtp.host, smtp.port);
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("SMTP_HOST not set; email delivery is disabled");
            Ok(Arc::new(DisabledMailer))
        }
    }
}
