use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::ANTHROPIC_API_URL;

pub const MIN_QUESTIONS: usize = 3;
pub const MAX_QUESTIONS: usize = 10;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Default question limit for new sessions, in `MIN_QUESTIONS..=MAX_QUESTIONS`.
    pub max_questions: usize,
    /// Presence selects remote grading.
    pub anthropic_api_key: Option<String>,
    pub grading_api_url: String,
    pub grading_timeout: Duration,
    /// Resume extraction only counts keywords near a skills-section cue.
    pub skill_context_cues: bool,
    /// Sessions untouched for this long are dropped. `None` keeps them until deleted.
    pub session_idle_timeout: Option<Duration>,
    pub smtp: Option<SmtpConfig>,
}

/// Outbound relay settings. Present only when `SMTP_HOST` is set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let max_questions = match get("MAX_QUESTIONS") {
            Some(raw) => raw
                .parse::<usize>()
                .context("MAX_QUESTIONS must be a whole number")?,
            None => 5,
        };
        validate_max_questions(max_questions)?;

        let smtp = match get("SMTP_HOST") {
            Some(host) => {
                let username = get("SMTP_USERNAME");
                let from = get("SMTP_FROM")
                    .or_else(|| username.clone())
                    .context("SMTP_FROM (or SMTP_USERNAME) is required when SMTP_HOST is set")?;
                Some(SmtpConfig {
                    host,
                    port: get("SMTP_PORT")
                        .unwrap_or_else(|| "587".to_string())
                        .parse::<u16>()
                        .context("SMTP_PORT must be a valid port number")?,
                    username,
                    password: get("SMTP_PASSWORD"),
                    from,
                })
            }
            None => None,
        };

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_questions,
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            grading_api_url: get("GRADING_API_URL")
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            grading_timeout: Duration::from_secs(
                get("GRADING_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse::<u64>()
                    .context("GRADING_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            skill_context_cues: match get("SKILL_CONTEXT_CUES") {
                Some(raw) => parse_flag(&raw).context("SKILL_CONTEXT_CUES must be true or false")?,
                None => true,
            },
            session_idle_timeout: match get("SESSION_IDLE_MINUTES")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?
            {
                0 => None,
                minutes => Some(Duration::from_secs(minutes * 60)),
            },
            smtp,
        })
    }
}

pub fn validate_max_questions(n: usize) -> Result<()> {
    if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&n) {
        bail!("the question limit must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}, got {n}");
    }
    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
