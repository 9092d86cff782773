//! Local LLM assistant for the trip planner.
//!
//! Talks to an Ollama-compatible `/api/generate` endpoint. Whenever the model
//! cannot answer (not running, timed out, bad response) the [`Assistant`]
//! falls back to [`scripted_reply`], so a question always gets an answer.

mod fallback;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tp_core::{Currency, EntryKind, ScheduleStore, daily_load, is_overloaded};

pub use fallback::{review_day, scripted_reply};

/// Instructions sent with every prompt.
pub const SYSTEM_PROMPT: &str = "You are a travel assistant specialised in Edinburgh, Scotland. \
                                 Answer concisely and helpfully.";
const TOP_P: f32 = 0.9;
const TOP_K: u32 = 40;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The client settings were unusable.
    #[error("invalid assistant settings: {reason}")]
    InvalidSettings { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed or timed out.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The endpoint returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Where and how to reach the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Ollama generate-API client.
///
/// Each clone shares the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    model: String,
    temperature: f32,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the given endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an http(s) URL, the model name
    /// is blank, or the HTTP client fails to build.
    pub fn new(settings: &ModelSettings) -> Result<Self, LlmError> {
        let endpoint = reqwest::Url::parse(settings.endpoint.trim()).map_err(|_| {
            LlmError::InvalidSettings {
                reason: "endpoint is not a valid URL",
            }
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(LlmError::InvalidSettings {
                reason: "endpoint must use http or https",
            });
        }
        let model = settings.model.trim();
        if model.is_empty() {
            return Err(LlmError::InvalidSettings {
                reason: "model name cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self {
            http,
            endpoint,
            model: model.to_string(),
            temperature: settings.temperature,
        })
    }

    /// Sends one non-streaming generate request and returns the reply text.
    pub async fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: GenerateResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        let text = payload.response.trim();
        if text.is_empty() {
            return Err(LlmError::InvalidResponse("empty response".to_string()));
        }
        Ok(text.to_string())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error,
        })
}

/// Renders the plan and the question as a model prompt.
pub fn build_prompt(store: &ScheduleStore, question: &str) -> String {
    let window = store.window();
    let mut lines = vec![format!(
        "Trip: {} to {} ({} days)",
        window.start(),
        window.end(),
        window.day_count()
    )];

    if store.is_empty() {
        lines.push("Nothing is planned yet.".to_string());
    } else {
        lines.push("Planned entries:".to_string());
        for entry in store.sorted_entries() {
            let detail = match entry.kind() {
                EntryKind::Activity(activity) => format!(
                    "{}, {}",
                    activity.category,
                    Currency::Eur.display(activity.cost)
                ),
                EntryKind::Travel(leg) => format!("{} {:.1} km", leg.mode, leg.distance_km),
            };
            lines.push(format!(
                "- {} {}-{} {} ({detail})",
                entry.date(),
                entry.start_time(),
                entry.end_time(),
                entry.title()
            ));
        }
        let busy: Vec<String> = window
            .days()
            .filter(|day| is_overloaded(daily_load(store, *day)))
            .map(|day| day.to_string())
            .collect();
        if !busy.is_empty() {
            lines.push(format!("Overloaded days: {}", busy.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push(format!("Question: {}", question.trim()));
    lines.join("\n")
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

/// Answers questions about a plan, preferring the model when one is set.
#[derive(Debug, Clone, Default)]
pub struct Assistant {
    client: Option<Client>,
}

impl Assistant {
    pub const fn new(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// An assistant that only uses scripted replies.
    pub const fn offline() -> Self {
        Self { client: None }
    }

    pub async fn reply(&self, store: &ScheduleStore, question: &str) -> Reply {
        let Some(client) = &self.client else {
            tracing::debug!("assistant model disabled, using scripted reply");
            return scripted(store, question);
        };
        match client.generate(SYSTEM_PROMPT, &build_prompt(store, question)).await {
            Ok(text) => Reply {
                text,
                source: ReplySource::Model,
            },
            Err(err) => {
                tracing::warn!(error = %err, "assistant model unavailable, using scripted reply");
                scripted(store, question)
            }
        }
    }
}

fn scripted(store: &ScheduleStore, question: &str) -> Reply {
    Reply {
        text: scripted_reply(store, question),
        source: ReplySource::Fallback,
    }
}
