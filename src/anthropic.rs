//! Minimal Anthropic Messages client for our use-cases.
//!
//! We only call /v1/messages with a system instruction plus one user turn and
//! read back the first text block. Calls are instrumented and log model
//! names, latencies, and token usage (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::{PartVariant, Section, TaskVariant, TextVariant, VariantTag};
use crate::util::fill_template;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Clone)]
pub struct Claude {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl Claude {
  /// Construct the client if we find ANTHROPIC_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("ANTHROPIC_API_KEY").ok()?;
    let base_url =
      std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| "https://api.anthropic.com".into());
    let model =
      std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| "claude-3-opus-20240229".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// Single-turn messages call. Returns the first text block, trimmed.
  /// No retry: a failure here immediately drives the caller's fallback path.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model, system_len = system.len(), user_len = user.len()))]
  async fn messages(
    &self,
    system: &str,
    user: &str,
    max_tokens: u32,
    temperature: f32,
  ) -> Result<String, String> {
    let url = format!("{}/v1/messages", self.base_url);
    let req = MessagesRequest {
      model: self.model.clone(),
      max_tokens,
      temperature,
      system: system.into(),
      messages: vec![MessageReq { role: "user".into(), content: user.into() }],
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "maestro-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("x-api-key", self.api_key.as_str())
      .header("anthropic-version", ANTHROPIC_VERSION)
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_api_error(&body).unwrap_or(body);
      return Err(format!("Anthropic HTTP {}: {}", status, msg));
    }

    let body: MessagesResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(input_tokens = ?usage.input_tokens, output_tokens = ?usage.output_tokens, "Anthropic usage");
    }
    let text = body.content.get(0)
      .and_then(|c| c.text.clone())
      .unwrap_or_default().trim().to_string();

    Ok(text)
  }

  // --- High-level helpers (section-specialized) ---

  /// Generate a writing assignment. Task 1 output embeds the graphData JSON
  /// the chart extractor digs out; Task 2 is plain prose.
  #[instrument(level = "info", skip(self, prompts), fields(task = ?task, model = %self.model))]
  pub async fn generate_writing(
    &self,
    prompts: &Prompts,
    task: TaskVariant,
  ) -> Result<String, String> {
    let (system, user, max_tokens, temperature) = match task {
      TaskVariant::Task1 => (&prompts.writing_task1_system, &prompts.writing_task1_user, 1500, 0.7),
      TaskVariant::Task2 => (&prompts.writing_task2_system, &prompts.writing_task2_user, 1000, 0.8),
    };
    let start = std::time::Instant::now();
    let result = self.messages(system, user, max_tokens, temperature).await;
    let elapsed = start.elapsed();

    match &result {
      Ok(text) => info!(?elapsed, text_len = text.len(), "Writing assignment generated"),
      Err(e) => error!(?elapsed, error = %e, "Model call failed during writing generation"),
    }
    result
  }

  #[instrument(level = "info", skip(self, prompts), fields(text = ?text, model = %self.model))]
  pub async fn generate_reading(
    &self,
    prompts: &Prompts,
    text: TextVariant,
  ) -> Result<String, String> {
    let (system, user, max_tokens) = match text {
      TextVariant::Text1 => (&prompts.reading_text1_system, &prompts.reading_text1_user, 1500),
      TextVariant::Text2 => (&prompts.reading_text2_system, &prompts.reading_text2_user, 2000),
    };
    self.messages(system, user, max_tokens, 0.7).await
  }

  #[instrument(level = "info", skip(self, prompts), fields(part = ?part, model = %self.model))]
  pub async fn generate_listening(
    &self,
    prompts: &Prompts,
    part: PartVariant,
  ) -> Result<String, String> {
    let (system, user) = match part {
      PartVariant::Part1 => (&prompts.listening_part1_system, &prompts.listening_part1_user),
      PartVariant::Part2 => (&prompts.listening_part2_system, &prompts.listening_part2_user),
    };
    self.messages(system, user, 1500, 0.7).await
  }

  /// Evaluate a submission against the criteria set selected by the variant.
  /// Low temperature: scoring should be as stable as the model allows.
  #[instrument(level = "info", skip(self, prompts, assignment, user_response),
               fields(variant = tag.as_str(), assignment_len = assignment.len(), response_len = user_response.len()))]
  pub async fn assess(
    &self,
    prompts: &Prompts,
    tag: VariantTag,
    assignment: &str,
    user_response: &str,
  ) -> Result<String, String> {
    let system = match tag {
      VariantTag::Writing { task_type: TaskVariant::Task1 } => &prompts.assess_writing_task1_system,
      VariantTag::Writing { task_type: TaskVariant::Task2 } => &prompts.assess_writing_task2_system,
      VariantTag::Reading { text_type: TextVariant::Text1 } => &prompts.assess_reading_text1_system,
      VariantTag::Reading { text_type: TextVariant::Text2 } => &prompts.assess_reading_text2_system,
      VariantTag::Listening { part_type: PartVariant::Part1 } => &prompts.assess_listening_part1_system,
      VariantTag::Listening { part_type: PartVariant::Part2 } => &prompts.assess_listening_part2_system,
    };
    let template = match tag.section() {
      Section::Writing => &prompts.assess_writing_user_template,
      Section::Reading => &prompts.assess_reading_user_template,
      Section::Listening => &prompts.assess_listening_user_template,
    };
    let user = fill_template(
      template,
      &[
        ("variant_label", tag.label()),
        ("assignment", assignment),
        ("user_response", user_response),
      ],
    );
    self.messages(system, &user, 1500, 0.3).await
  }
}

// --- Messages DTOs ---

#[derive(Serialize)]
struct MessagesRequest {
  model: String,
  max_tokens: u32,
  temperature: f32,
  system: String,
  messages: Vec<MessageReq>,
}
#[derive(Serialize)]
struct MessageReq { role: String, content: String }

#[derive(Deserialize)]
struct MessagesResponse {
  content: Vec<ContentBlock>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ContentBlock { #[serde(default)] text: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] input_tokens: Option<u32>,
  #[serde(default)] output_tokens: Option<u32>,
}

/// Try to extract a clean error message from an Anthropic error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
