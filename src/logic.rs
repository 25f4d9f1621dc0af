//! Section orchestrators shared by the route handlers.
//!
//! This includes:
//!   - Generating assignments (writing/reading/listening) with static
//!     fallbacks when the upstream model call fails
//!   - Assessing submissions (upstream failure propagates; extraction
//!     failure degrades to a diagnostic result, never an error)
//!   - Best-effort persistence wrappers: tracking failures are logged and
//!     swallowed so they can never block content delivery

use chrono::{DateTime, Utc};
use tracing::{error, instrument, warn};

use crate::domain::{
  AssessmentResult, ChartDescription, PartVariant, Section, TaskVariant, TextVariant, VariantTag,
};
use crate::extract::{extract_assessment, extract_chart_payload};
use crate::seeds::{
  fallback_chart, fallback_listening_assignment, fallback_reading_assignment,
  fallback_writing_assignment,
};
use crate::state::AppState;

/// What a generation call hands to the route layer. `used_fallback` is true
/// only when the upstream call itself failed (or no API key is configured);
/// a chart-extraction fallback is silent and only logged.
pub struct GenerationOutcome {
  pub assignment: String,
  pub chart: Option<ChartDescription>,
  pub used_fallback: bool,
}

#[instrument(level = "info", skip(state), fields(task = ?task))]
pub async fn generate_writing(state: &AppState, task: TaskVariant) -> GenerationOutcome {
  if let Some(claude) = &state.claude {
    match claude.generate_writing(&state.prompts, task).await {
      Ok(raw) => {
        return match task {
          TaskVariant::Task1 => {
            let extracted = extract_chart_payload(&raw);
            if extracted.used_fallback {
              warn!(target: "ielts", "chart extraction fell back to the seed chart");
            }
            GenerationOutcome {
              assignment: extracted.assignment_text,
              chart: Some(extracted.chart),
              used_fallback: false,
            }
          }
          TaskVariant::Task2 => {
            GenerationOutcome { assignment: raw, chart: None, used_fallback: false }
          }
        };
      }
      Err(e) => {
        error!(target: "ielts", error = %e, "writing generation failed; serving fallback assignment")
      }
    }
  } else {
    warn!(target: "ielts", "ANTHROPIC_API_KEY not set; serving fallback writing assignment");
  }

  let chart = matches!(task, TaskVariant::Task1).then(fallback_chart);
  GenerationOutcome {
    assignment: fallback_writing_assignment(task).to_string(),
    chart,
    used_fallback: true,
  }
}

#[instrument(level = "info", skip(state), fields(text = ?text))]
pub async fn generate_reading(state: &AppState, text: TextVariant) -> GenerationOutcome {
  if let Some(claude) = &state.claude {
    match claude.generate_reading(&state.prompts, text).await {
      Ok(raw) => {
        return GenerationOutcome { assignment: raw, chart: None, used_fallback: false };
      }
      Err(e) => {
        error!(target: "ielts", error = %e, "reading generation failed; serving fallback assignment")
      }
    }
  } else {
    warn!(target: "ielts", "ANTHROPIC_API_KEY not set; serving fallback reading assignment");
  }

  GenerationOutcome {
    assignment: fallback_reading_assignment(text).to_string(),
    chart: None,
    used_fallback: true,
  }
}

#[instrument(level = "info", skip(state), fields(part = ?part))]
pub async fn generate_listening(state: &AppState, part: PartVariant) -> GenerationOutcome {
  if let Some(claude) = &state.claude {
    match claude.generate_listening(&state.prompts, part).await {
      Ok(raw) => {
        return GenerationOutcome { assignment: raw, chart: None, used_fallback: false };
      }
      Err(e) => {
        error!(target: "ielts", error = %e, "listening generation failed; serving fallback assignment")
      }
    }
  } else {
    warn!(target: "ielts", "ANTHROPIC_API_KEY not set; serving fallback listening assignment");
  }

  GenerationOutcome {
    assignment: fallback_listening_assignment(part).to_string(),
    chart: None,
    used_fallback: true,
  }
}

/// Evaluate a submission. Unlike generation, an upstream failure here is the
/// one path that surfaces as a hard error: fabricating scores would be worse
/// than failing the request.
#[instrument(level = "info", skip(state, assignment, user_response),
             fields(variant = tag.as_str(), response_len = user_response.len()))]
pub async fn assess_submission(
  state: &AppState,
  tag: VariantTag,
  assignment: &str,
  user_response: &str,
) -> Result<AssessmentResult, String> {
  let claude = state
    .claude
    .as_ref()
    .ok_or_else(|| "Anthropic API not configured (ANTHROPIC_API_KEY missing)".to_string())?;
  let raw = claude.assess(&state.prompts, tag, assignment, user_response).await?;
  Ok(extract_assessment(&raw, tag))
}

/// Track a section attempt; failures are logged and swallowed. Returns
/// `(count, is_new)`, defaulting to a first attempt when the store is
/// unavailable.
#[instrument(level = "info", skip(state, timestamp), fields(section = section.as_str(), %session_id))]
pub async fn track_attempt_best_effort(
  state: &AppState,
  section: Section,
  session_id: &str,
  timestamp: Option<&str>,
) -> (i64, bool) {
  if let Some(store) = &state.store {
    match store.track_attempt(section, session_id, parse_timestamp(timestamp)).await {
      Ok(rec) => return (rec.counter, rec.counter == 1),
      Err(e) => {
        error!(target: "maestro_backend", section = section.as_str(), error = %e,
               "attempt tracking failed; continuing without counter")
      }
    }
  }
  (1, true)
}

/// Record a submission and report `(counter, demo_complete)`; failures are
/// logged and swallowed, defaulting to a first submission.
#[instrument(level = "info", skip(state, assignment, user_response, assessment),
             fields(variant = tag.as_str(), %session_id))]
pub async fn record_submission_best_effort(
  state: &AppState,
  tag: VariantTag,
  session_id: &str,
  assignment: &str,
  user_response: &str,
  assessment: &AssessmentResult,
) -> (i64, bool) {
  if let Some(store) = &state.store {
    match store
      .record_assessment(tag, session_id, assignment, user_response, assessment)
      .await
    {
      Ok(result) => return result,
      Err(e) => {
        error!(target: "maestro_backend", variant = tag.as_str(), error = %e,
               "assessment record failed; continuing without counter")
      }
    }
  }
  (1, false)
}

/// Client timestamps arrive as RFC 3339 strings; anything else becomes "now".
fn parse_timestamp(timestamp: Option<&str>) -> DateTime<Utc> {
  timestamp
    .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
    .map(|t| t.with_timezone(&Utc))
    .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_parse_rfc3339_and_fall_back_to_now() {
    let parsed = parse_timestamp(Some("2025-04-01T12:30:00Z"));
    assert_eq!(parsed.to_rfc3339(), "2025-04-01T12:30:00+00:00");

    let before = Utc::now();
    let defaulted = parse_timestamp(Some("not a timestamp"));
    assert!(defaulted >= before);
    let missing = parse_timestamp(None);
    assert!(missing >= before);
  }
}
