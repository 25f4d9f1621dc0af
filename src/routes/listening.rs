//! Listening endpoints: Part 1 attempt (tracked), Part 2 exercise, and
//! assessment. Exercises are transcripts; no structured payload.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, response::Response, Json};
use tracing::{info, instrument};

use crate::domain::{PartVariant, Section, VariantTag};
use crate::logic::*;
use crate::protocol::*;
use crate::routes::{bad_request, provided, server_error};
use crate::state::AppState;

#[instrument(level = "info", skip(state, body))]
pub async fn listening_attempt(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AttemptIn>,
) -> Response {
  let session_id = match provided(&body.session_id) {
    Some(s) => s.clone(),
    None => return bad_request("Session ID is required"),
  };

  let outcome = generate_listening(&state, PartVariant::Part1).await;
  let (count, is_new) =
    track_attempt_best_effort(&state, Section::Listening, &session_id, body.timestamp.as_deref())
      .await;
  info!(target: "ielts", %session_id, count, fallback = outcome.used_fallback, "listening attempt served");

  let message = if outcome.used_fallback {
    "Using fallback assignment due to API error"
  } else {
    "Listening assignment retrieved"
  };
  Json(GenerationOut {
    success: true,
    message: message.into(),
    assignment: outcome.assignment,
    graph_data: None,
    count: Some(count),
    is_new: Some(is_new),
  })
  .into_response()
}

#[instrument(level = "info", skip(state, body))]
pub async fn listening_part2(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AttemptIn>,
) -> Response {
  if provided(&body.session_id).is_none() {
    return bad_request("Session ID is required");
  }

  let outcome = generate_listening(&state, PartVariant::Part2).await;
  let message = if outcome.used_fallback {
    "Using fallback assignment due to API error"
  } else {
    "Listening Part 2 assignment retrieved"
  };
  Json(GenerationOut {
    success: true,
    message: message.into(),
    assignment: outcome.assignment,
    graph_data: None,
    count: None,
    is_new: None,
  })
  .into_response()
}

#[instrument(level = "info", skip(state, body), fields(part = ?body.part_type))]
pub async fn listening_assessment(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ListeningAssessmentIn>,
) -> Response {
  let (session_id, user_response, assignment) = match (
    provided(&body.session_id),
    provided(&body.user_response),
    provided(&body.assignment),
  ) {
    (Some(s), Some(u), Some(a)) => (s.clone(), u.clone(), a.clone()),
    _ => return bad_request("Session ID, user response, and assignment are required"),
  };

  let tag = VariantTag::listening(body.part_type);
  match assess_submission(&state, tag, &assignment, &user_response).await {
    Ok(assessment) => {
      let (counter, demo_complete) = record_submission_best_effort(
        &state, tag, &session_id, &assignment, &user_response, &assessment,
      )
      .await;
      info!(target: "ielts", %session_id, counter, demo_complete, "listening assessment completed");
      Json(AssessmentOut {
        success: true,
        message: format!("Listening {} assessment completed", tag.label()),
        assessment,
        variant: tag,
        counter,
        demo_complete,
      })
      .into_response()
    }
    Err(e) => server_error("Error assessing listening response", Some(e)),
  }
}
