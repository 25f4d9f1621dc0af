//! Writing endpoints: Task 1 attempt (tracked, with chart), Task 2
//! assignment, and assessment. Thin wrappers that forward to core logic.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, response::Response, Json};
use tracing::{info, instrument};

use crate::domain::{Section, TaskVariant, VariantTag};
use crate::logic::*;
use crate::protocol::*;
use crate::routes::{bad_request, provided, server_error};
use crate::state::AppState;

#[instrument(level = "info", skip(state, body))]
pub async fn writing_attempt(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AttemptIn>,
) -> Response {
  let session_id = match provided(&body.session_id) {
    Some(s) => s.clone(),
    None => return bad_request("Session ID is required"),
  };

  let outcome = generate_writing(&state, TaskVariant::Task1).await;
  let (count, is_new) =
    track_attempt_best_effort(&state, Section::Writing, &session_id, body.timestamp.as_deref())
      .await;
  info!(target: "ielts", %session_id, count, fallback = outcome.used_fallback, "writing attempt served");

  let message = if outcome.used_fallback {
    "Using fallback assignment due to API error"
  } else {
    "Writing assignment retrieved"
  };
  Json(GenerationOut {
    success: true,
    message: message.into(),
    assignment: outcome.assignment,
    graph_data: outcome.chart,
    count: Some(count),
    is_new: Some(is_new),
  })
  .into_response()
}

#[instrument(level = "info", skip(state, body))]
pub async fn writing_task2(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AttemptIn>,
) -> Response {
  if provided(&body.session_id).is_none() {
    return bad_request("Session ID is required");
  }

  let outcome = generate_writing(&state, TaskVariant::Task2).await;
  let message = if outcome.used_fallback {
    "Using fallback assignment due to API error"
  } else {
    "Writing Task 2 assignment retrieved"
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

#[instrument(level = "info", skip(state, body), fields(task = ?body.task_type))]
pub async fn writing_assessment(
  State(state): State<Arc<AppState>>,
  Json(body): Json<WritingAssessmentIn>,
) -> Response {
  let (session_id, user_response, assignment) = match (
    provided(&body.session_id),
    provided(&body.user_response),
    provided(&body.assignment),
  ) {
    (Some(s), Some(u), Some(a)) => (s.clone(), u.clone(), a.clone()),
    _ => return bad_request("Session ID, user response, and assignment are required"),
  };

  let tag = VariantTag::writing(body.task_type);
  match assess_submission(&state, tag, &assignment, &user_response).await {
    Ok(assessment) => {
      let (counter, demo_complete) = record_submission_best_effort(
        &state, tag, &session_id, &assignment, &user_response, &assessment,
      )
      .await;
      info!(target: "ielts", %session_id, counter, demo_complete, "writing assessment completed");
      Json(AssessmentOut {
        success: true,
        message: format!("Writing {} assessment completed", tag.label()),
        assessment,
        variant: tag,
        counter,
        demo_complete,
      })
      .into_response()
    }
    Err(e) => server_error("Error assessing writing response", Some(e)),
  }
}
