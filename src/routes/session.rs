//! Misc endpoints: banner, health, the global session counter, and email
//! subscriptions.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, response::Response, Json};
use chrono::Utc;
use mongodb::bson::DateTime as BsonDateTime;
use tracing::{error, info, instrument};

use crate::protocol::*;
use crate::routes::{bad_request, provided, server_error};
use crate::state::AppState;
use crate::store::EmailSubscription;

#[instrument(level = "info")]
pub async fn root() -> &'static str {
  "IELTS Maestro API is running"
}

#[instrument(level = "info")]
pub async fn health() -> impl IntoResponse {
  Json(HealthOut { status: "ok", time: Utc::now().to_rfc3339() })
}

/// Counts distinct sessions in one global document. Unlike attempt tracking
/// this endpoint delivers nothing else, so a store failure is a plain 500.
#[instrument(level = "info", skip(state, body))]
pub async fn track_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TrackSessionIn>,
) -> Response {
  let session_id = match provided(&body.session_id) {
    Some(s) => s.clone(),
    None => return bad_request("Session ID is required"),
  };

  match &state.store {
    Some(store) => match store.track_session(&session_id).await {
      Ok(count) => {
        info!(target: "maestro_backend", %session_id, count, "session tracked");
        Json(TrackSessionOut {
          success: true,
          message: "Session tracked successfully".into(),
          count,
        })
        .into_response()
      }
      Err(e) => {
        error!(target: "maestro_backend", %session_id, error = %e, "session tracking failed");
        server_error("Error tracking session", None)
      }
    },
    None => server_error("Error tracking session", None),
  }
}

#[instrument(level = "info", skip(state, body))]
pub async fn subscribe(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubscribeIn>,
) -> Response {
  let (email, session_id, section) =
    match (provided(&body.email), provided(&body.session_id), provided(&body.section)) {
      (Some(e), Some(s), Some(c)) => (e.clone(), s.clone(), c.clone()),
      _ => return bad_request("Email, session ID, and section are required"),
    };

  match &state.store {
    Some(store) => {
      let sub = EmailSubscription {
        email,
        session_id,
        section,
        timestamp: BsonDateTime::now(),
      };
      match store.save_subscription(sub).await {
        Ok(()) => Json(SubscribeOut {
          success: true,
          message: "Subscription completed successfully".into(),
        })
        .into_response(),
        Err(e) => server_error("Error processing subscription request", Some(e)),
      }
    }
    None => server_error("Error processing subscription request", None),
  }
}
