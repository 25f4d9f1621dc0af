//! MongoDB persistence: attempt counters, assessment records, the global
//! session counter, and email subscriptions.
//!
//! The store is deliberately optional. Content delivery must keep working
//! with no database at all, so every caller treats these operations as
//! best-effort side effects (see `logic`).

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::domain::{demo_complete, AssessmentResult, Section, VariantTag};

/// Well-known key of the single global session-counter document.
const SESSION_COUNTER_KEY: &str = "global";

#[derive(Clone)]
pub struct Store {
  db: mongodb::Database,
}

/// Per-section attempt counter, keyed by sessionId.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
  pub session_id: String,
  #[serde(default)]
  pub counter: i64,
  pub last_attempt: BsonDateTime,
}

/// Latest submission per session and section, overwritten in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAssessment {
  pub session_id: String,
  pub assignment: String,
  pub user_response: String,
  pub assessment: AssessmentResult,
  pub timestamp: BsonDateTime,
  #[serde(default)]
  pub counter: i64,
  #[serde(flatten)]
  pub variant: VariantTag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionCounter {
  #[serde(rename = "_id")]
  id: String,
  counter: i64,
  #[serde(default)]
  tracked_sessions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubscription {
  pub email: String,
  pub session_id: String,
  pub section: String,
  pub timestamp: BsonDateTime,
}

fn chrono_to_bson(dt: DateTime<Utc>) -> BsonDateTime {
  BsonDateTime::from_millis(dt.timestamp_millis())
}

impl Section {
  fn attempts_collection(&self) -> &'static str {
    match self {
      Section::Writing => "writing_attempts",
      Section::Reading => "reading_attempts",
      Section::Listening => "listening_attempts",
    }
  }

  fn assessments_collection(&self) -> &'static str {
    match self {
      Section::Writing => "writing_assessments",
      Section::Reading => "reading_assessments",
      Section::Listening => "listening_assessments",
    }
  }
}

impl Store {
  /// Connect if MONGODB_URI is present; otherwise return None and run
  /// without persistence.
  pub async fn connect_from_env() -> Option<Self> {
    let uri = std::env::var("MONGODB_URI").ok()?;
    let db_name = std::env::var("MONGODB_DB").unwrap_or_else(|_| "ielts_maestro".into());
    match mongodb::Client::with_uri_str(&uri).await {
      Ok(client) => {
        info!(target: "maestro_backend", db = %db_name, "MongoDB client initialized");
        Some(Self { db: client.database(&db_name) })
      }
      Err(e) => {
        error!(target: "maestro_backend", error = %e, "MongoDB connection failed; running without persistence");
        None
      }
    }
  }

  /// Atomically increment-or-create the attempt counter for a session.
  /// Race-safe: concurrent attempts for the same session never lose updates.
  #[instrument(level = "debug", skip(self), fields(section = section.as_str(), %session_id))]
  pub async fn track_attempt(
    &self,
    section: Section,
    session_id: &str,
    at: DateTime<Utc>,
  ) -> Result<AttemptRecord, String> {
    let coll = self.db.collection::<AttemptRecord>(section.attempts_collection());
    coll
      .find_one_and_update(
        doc! { "sessionId": session_id },
        doc! {
          "$inc": { "counter": 1 },
          "$set": { "lastAttempt": chrono_to_bson(at) },
        },
      )
      .upsert(true)
      .return_document(ReturnDocument::After)
      .await
      .map_err(|e| format!("attempt upsert failed: {}", e))?
      .ok_or_else(|| "attempt upsert returned no document".to_string())
  }

  /// Overwrite-in-place submission record. Read-modify-write: two racing
  /// submissions for the same session can interleave (last writer wins);
  /// accepted, the counter is advisory.
  #[instrument(level = "debug", skip(self, assignment, user_response, assessment),
               fields(variant = tag.as_str(), %session_id))]
  pub async fn record_assessment(
    &self,
    tag: VariantTag,
    session_id: &str,
    assignment: &str,
    user_response: &str,
    assessment: &AssessmentResult,
  ) -> Result<(i64, bool), String> {
    let coll = self
      .db
      .collection::<StoredAssessment>(tag.section().assessments_collection());
    let filter = doc! { "sessionId": session_id };

    let existing = coll
      .find_one(filter.clone())
      .await
      .map_err(|e| format!("assessment lookup failed: {}", e))?;

    match existing {
      Some(mut rec) => {
        rec.assignment = assignment.to_string();
        rec.user_response = user_response.to_string();
        rec.assessment = assessment.clone();
        rec.timestamp = BsonDateTime::now();
        rec.counter += 1;
        rec.variant = tag;
        coll
          .replace_one(filter, &rec)
          .await
          .map_err(|e| format!("assessment overwrite failed: {}", e))?;
        Ok((rec.counter, demo_complete(rec.counter)))
      }
      None => {
        let rec = StoredAssessment {
          session_id: session_id.to_string(),
          assignment: assignment.to_string(),
          user_response: user_response.to_string(),
          assessment: assessment.clone(),
          timestamp: BsonDateTime::now(),
          counter: 1,
          variant: tag,
        };
        coll
          .insert_one(&rec)
          .await
          .map_err(|e| format!("assessment insert failed: {}", e))?;
        Ok((1, false))
      }
    }
  }

  /// Global session counter: one well-known document, each session id
  /// counted once. Returns the total number of distinct sessions seen.
  #[instrument(level = "debug", skip(self), fields(%session_id))]
  pub async fn track_session(&self, session_id: &str) -> Result<i64, String> {
    let coll = self.db.collection::<SessionCounter>("session_counter");
    let filter = doc! { "_id": SESSION_COUNTER_KEY };

    match coll
      .find_one(filter.clone())
      .await
      .map_err(|e| format!("session counter lookup failed: {}", e))?
    {
      Some(mut counter) => {
        if !counter.tracked_sessions.iter().any(|s| s == session_id) {
          counter.counter += 1;
          counter.tracked_sessions.push(session_id.to_string());
          coll
            .replace_one(filter, &counter)
            .await
            .map_err(|e| format!("session counter update failed: {}", e))?;
        }
        Ok(counter.counter)
      }
      None => {
        let rec = SessionCounter {
          id: SESSION_COUNTER_KEY.to_string(),
          counter: 1,
          tracked_sessions: vec![session_id.to_string()],
        };
        coll
          .insert_one(&rec)
          .await
          .map_err(|e| format!("session counter insert failed: {}", e))?;
        Ok(1)
      }
    }
  }

  #[instrument(level = "debug", skip(self, sub), fields(section = %sub.section))]
  pub async fn save_subscription(&self, sub: EmailSubscription) -> Result<(), String> {
    let coll = self.db.collection::<EmailSubscription>("subscriptions");
    coll
      .insert_one(&sub)
      .await
      .map_err(|e| format!("subscription insert failed: {}", e))?;
    Ok(())
  }
}
