//! Public request/response DTOs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AssessmentResult, ChartDescription, PartVariant, TaskVariant, TextVariant, VariantTag,
};

/// Body of every attempt/generation request. Fields the handler requires are
/// checked there so a missing sessionId maps to 400, not a deserialization
/// rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptIn {
    pub session_id: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOut {
    pub success: bool,
    pub message: String,
    pub assignment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_data: Option<ChartDescription>,
    /// Attempt counter; only present on tracked (first-variant) routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingAssessmentIn {
    pub session_id: Option<String>,
    pub user_response: Option<String>,
    pub assignment: Option<String>,
    #[serde(default)]
    pub task_type: TaskVariant,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingAssessmentIn {
    pub session_id: Option<String>,
    pub user_response: Option<String>,
    pub assignment: Option<String>,
    #[serde(default)]
    pub text_type: TextVariant,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningAssessmentIn {
    pub session_id: Option<String>,
    pub user_response: Option<String>,
    pub assignment: Option<String>,
    #[serde(default)]
    pub part_type: PartVariant,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOut {
    pub success: bool,
    pub message: String,
    pub assessment: AssessmentResult,
    #[serde(flatten)]
    pub variant: VariantTag,
    pub counter: i64,
    pub demo_complete: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSessionIn {
    pub session_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSessionOut {
    pub success: bool,
    pub message: String,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeIn {
    pub email: Option<String>,
    pub session_id: Option<String>,
    pub section: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeOut {
    pub success: bool,
    pub message: String,
}

/// Shared error body: summarized message, optional detail, never a stack
/// trace.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOut {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub status: &'static str,
    pub time: String,
}
