//! Domain models used by the backend: exam sections, variant tags, chart
//! descriptions, and assessment results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A session counts as demo-complete once it has handed in this many
/// submissions for one section.
pub const DEMO_ATTEMPT_LIMIT: i64 = 2;

pub fn demo_complete(counter: i64) -> bool {
  counter >= DEMO_ATTEMPT_LIMIT
}

/// The three exam sections this backend serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
  Writing,
  Reading,
  Listening,
}

impl Section {
  pub fn as_str(&self) -> &'static str {
    match self {
      Section::Writing => "writing",
      Section::Reading => "reading",
      Section::Listening => "listening",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Section::Writing => "Writing",
      Section::Reading => "Reading",
      Section::Listening => "Listening",
    }
  }
}

/// Writing variant: Task 1 (chart description) or Task 2 (essay).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskVariant {
  Task1,
  Task2,
}
impl Default for TaskVariant {
  fn default() -> Self { TaskVariant::Task1 }
}

/// Reading variant: short Section-1 text or longer Section-3 text.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
  Text1,
  Text2,
}
impl Default for TextVariant {
  fn default() -> Self { TextVariant::Text1 }
}

/// Listening variant: Part 1 (conversation) or Part 2 (monologue).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PartVariant {
  Part1,
  Part2,
}
impl Default for PartVariant {
  fn default() -> Self { PartVariant::Part1 }
}

/// Discriminator carried by every assessment: which section and which
/// variant the submission was evaluated against. Serializes as the single
/// key the frontend expects (`taskType`, `textType` or `partType`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum VariantTag {
  Writing {
    #[serde(rename = "taskType")]
    task_type: TaskVariant,
  },
  Reading {
    #[serde(rename = "textType")]
    text_type: TextVariant,
  },
  Listening {
    #[serde(rename = "partType")]
    part_type: PartVariant,
  },
}

impl VariantTag {
  pub fn writing(task_type: TaskVariant) -> Self {
    VariantTag::Writing { task_type }
  }
  pub fn reading(text_type: TextVariant) -> Self {
    VariantTag::Reading { text_type }
  }
  pub fn listening(part_type: PartVariant) -> Self {
    VariantTag::Listening { part_type }
  }

  pub fn section(&self) -> Section {
    match self {
      VariantTag::Writing { .. } => Section::Writing,
      VariantTag::Reading { .. } => Section::Reading,
      VariantTag::Listening { .. } => Section::Listening,
    }
  }

  /// Wire value, e.g. "task1".
  pub fn as_str(&self) -> &'static str {
    match self {
      VariantTag::Writing { task_type: TaskVariant::Task1 } => "task1",
      VariantTag::Writing { task_type: TaskVariant::Task2 } => "task2",
      VariantTag::Reading { text_type: TextVariant::Text1 } => "text1",
      VariantTag::Reading { text_type: TextVariant::Text2 } => "text2",
      VariantTag::Listening { part_type: PartVariant::Part1 } => "part1",
      VariantTag::Listening { part_type: PartVariant::Part2 } => "part2",
    }
  }

  /// Human label, e.g. "Task 1". Used in response messages and prompts.
  pub fn label(&self) -> &'static str {
    match self {
      VariantTag::Writing { task_type: TaskVariant::Task1 } => "Task 1",
      VariantTag::Writing { task_type: TaskVariant::Task2 } => "Task 2",
      VariantTag::Reading { text_type: TextVariant::Text1 } => "Text 1",
      VariantTag::Reading { text_type: TextVariant::Text2 } => "Text 2",
      VariantTag::Listening { part_type: PartVariant::Part1 } => "Part 1",
      VariantTag::Listening { part_type: PartVariant::Part2 } => "Part 2",
    }
  }
}

/// Chart kinds the frontend can render. Anything else normalizes to `Line`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
  Line,
  Bar,
  Pie,
  Doughnut,
}
impl Default for ChartType {
  fn default() -> Self { ChartType::Line }
}

impl ChartType {
  pub fn parse(s: &str) -> ChartType {
    match s {
      "bar" => ChartType::Bar,
      "pie" => ChartType::Pie,
      "doughnut" => ChartType::Doughnut,
      _ => ChartType::Line,
    }
  }
}

/// Data visualization accompanying a Writing Task 1 assignment.
/// Response-scoped; never persisted on its own.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDescription {
  #[serde(rename = "type")]
  pub chart_type: ChartType,
  pub title: String,
  pub x_axis: XAxis,
  pub y_axis: YAxis,
  pub datasets: Vec<Dataset>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct XAxis {
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub values: Vec<String>,
}

/// min/max are absent for non-numeric chart kinds but the fields are always
/// serialized so the frontend sees a stable shape.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct YAxis {
  #[serde(default)]
  pub label: String,
  pub min: Option<f64>,
  pub max: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub color: String,
  #[serde(default)]
  pub data: Vec<f64>,
}

/// One scored criterion inside a structured assessment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CriterionAssessment {
  pub score: f64,
  #[serde(default)]
  pub feedback: String,
  #[serde(default)]
  pub strengths: Vec<String>,
  #[serde(default)]
  pub areas_for_improvement: Vec<String>,
}

/// Multi-criterion evaluation parsed out of model output. Criterion names
/// differ per variant (taskAchievement vs accuracy vs detail, ...), so they
/// live in a map rather than fixed fields.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAssessment {
  pub assessment: BTreeMap<String, CriterionAssessment>,
  #[serde(default)]
  pub overall_band_score: f64,
  #[serde(default)]
  pub specific_improvements: Vec<String>,
  #[serde(default)]
  pub summary: String,
  /// Reading/listening only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub correct_answer: Option<String>,
  /// Injected by the extractor; model output never carries it.
  #[serde(flatten)]
  pub tag: VariantTag,
}

/// Returned instead of a `StructuredAssessment` when extraction fails.
/// Carries the raw model output verbatim; scores are never fabricated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticAssessment {
  pub text_response: String,
  pub error: String,
  #[serde(flatten)]
  pub tag: VariantTag,
}

/// Exactly one of the two shapes; callers discriminate on the variant.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AssessmentResult {
  Structured(StructuredAssessment),
  Diagnostic(DiagnosticAssessment),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn variant_tag_serializes_under_its_section_key() {
    let w = serde_json::to_value(VariantTag::writing(TaskVariant::Task2)).unwrap();
    assert_eq!(w, serde_json::json!({ "taskType": "task2" }));
    let r = serde_json::to_value(VariantTag::reading(TextVariant::Text1)).unwrap();
    assert_eq!(r, serde_json::json!({ "textType": "text1" }));
    let l = serde_json::to_value(VariantTag::listening(PartVariant::Part2)).unwrap();
    assert_eq!(l, serde_json::json!({ "partType": "part2" }));
  }

  #[test]
  fn diagnostic_result_carries_tag_inline() {
    let d = AssessmentResult::Diagnostic(DiagnosticAssessment {
      text_response: "no json here".into(),
      error: "Could not extract structured assessment".into(),
      tag: VariantTag::reading(TextVariant::Text2),
    });
    let v = serde_json::to_value(&d).unwrap();
    assert_eq!(v["textResponse"], "no json here");
    assert_eq!(v["textType"], "text2");
    assert!(v.get("assessment").is_none());
  }

  #[test]
  fn demo_completes_on_second_attempt() {
    assert!(!demo_complete(1));
    assert!(demo_complete(2));
    assert!(demo_complete(5));
  }
}
