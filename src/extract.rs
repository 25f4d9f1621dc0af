//! Extraction of structured payloads from freeform model output.
//!
//! Generated text is untrusted: the chart object may be wrapped in prose,
//! truncated, or missing fields entirely. Two layered strategies recover it
//! (direct parse from the first brace, then a regex-narrowed reparse) and a
//! seed chart covers everything else, so `extract_chart_payload` never fails.
//!
//! Assessments are the deliberate exception: evaluative scores cannot be
//! fabricated, so a failed extraction yields a diagnostic wrapper carrying
//! the raw text instead of a synthetic result.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::domain::{
  AssessmentResult, ChartDescription, ChartType, Dataset, DiagnosticAssessment,
  StructuredAssessment, VariantTag, XAxis, YAxis,
};
use crate::seeds::fallback_chart;

/// Colors assigned to datasets that arrive without one, cycling by index.
pub const DATASET_PALETTE: [&str; 6] = [
  "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40",
];

lazy_static! {
  // Lenient rescue for chart wrappers the strict parse chokes on. Non-greedy,
  // so it stops at the earliest pair of closing braces; nested objects after
  // the datasets array defeat it (see extractor tests).
  static ref GRAPH_WRAPPER_RE: Regex =
    Regex::new(r#"(?s)\{\s*"graphData"\s*:\s*\{.*?\}\s*\}"#).expect("graph wrapper pattern");
  // Greedy on purpose: first brace to the rightmost one bracketing the
  // literal "assessment" key, since prose commonly precedes the object.
  static ref ASSESSMENT_RE: Regex =
    Regex::new(r#"(?s)\{.*"assessment".*\}"#).expect("assessment pattern");
}

/// Result of chart extraction. Total: `chart` is always shape-valid, falling
/// back to the seed chart when the raw text yields nothing usable.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartExtraction {
  pub assignment_text: String,
  pub chart: ChartDescription,
  pub used_fallback: bool,
}

/// Pull an assignment text and a `graphData` chart out of raw model output.
///
/// Strategy 1: parse from the first `{` to the end of the text and look for
/// the `graphData` wrapper key. Strategy 2: regex-narrowed reparse across the
/// whole text. Whatever candidate survives is normalized and validated; on
/// any failure the seed chart is returned and the entire raw text becomes the
/// assignment.
#[instrument(level = "debug", skip(raw), fields(raw_len = raw.len()))]
pub fn extract_chart_payload(raw: &str) -> ChartExtraction {
  if let Some((assignment_text, candidate)) = locate_graph_candidate(raw) {
    if let Some(chart) = normalize_chart(&candidate) {
      debug!(
        target: "ielts",
        datasets = chart.datasets.len(),
        axis_values = chart.x_axis.values.len(),
        "chart payload extracted"
      );
      return ChartExtraction { assignment_text, chart, used_fallback: false };
    }
    warn!(target: "ielts", "chart candidate failed validation; using fallback chart");
  } else {
    warn!(target: "ielts", "no parsable graphData object in model output; using fallback chart");
  }

  ChartExtraction {
    assignment_text: raw.to_string(),
    chart: fallback_chart(),
    used_fallback: true,
  }
}

/// Locate the `graphData` value and the assignment text preceding it.
fn locate_graph_candidate(raw: &str) -> Option<(String, Value)> {
  // Strategy 1: strict parse from the first opening brace to end of text.
  if let Some(start) = raw.find('{') {
    match serde_json::from_str::<Value>(&raw[start..]) {
      Ok(parsed) => match parsed.get("graphData") {
        Some(graph) => return Some((raw[..start].trim().to_string(), graph.clone())),
        None => debug!(target: "ielts", "parsed object has no graphData key; trying regex rescue"),
      },
      Err(e) => debug!(target: "ielts", error = %e, "strict parse from first brace failed; trying regex rescue"),
    }
  } else {
    debug!(target: "ielts", "no opening brace in model output");
  }

  // Strategy 2: re-parse exactly the regex-bounded wrapper.
  if let Some(m) = GRAPH_WRAPPER_RE.find(raw) {
    if let Ok(parsed) = serde_json::from_str::<Value>(m.as_str()) {
      if let Some(graph) = parsed.get("graphData") {
        return Some((raw[..m.start()].trim().to_string(), graph.clone()));
      }
    }
  }

  None
}

/// Normalize a raw chart candidate into a `ChartDescription`, filling
/// defaults field by field. Returns None when the candidate misses the
/// structural minimum (a non-empty datasets array and an xAxis.values
/// array), which sends the caller to the fallback chart.
fn normalize_chart(candidate: &Value) -> Option<ChartDescription> {
  let obj = candidate.as_object()?;

  let datasets_raw = obj.get("datasets")?.as_array()?;
  if datasets_raw.is_empty() {
    return None;
  }

  let x_obj = obj.get("xAxis");
  let values = match x_obj.and_then(|x| x.get("values")) {
    None | Some(Value::Null) => Vec::new(),
    Some(v) => v.as_array()?.iter().map(stringify_axis_value).collect(),
  };

  let mut datasets = Vec::with_capacity(datasets_raw.len());
  for (idx, ds) in datasets_raw.iter().enumerate() {
    let color = match ds.get("color").and_then(Value::as_str) {
      Some(c) if !c.trim().is_empty() => c.to_string(),
      _ => DATASET_PALETTE[idx % DATASET_PALETTE.len()].to_string(),
    };
    let data: Vec<f64> = ds
      .get("data")
      .and_then(Value::as_array)
      .map(|arr| arr.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect())
      .unwrap_or_default();
    if data.len() != values.len() {
      // Known gap: mismatched lengths pass through unchanged.
      warn!(
        target: "ielts",
        dataset = idx,
        data_points = data.len(),
        axis_values = values.len(),
        "dataset length differs from xAxis values"
      );
    }
    datasets.push(Dataset {
      label: ds.get("label").and_then(Value::as_str).unwrap_or_default().to_string(),
      color,
      data,
    });
  }

  let chart_type = obj
    .get("type")
    .and_then(Value::as_str)
    .map(ChartType::parse)
    .unwrap_or_default();
  let title = non_empty_str(obj.get("title")).unwrap_or("Data Visualization").to_string();

  let y_obj = obj.get("yAxis");
  Some(ChartDescription {
    chart_type,
    title,
    x_axis: XAxis {
      label: non_empty_str(x_obj.and_then(|x| x.get("label"))).unwrap_or("X Axis").to_string(),
      values,
    },
    y_axis: YAxis {
      label: non_empty_str(y_obj.and_then(|y| y.get("label"))).unwrap_or("Y Axis").to_string(),
      min: y_obj.and_then(|y| y.get("min")).and_then(Value::as_f64),
      max: y_obj.and_then(|y| y.get("max")).and_then(Value::as_f64),
    },
    datasets,
  })
}

fn non_empty_str(v: Option<&Value>) -> Option<&str> {
  v.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

/// Axis tick labels are strings on the wire; models occasionally emit years
/// or quantities as bare numbers.
fn stringify_axis_value(v: &Value) -> String {
  match v {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Pull a multi-criterion assessment out of raw model output, tagging it
/// with the variant it was evaluated against. Failure never fabricates a
/// score: the diagnostic shape carries the raw text verbatim instead.
#[instrument(level = "debug", skip(raw), fields(raw_len = raw.len(), variant = tag.as_str()))]
pub fn extract_assessment(raw: &str, tag: VariantTag) -> AssessmentResult {
  let m = match ASSESSMENT_RE.find(raw) {
    Some(m) => m,
    None => {
      warn!(target: "ielts", variant = tag.as_str(), "no assessment object in model output");
      return diagnostic(raw, "Could not extract structured assessment", tag);
    }
  };

  let mut value = match serde_json::from_str::<Value>(m.as_str()) {
    Ok(v) => v,
    Err(e) => {
      error!(target: "ielts", variant = tag.as_str(), error = %e, "assessment object failed to parse");
      return diagnostic(raw, "Error parsing assessment data", tag);
    }
  };

  // Inject the variant discriminator before the typed parse; the model's
  // output never carries it.
  if let Value::Object(ref mut obj) = value {
    if let Ok(Value::Object(tag_obj)) = serde_json::to_value(tag) {
      obj.extend(tag_obj);
    }
  }

  match serde_json::from_value::<StructuredAssessment>(value) {
    Ok(parsed) => {
      debug!(
        target: "ielts",
        variant = tag.as_str(),
        criteria = parsed.assessment.len(),
        overall = parsed.overall_band_score,
        "assessment extracted"
      );
      AssessmentResult::Structured(parsed)
    }
    Err(e) => {
      error!(target: "ielts", variant = tag.as_str(), error = %e, "assessment object failed shape validation");
      diagnostic(raw, "Error parsing assessment data", tag)
    }
  }
}

fn diagnostic(raw: &str, reason: &str, tag: VariantTag) -> AssessmentResult {
  AssessmentResult::Diagnostic(DiagnosticAssessment {
    text_response: raw.to_string(),
    error: reason.to_string(),
    tag,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{TaskVariant, TextVariant};

  fn chart_raw(prefix: &str) -> String {
    format!(
      "{}\n{{\"graphData\": {{\"type\":\"bar\",\"title\":\"T\",\"xAxis\":{{\"label\":\"X\",\"values\":[\"a\",\"b\"]}},\"yAxis\":{{\"label\":\"Y\"}},\"datasets\":[{{\"label\":\"S1\",\"data\":[1,2]}}]}}}}",
      prefix
    )
  }

  #[test]
  fn prose_prefix_then_chart_splits_cleanly() {
    let out = extract_chart_payload(&chart_raw("Here is your chart."));
    assert!(!out.used_fallback);
    assert_eq!(out.assignment_text, "Here is your chart.");
    assert_eq!(out.chart.chart_type, ChartType::Bar);
    assert_eq!(out.chart.title, "T");
    assert_eq!(out.chart.x_axis.values, vec!["a", "b"]);
    // Missing color filled from palette index 0.
    assert_eq!(out.chart.datasets[0].color, DATASET_PALETTE[0]);
    // yAxis min/max absent but present as fields.
    assert_eq!(out.chart.y_axis.min, None);
    assert_eq!(out.chart.y_axis.max, None);
  }

  #[test]
  fn broken_json_falls_back_with_full_raw_text() {
    let raw = "Some prose with broken { json";
    let out = extract_chart_payload(raw);
    assert!(out.used_fallback);
    assert_eq!(out.assignment_text, raw);
    assert_eq!(out.chart, fallback_chart());
  }

  #[test]
  fn extraction_is_total_over_degenerate_inputs() {
    for raw in ["", "no braces at all", "{}", "{\"other\": 1}", "{\"graphData\": 42}"] {
      let out = extract_chart_payload(raw);
      assert!(out.used_fallback, "input {:?} should fall back", raw);
      assert!(!out.chart.datasets.is_empty());
      assert!(out.chart.datasets.iter().all(|d| !d.color.is_empty()));
    }
  }

  #[test]
  fn trailing_prose_is_rescued_by_the_regex_pass() {
    // Strict parse from the first brace fails on the trailing note; the
    // non-greedy wrapper match recovers the object because datasets is the
    // last key inside graphData.
    let raw = chart_raw("Assignment text.") + "\nNote: describe the main trends.";
    let out = extract_chart_payload(&raw);
    assert!(!out.used_fallback);
    assert_eq!(out.assignment_text, "Assignment text.");
    assert_eq!(out.chart.datasets.len(), 1);
  }

  #[test]
  fn colors_cycle_through_the_palette_and_survive_when_present() {
    let raw = r##"{"graphData": {"xAxis":{"values":["a"]},"datasets":[
      {"label":"d0","data":[1]},
      {"label":"d1","color":"#123456","data":[2]},
      {"label":"d2","data":[3]},
      {"label":"d3","data":[4]},
      {"label":"d4","data":[5]},
      {"label":"d5","data":[6]},
      {"label":"d6","data":[7]}
    ]}}"##;
    let out = extract_chart_payload(raw);
    assert!(!out.used_fallback);
    let colors: Vec<&str> = out.chart.datasets.iter().map(|d| d.color.as_str()).collect();
    assert_eq!(colors[0], DATASET_PALETTE[0]);
    assert_eq!(colors[1], "#123456");
    assert_eq!(colors[2], DATASET_PALETTE[2]);
    // Index 6 wraps around to the first palette entry.
    assert_eq!(colors[6], DATASET_PALETTE[0]);
  }

  #[test]
  fn missing_fields_get_defaults_and_numeric_ticks_become_strings() {
    let raw = r#"{"graphData": {"xAxis":{"values":[2010, 2020]},"datasets":[{"data":[5,6]}]}}"#;
    let out = extract_chart_payload(raw);
    assert!(!out.used_fallback);
    assert_eq!(out.chart.chart_type, ChartType::Line);
    assert_eq!(out.chart.title, "Data Visualization");
    assert_eq!(out.chart.x_axis.label, "X Axis");
    assert_eq!(out.chart.y_axis.label, "Y Axis");
    assert_eq!(out.chart.x_axis.values, vec!["2010", "2020"]);
  }

  #[test]
  fn empty_datasets_are_rejected() {
    let raw = r#"{"graphData": {"xAxis":{"values":["a"]},"datasets":[]}}"#;
    let out = extract_chart_payload(raw);
    assert!(out.used_fallback);
  }

  #[test]
  fn non_array_axis_values_are_rejected() {
    let raw = r#"{"graphData": {"xAxis":{"values":"a,b"},"datasets":[{"data":[1]}]}}"#;
    let out = extract_chart_payload(raw);
    assert!(out.used_fallback);
  }

  #[test]
  fn well_formed_chart_passes_through_unchanged_except_defaults() {
    let raw = r##"{"graphData": {"type":"pie","title":"Share","xAxis":{"label":"Region","values":["EU","US"]},"yAxis":{"label":"%","min":0,"max":100},"datasets":[{"label":"2020","color":"#4BC0C0","data":[60,40]}]}}"##;
    let out = extract_chart_payload(raw);
    assert!(!out.used_fallback);
    assert_eq!(out.chart.chart_type, ChartType::Pie);
    assert_eq!(out.chart.y_axis.min, Some(0.0));
    assert_eq!(out.chart.y_axis.max, Some(100.0));
    assert_eq!(out.chart.datasets[0].data, vec![60.0, 40.0]);
    assert_eq!(out.chart.datasets[0].color, "#4BC0C0");
  }

  fn assessment_raw() -> String {
    r#"Here is my evaluation of the submission.
{"assessment": {"taskAchievement": {"score": 6.0, "feedback": "Covers the main trend.", "strengths": ["clear overview"], "areasForImprovement": ["more data comparison"]}, "coherenceAndCohesion": {"score": 7.0, "feedback": "Well linked.", "strengths": ["good paragraphing"], "areasForImprovement": ["vary linkers"]}}, "overallBandScore": 6.5, "specificImprovements": ["Compare figures directly"], "summary": "A solid attempt."}"#
      .to_string()
  }

  #[test]
  fn commentary_prefix_then_assessment_object_parses() {
    let res = extract_assessment(&assessment_raw(), VariantTag::writing(TaskVariant::Task1));
    match res {
      AssessmentResult::Structured(a) => {
        assert_eq!(a.overall_band_score, 6.5);
        assert_eq!(a.tag, VariantTag::writing(TaskVariant::Task1));
        assert_eq!(a.assessment["taskAchievement"].score, 6.0);
        assert_eq!(a.specific_improvements, vec!["Compare figures directly"]);
        assert!(a.correct_answer.is_none());
      }
      AssessmentResult::Diagnostic(d) => panic!("expected structured result, got {:?}", d),
    }
  }

  #[test]
  fn structured_result_serializes_with_variant_key() {
    let res = extract_assessment(&assessment_raw(), VariantTag::writing(TaskVariant::Task2));
    let v = serde_json::to_value(&res).unwrap();
    assert_eq!(v["taskType"], "task2");
    assert_eq!(v["overallBandScore"], 6.5);
    assert_eq!(v["assessment"]["coherenceAndCohesion"]["score"], 7.0);
  }

  #[test]
  fn plain_prose_yields_diagnostic_with_verbatim_text() {
    let raw = "The essay shows good control of grammar but lacks development.";
    let res = extract_assessment(raw, VariantTag::reading(TextVariant::Text1));
    match res {
      AssessmentResult::Diagnostic(d) => {
        assert_eq!(d.text_response, raw);
        assert_eq!(d.error, "Could not extract structured assessment");
        assert_eq!(d.tag, VariantTag::reading(TextVariant::Text1));
      }
      AssessmentResult::Structured(a) => panic!("expected diagnostic, got {:?}", a),
    }
  }

  #[test]
  fn malformed_assessment_object_yields_parse_diagnostic() {
    let raw = r#"Result: {"assessment": {"accuracy": {"score": }}, truncated"#;
    // The greedy scan matches but the JSON inside is broken.
    let res = extract_assessment(raw, VariantTag::listening(crate::domain::PartVariant::Part1));
    match res {
      AssessmentResult::Diagnostic(d) => {
        assert_eq!(d.error, "Error parsing assessment data");
        assert_eq!(d.text_response, raw);
      }
      AssessmentResult::Structured(a) => panic!("expected diagnostic, got {:?}", a),
    }
  }

  #[test]
  fn correct_answer_survives_for_reading_assessments() {
    let raw = r#"{"assessment": {"accuracy": {"score": 8.0, "feedback": "Right answer."}},
      "overallBandScore": 8.0, "specificImprovements": [], "summary": "Correct.",
      "correctAnswer": "Eucalyptus leaves"}"#;
    match extract_assessment(raw, VariantTag::reading(TextVariant::Text1)) {
      AssessmentResult::Structured(a) => {
        assert_eq!(a.correct_answer.as_deref(), Some("Eucalyptus leaves"));
      }
      AssessmentResult::Diagnostic(d) => panic!("expected structured result, got {:?}", d),
    }
  }

  #[test]
  fn wrong_criterion_shape_is_rejected_not_coerced() {
    // Score as a string fails the shape check; diagnostics preserve the raw.
    let raw = r#"{"assessment": {"accuracy": {"score": "eight"}}, "overallBandScore": 8.0}"#;
    match extract_assessment(raw, VariantTag::reading(TextVariant::Text2)) {
      AssessmentResult::Diagnostic(d) => assert_eq!(d.error, "Error parsing assessment data"),
      AssessmentResult::Structured(a) => panic!("expected diagnostic, got {:?}", a),
    }
  }
}
