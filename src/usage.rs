//! Usage aggregation: folding ai_usage documents into monthly totals.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde_json::Value;

use crate::store::Doc;

/// Approximate blended cost applied to every logged token.
pub const COST_PER_TOKEN_USD: f64 = 0.000002;

/// First instant of the calendar month containing `now`.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
    .single()
    .unwrap_or(now)
}

/// Month label in `YYYY-MM` form.
pub fn month_label(now: DateTime<Utc>) -> String {
  format!("{:04}-{:02}", now.year(), now.month())
}

/// Totals folded from a slice of usage-log documents.
#[derive(Debug, Default, PartialEq)]
pub struct MonthlyUsage {
  pub total_tokens: u64,
  pub total_cost: f64,
  // BTreeMap keeps the per-function breakdown deterministic.
  pub calls_by_function: BTreeMap<String, u64>,
}

impl MonthlyUsage {
  pub fn fold(docs: &[Doc]) -> Self {
    let mut out = Self::default();
    for doc in docs {
      out.total_tokens += doc.data.get("tokensUsed").and_then(Value::as_u64).unwrap_or(0);
      out.total_cost += doc.data.get("cost").and_then(Value::as_f64).unwrap_or(0.0);
      if let Some(function) = doc.data.get("function").and_then(Value::as_str) {
        *out.calls_by_function.entry(function.to_string()).or_insert(0) += 1;
      }
    }
    out
  }

  /// Average cost over the matched records. A month with zero records yields
  /// zero instead of a division-by-zero artifact.
  pub fn average_cost_per_call(&self, calls: usize) -> f64 {
    if calls == 0 { 0.0 } else { self.total_cost / calls as f64 }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn usage_doc(function: &str, tokens: u64) -> Doc {
    Doc {
      id: function.to_string(),
      data: json!({
        "function": function,
        "tokensUsed": tokens,
        "cost": tokens as f64 * COST_PER_TOKEN_USD,
      }),
    }
  }

  #[test]
  fn month_start_is_first_midnight() {
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 17, 45, 12).unwrap();
    let start = month_start(now);
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap());
    assert_eq!(month_label(now), "2026-08");
  }

  #[test]
  fn fold_sums_tokens_cost_and_per_function_counts() {
    let docs = vec![
      usage_doc("generateChallenge", 1000),
      usage_doc("generateChallenge", 500),
      usage_doc("matchStudentProblem", 200),
    ];
    let folded = MonthlyUsage::fold(&docs);
    assert_eq!(folded.total_tokens, 1700);
    assert!((folded.total_cost - 1700.0 * COST_PER_TOKEN_USD).abs() < 1e-12);
    assert_eq!(folded.calls_by_function["generateChallenge"], 2);
    assert_eq!(folded.calls_by_function["matchStudentProblem"], 1);
    assert!((folded.average_cost_per_call(3) - folded.total_cost / 3.0).abs() < 1e-12);
  }

  #[test]
  fn empty_month_average_is_zero() {
    let folded = MonthlyUsage::fold(&[]);
    assert_eq!(folded.average_cost_per_call(0), 0.0);
    assert_eq!(folded.total_tokens, 0);
    assert!(folded.calls_by_function.is_empty());
  }

  #[test]
  fn fold_tolerates_malformed_usage_docs() {
    let docs = vec![Doc { id: "x".into(), data: json!({ "cost": "oops" }) }];
    let folded = MonthlyUsage::fold(&docs);
    assert_eq!(folded, MonthlyUsage::default());
  }
}
