//! Domain models: closed difficulty/status enums, typed decode targets for
//! model payloads, and the bulk-seeder topic bank entry.
//!
//! Stored documents themselves stay untyped (`serde_json::Value`) in the
//! store; typed structs live at the decode seam so a malformed completion
//! fails loudly instead of flowing downstream.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Challenge difficulty. Closed set so exhaustiveness is checked at compile
/// time instead of via runtime string comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

  pub fn as_str(self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }

  /// Three-way difficulty → age-group mapping used by the bulk seeder.
  pub fn default_age_group(self) -> &'static str {
    match self {
      Difficulty::Easy => "10-12",
      Difficulty::Medium => "12-14",
      Difficulty::Hard => "14-16",
    }
  }
}

impl std::fmt::Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Lifecycle status of a challenge document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
  Draft,
  Published,
}

/// One solution step of a generated challenge.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStep {
  pub step_number: u32,
  pub instruction: String,
  #[serde(default)] pub hint: String,
  #[serde(default)] pub answer: String,
}

/// Challenge content as returned by the model for `generateChallenge`.
/// `estimated_time` and `points` stay loose (`Value`): the prompt asks for
/// strings but models frequently answer with bare numbers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedChallenge {
  pub title: String,
  pub description: String,
  pub problem: String,
  pub steps: Vec<ChallengeStep>,
  pub concepts: Vec<String>,
  #[serde(default)] pub estimated_time: Value,
  #[serde(default)] pub points: Value,
  #[serde(default)] pub real_world_connection: String,
}

/// Interpretation of a free-text student query (`matchStudentProblem`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
  pub interpretation: String,
  pub relevant_concepts: Vec<String>,
  pub difficulty: Difficulty,
  #[serde(default)] pub search_terms: Vec<String>,
  #[serde(default)] pub encouragement: String,
  #[serde(default)] pub example: String,
}

/// One scheduled activity inside a curriculum week.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
  pub day: String,
  pub activity: String,
  #[serde(default)] pub duration: String,
  #[serde(default)] pub materials: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumWeek {
  pub week_number: u32,
  pub theme: String,
  #[serde(default)] pub concepts: Vec<String>,
  pub activities: Vec<Activity>,
  #[serde(default)] pub real_world_project: String,
  #[serde(default)] pub assessment_ideas: Vec<String>,
}

/// Multi-week plan as returned by the model for `buildCurriculum`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumPlan {
  pub curriculum_title: String,
  #[serde(default)] pub overview: String,
  pub weeks: Vec<CurriculumWeek>,
  #[serde(default)] pub resources_needed: Vec<String>,
  #[serde(default)] pub parent_tips: Vec<String>,
  #[serde(default)] pub success_metrics: Vec<String>,
}

/// Hint payload returned by the model for `generateHint`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintData {
  pub hint: String,
  #[serde(default)] pub encouragement: String,
  #[serde(default)] pub related_concept: String,
}

/// Seeder topic: a math topic paired with a real-world context.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Topic {
  pub name: String,
  pub context: String,
}
