//! Public request/response DTOs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//! Wire field names are camelCase throughout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Difficulty, HintData, MatchData};

/// Error body for every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

//
// generateChallenge
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateChallengeIn {
    pub topic: String,
    pub real_world_context: String,
    pub difficulty: Difficulty,
    pub age_group: String,
    pub educator_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateChallengeOut {
    pub success: bool,
    pub challenge_id: String,
    pub challenge: Value,
}

//
// matchStudentProblem
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchIn {
    pub student_query: String,
    pub student_id: String,
    pub grade_level: String,
}

#[derive(Debug, Serialize)]
pub struct MatchOut {
    pub success: bool,
    #[serde(rename = "match")]
    pub matched: MatchData,
    pub challenges: Vec<Value>,
}

//
// buildCurriculum
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumIn {
    pub parent_id: String,
    pub child_age: u32,
    pub child_grade: String,
    pub learning_goals: String,
    pub time_per_week: u32,
    pub interests: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumOut {
    pub success: bool,
    pub curriculum_id: String,
    pub curriculum: Value,
}

//
// generateHint
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintIn {
    pub challenge_id: String,
    pub step_number: usize,
    pub student_work: String,
    pub hints_used: u32,
}

#[derive(Debug, Serialize)]
pub struct HintOut {
    pub success: bool,
    pub hint: HintData,
}

//
// generateBulkContent
//

#[derive(Debug, Serialize)]
pub struct BulkOut {
    pub success: bool,
    pub generated: usize,
    pub message: String,
}

//
// getUsageStats
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatsOut {
    pub month: String,
    pub total_tokens: u64,
    pub estimated_cost: String,
    pub calls_by_function: BTreeMap<String, u64>,
    pub average_cost_per_call: String,
}
