//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> Json<HealthOut> { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(topic = %body.topic, difficulty = %body.difficulty))]
pub async fn http_generate_challenge(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerateChallengeIn>,
) -> Result<Json<GenerateChallengeOut>, AppError> {
  let out = logic::generate_challenge(&state, body).await?;
  info!(target: "content", challenge_id = %out.challenge_id, "HTTP challenge generated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(student_id = %body.student_id, query_len = body.student_query.len()))]
pub async fn http_match_student_problem(
  State(state): State<Arc<AppState>>,
  Json(body): Json<MatchIn>,
) -> Result<Json<MatchOut>, AppError> {
  let out = logic::match_student_problem(&state, body).await?;
  info!(target: "content", candidates = out.challenges.len(), "HTTP student problem matched");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(parent_id = %body.parent_id, child_age = body.child_age))]
pub async fn http_build_curriculum(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CurriculumIn>,
) -> Result<Json<CurriculumOut>, AppError> {
  let out = logic::build_curriculum(&state, body).await?;
  info!(target: "content", curriculum_id = %out.curriculum_id, "HTTP curriculum built");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(challenge_id = %body.challenge_id, step = body.step_number))]
pub async fn http_generate_hint(
  State(state): State<Arc<AppState>>,
  Json(body): Json<HintIn>,
) -> Result<Json<HintOut>, AppError> {
  let out = logic::generate_hint(&state, body).await?;
  info!(target: "content", "HTTP hint served");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_generate_bulk_content(
  State(state): State<Arc<AppState>>,
) -> Result<Json<BulkOut>, AppError> {
  let out = logic::generate_bulk_content(&state).await?;
  info!(target: "content", generated = out.generated, "HTTP bulk content generated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_usage_stats(
  State(state): State<Arc<AppState>>,
) -> Result<Json<UsageStatsOut>, AppError> {
  let out = logic::usage_stats(&state).await?;
  info!(target: "content", month = %out.month, "HTTP usage stats served");
  Ok(Json(out))
}
