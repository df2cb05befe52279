use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{NewWorkout, WorkoutLog, WorkoutStatus, WorkoutWithBlocks};
use crate::repositories::SqliteWorkoutRepository;
use crate::session::SessionSummary;

const DEFAULT_HISTORY_LIMIT: i64 = 10;
const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_repo: SqliteWorkoutRepository,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    status: WorkoutStatus,
}

#[derive(Serialize)]
pub struct LogSummaryResponse {
    pub workout_log: WorkoutLog,
    pub summary: SessionSummary,
}

pub async fn create(
    State(state): State<WorkoutsState>,
    Json(form): Json<NewWorkout>,
) -> Result<Response> {
    let workout = state.workout_repo.create_workout(form).await?;
    Ok((StatusCode::CREATED, Json(workout)).into_response())
}

pub async fn show(
    State(state): State<WorkoutsState>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutWithBlocks>> {
    let workout = state
        .workout_repo
        .find_workout(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;
    Ok(Json(workout))
}

/// Manual status change, e.g. marking a scheduled workout as skipped.
pub async fn update_status(
    State(state): State<WorkoutsState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<WorkoutWithBlocks>> {
    if !state
        .workout_repo
        .update_workout_status(&id, request.status)
        .await?
    {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }
    tracing::info!("Workout {} marked {}", id, request.status.as_str());

    let workout = state
        .workout_repo
        .find_workout(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;
    Ok(Json(workout))
}

pub async fn history(
    State(state): State<WorkoutsState>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<WorkoutLog>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let logs = state.workout_repo.find_history(&user_id, limit).await?;
    Ok(Json(logs))
}

pub async fn last_completed(
    State(state): State<WorkoutsState>,
    Path(user_id): Path<String>,
) -> Result<Json<WorkoutLog>> {
    let log = state
        .workout_repo
        .find_last_completed(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No completed workouts".to_string()))?;
    Ok(Json(log))
}

/// Summary statistics are never stored; rebuild them from the set logs.
pub async fn log_summary(
    State(state): State<WorkoutsState>,
    Path(log_id): Path<String>,
) -> Result<Json<LogSummaryResponse>> {
    let workout_log = state
        .workout_repo
        .find_workout_log(&log_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout log not found".to_string()))?;

    let blocks = state
        .workout_repo
        .find_workout(&workout_log.workout_id)
        .await?
        .map(|w| w.exercise_blocks)
        .unwrap_or_default();
    let sets = state.workout_repo.find_set_logs(&log_id).await?;

    Ok(Json(LogSummaryResponse {
        summary: SessionSummary::compute(&sets, &blocks),
        workout_log,
    }))
}
