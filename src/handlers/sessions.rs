use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{FinalizeInput, SetInput, SetLogEntry, WorkoutLog};
use crate::repositories::WorkoutRepository;
use crate::session::{
    ticker, Progression, SessionStore, SessionSummary, SessionView, TickSettings,
    DEFAULT_EXTEND_SECONDS,
};

#[derive(Clone)]
pub struct SessionsState {
    pub repo: Arc<dyn WorkoutRepository>,
    pub store: SessionStore,
    pub tick: TickSettings,
}

// Requests
#[derive(Deserialize)]
pub struct OpenSessionRequest {
    pub workout_id: String,
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct ExtendRestRequest {
    pub seconds: Option<u32>,
}

#[derive(Deserialize)]
pub struct SelectExerciseRequest {
    pub index: usize,
}

// Responses
#[derive(Serialize)]
pub struct StartResponse {
    pub workout_log: WorkoutLog,
    pub session: SessionView,
}

#[derive(Serialize)]
pub struct SetLoggedResponse {
    pub entry: SetLogEntry,
    pub session: SessionView,
}

#[derive(Serialize)]
pub struct RestResponse {
    pub progression: Option<Progression>,
    pub session: SessionView,
}

#[derive(Serialize)]
pub struct ExtendResponse {
    pub extended: bool,
    pub session: SessionView,
}

#[derive(Serialize)]
pub struct FinalizeResponse {
    pub workout_log: WorkoutLog,
    pub summary: SessionSummary,
}

// Handlers
pub async fn open(
    State(state): State<SessionsState>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<Response> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id is required".to_string()));
    }

    let definition = state
        .repo
        .load_workout(&request.workout_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    let (_, session) = state.store.open(&request.user_id, definition).await?;
    let view = session.lock().await.snapshot();

    Ok((StatusCode::CREATED, Json(view)).into_response())
}

pub async fn show(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>> {
    let session = state.store.require(&id).await?;
    let view = session.lock().await.snapshot();
    Ok(Json(view))
}

pub async fn start(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
) -> Result<Json<StartResponse>> {
    let session = state.store.require(&id).await?;
    let mut guard = session.lock().await;

    let workout_log = guard.begin(state.repo.as_ref()).await?.clone();
    ticker::spawn(&session, state.tick);

    Ok(Json(StartResponse {
        workout_log,
        session: guard.snapshot(),
    }))
}

pub async fn pause(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>> {
    let session = state.store.require(&id).await?;
    let mut guard = session.lock().await;
    guard.pause()?;
    Ok(Json(guard.snapshot()))
}

pub async fn resume(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>> {
    let session = state.store.require(&id).await?;
    let mut guard = session.lock().await;
    guard.resume()?;
    Ok(Json(guard.snapshot()))
}

pub async fn log_set(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(input): Json<SetInput>,
) -> Result<Response> {
    let session = state.store.require(&id).await?;
    let mut guard = session.lock().await;

    let entry = guard.log_set(state.repo.as_ref(), input).await?;
    // Zero-second rest never ticks down
    if guard.rest_awaiting_completion() {
        ticker::schedule_rest_completion(&session, state.tick.rest_completion_delay);
    }

    Ok((
        StatusCode::CREATED,
        Json(SetLoggedResponse {
            entry,
            session: guard.snapshot(),
        }),
    )
        .into_response())
}

pub async fn skip_rest(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
) -> Result<Json<RestResponse>> {
    let session = state.store.require(&id).await?;
    let mut guard = session.lock().await;
    let progression = guard.skip_rest()?;
    Ok(Json(RestResponse {
        progression,
        session: guard.snapshot(),
    }))
}

pub async fn extend_rest(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(request): Json<ExtendRestRequest>,
) -> Result<Json<ExtendResponse>> {
    let seconds = request.seconds.unwrap_or(DEFAULT_EXTEND_SECONDS);
    if seconds == 0 {
        return Err(AppError::Validation(
            "Extension must be at least one second".to_string(),
        ));
    }

    let session = state.store.require(&id).await?;
    let mut guard = session.lock().await;
    let extended = guard.extend_rest(seconds)?;
    Ok(Json(ExtendResponse {
        extended,
        session: guard.snapshot(),
    }))
}

pub async fn select_exercise(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(request): Json<SelectExerciseRequest>,
) -> Result<Json<SessionView>> {
    let session = state.store.require(&id).await?;
    let mut guard = session.lock().await;
    guard.select_exercise(request.index)?;
    Ok(Json(guard.snapshot()))
}

pub async fn summary(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>> {
    let session = state.store.require(&id).await?;
    let summary = session.lock().await.summary();
    Ok(Json(summary))
}

pub async fn finalize(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(input): Json<FinalizeInput>,
) -> Result<Json<FinalizeResponse>> {
    let session = state.store.require(&id).await?;
    let (workout_log, summary) = session
        .lock()
        .await
        .finalize(state.repo.as_ref(), input)
        .await?;

    state.store.remove(&id).await;

    Ok(Json(FinalizeResponse {
        workout_log,
        summary,
    }))
}

pub async fn abandon(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let session = state
        .store
        .remove(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;
    session.lock().await.abandon();
    Ok(StatusCode::NO_CONTENT)
}
