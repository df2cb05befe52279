use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, sessions, workouts};

pub fn create_router(
    sessions_state: sessions::SessionsState,
    workouts_state: workouts::WorkoutsState,
) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        .with_state(sessions_state.store.clone())
        // Workout definitions and history
        .route("/workouts", post(workouts::create))
        .route("/workouts/{id}", get(workouts::show))
        .route("/workouts/{id}/status", post(workouts::update_status))
        .route("/users/{user_id}/workout-logs", get(workouts::history))
        .route(
            "/users/{user_id}/workout-logs/last",
            get(workouts::last_completed),
        )
        .route("/workout-logs/{id}/summary", get(workouts::log_summary))
        .with_state(workouts_state)
        // Live sessions
        .route("/sessions", post(sessions::open))
        .route(
            "/sessions/{id}",
            get(sessions::show).delete(sessions::abandon),
        )
        .route("/sessions/{id}/start", post(sessions::start))
        .route("/sessions/{id}/pause", post(sessions::pause))
        .route("/sessions/{id}/resume", post(sessions::resume))
        .route("/sessions/{id}/sets", post(sessions::log_set))
        .route("/sessions/{id}/rest/skip", post(sessions::skip_rest))
        .route("/sessions/{id}/rest/extend", post(sessions::extend_rest))
        .route("/sessions/{id}/exercise", post(sessions::select_exercise))
        .route("/sessions/{id}/summary", get(sessions::summary))
        .route("/sessions/{id}/finalize", post(sessions::finalize))
        .with_state(sessions_state)
}
