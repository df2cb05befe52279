#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;

use setpace::db::{create_memory_pool, DbPool};
use setpace::error::{AppError, Result};
use setpace::handlers::{sessions, workouts};
use setpace::migrations::run_migrations_for_tests;
use setpace::models::{
    CompleteWorkout, NewExerciseBlock, NewSetLog, NewWorkout, SetLogEntry, WorkoutLog,
    WorkoutWithBlocks,
};
use setpace::repositories::{SqliteWorkoutRepository, WorkoutRepository};
use setpace::session::{SessionStore, TickSettings};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

/// Fast clock so rest intervals expire within a test.
pub fn fast_tick_settings() -> TickSettings {
    TickSettings {
        interval: Duration::from_millis(10),
        rest_completion_delay: Duration::from_millis(5),
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: SessionStore,
}

pub fn create_test_app(pool: DbPool) -> Router {
    let repo = Arc::new(SqliteWorkoutRepository::new(pool.clone()));
    create_test_app_with_repo(pool, repo).router
}

pub fn create_test_app_with_repo(pool: DbPool, repo: Arc<dyn WorkoutRepository>) -> TestApp {
    let store = SessionStore::new();

    let sessions_state = sessions::SessionsState {
        repo,
        store: store.clone(),
        tick: fast_tick_settings(),
    };
    let workouts_state = workouts::WorkoutsState {
        workout_repo: SqliteWorkoutRepository::new(pool),
    };

    TestApp {
        router: setpace::routes::create_router(sessions_state, workouts_state),
        store,
    }
}

/// Wraps the SQLite repository and fails set writes on demand.
pub struct FlakyRepository {
    inner: SqliteWorkoutRepository,
    fail_writes: AtomicBool,
}

impl FlakyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            inner: SqliteWorkoutRepository::new(pool),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl WorkoutRepository for FlakyRepository {
    async fn load_workout(&self, workout_id: &str) -> Result<Option<WorkoutWithBlocks>> {
        self.inner.load_workout(workout_id).await
    }

    async fn start_session(&self, workout_id: &str, user_id: &str) -> Result<WorkoutLog> {
        self.inner.start_session(workout_id, user_id).await
    }

    async fn append_set(&self, set: NewSetLog) -> Result<SetLogEntry> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset".to_string()));
        }
        self.inner.append_set(set).await
    }

    async fn finalize_session(
        &self,
        workout_log_id: &str,
        workout_id: &str,
        completion: CompleteWorkout,
    ) -> Result<WorkoutLog> {
        self.inner
            .finalize_session(workout_log_id, workout_id, completion)
            .await
    }
}

// Test data creation helpers
pub fn block(name: &str, sets: u32, rest_seconds: Option<u32>) -> NewExerciseBlock {
    NewExerciseBlock {
        exercise_name: name.to_string(),
        sets,
        reps: Some("10".to_string()),
        rest_seconds,
        tempo: None,
        coaching_cues: Vec::new(),
        video_url: None,
        notes: None,
    }
}

pub async fn create_test_workout(
    pool: &DbPool,
    user_id: &str,
    blocks: Vec<NewExerciseBlock>,
) -> WorkoutWithBlocks {
    let workout_repo = SqliteWorkoutRepository::new(pool.clone());
    workout_repo
        .create_workout(NewWorkout {
            user_id: Some(user_id.to_string()),
            title: "Upper Body // Push".to_string(),
            workout_type: Some("strength".to_string()),
            scheduled_date: None,
            exercise_blocks: blocks,
        })
        .await
        .unwrap()
}

/// Three blocks of three sets: bench, incline, dips.
pub async fn create_push_workout(pool: &DbPool, user_id: &str) -> WorkoutWithBlocks {
    create_test_workout(
        pool,
        user_id,
        vec![
            block("Bench Press", 3, Some(90)),
            block("Incline Dumbbell Press", 3, Some(60)),
            block("Dips", 3, None),
        ],
    )
    .await
}

// Request helpers
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
