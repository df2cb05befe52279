use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CompleteWorkout, NewSetLog, SetLogEntry, WorkoutLog, WorkoutWithBlocks};

pub mod workout_repo;

pub use workout_repo::SqliteWorkoutRepository;

/// Storage operations the guided session depends on.
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Workout definition with its blocks ordered by `order_index`.
    async fn load_workout(&self, workout_id: &str) -> Result<Option<WorkoutWithBlocks>>;

    /// Create the workout log for a new session and mark the workout in progress.
    async fn start_session(&self, workout_id: &str, user_id: &str) -> Result<WorkoutLog>;

    async fn append_set(&self, set: NewSetLog) -> Result<SetLogEntry>;

    /// Write completion fields to the log and mark the workout completed.
    async fn finalize_session(
        &self,
        workout_log_id: &str,
        workout_id: &str,
        completion: CompleteWorkout,
    ) -> Result<WorkoutLog>;
}
