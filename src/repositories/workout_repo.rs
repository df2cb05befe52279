use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::WorkoutRepository;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    query_all, query_optional, CompleteWorkout, ExerciseBlock, NewSetLog, NewWorkout,
    SetLogEntry, Workout, WorkoutLog, WorkoutStatus, WorkoutWithBlocks,
};

#[derive(Clone)]
pub struct SqliteWorkoutRepository {
    pool: DbPool,
}

impl SqliteWorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run blocking SQLite work on a pooled connection.
    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    // Workout definitions
    pub async fn create_workout(&self, new: NewWorkout) -> Result<WorkoutWithBlocks> {
        new.validate().map_err(AppError::Validation)?;

        self.run(move |conn| {
            let workout = Workout {
                id: Uuid::new_v4().to_string(),
                user_id: new.user_id,
                title: new.title.trim().to_string(),
                workout_type: new.workout_type,
                status: WorkoutStatus::Scheduled,
                scheduled_date: new.scheduled_date,
                created_at: Utc::now(),
            };

            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO workouts (id, user_id, title, workout_type, status, scheduled_date, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    workout.id,
                    workout.user_id,
                    workout.title,
                    workout.workout_type,
                    workout.status.as_str(),
                    workout.scheduled_date,
                    workout.created_at
                ],
            )?;

            let mut blocks = Vec::with_capacity(new.exercise_blocks.len());
            for (order_index, block) in (0_i32..).zip(new.exercise_blocks) {
                let block = ExerciseBlock {
                    id: Uuid::new_v4().to_string(),
                    workout_id: workout.id.clone(),
                    order_index,
                    exercise_name: block.exercise_name.trim().to_string(),
                    sets: block.sets,
                    reps: block.reps,
                    rest_seconds: block.rest_seconds,
                    tempo: block.tempo,
                    coaching_cues: block.coaching_cues,
                    video_url: block.video_url,
                    notes: block.notes,
                };
                let cues = serde_json::to_string(&block.coaching_cues)
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                tx.execute(
                    "INSERT INTO exercise_blocks
                        (id, workout_id, order_index, exercise_name, sets, reps, rest_seconds,
                         tempo, coaching_cues, video_url, notes)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    params![
                        block.id,
                        block.workout_id,
                        block.order_index,
                        block.exercise_name,
                        block.sets,
                        block.reps,
                        block.rest_seconds,
                        block.tempo,
                        cues,
                        block.video_url,
                        block.notes
                    ],
                )?;
                blocks.push(block);
            }
            tx.commit()?;

            tracing::info!(
                "Created workout {} with {} exercise blocks",
                workout.id,
                blocks.len()
            );

            Ok(WorkoutWithBlocks {
                workout,
                exercise_blocks: blocks,
            })
        })
        .await
    }

    pub async fn find_workout(&self, id: &str) -> Result<Option<WorkoutWithBlocks>> {
        let id = id.to_string();
        self.run(move |conn| {
            let Some(workout) =
                query_optional::<Workout, _>(conn, "SELECT * FROM workouts WHERE id = ?", [&id])?
            else {
                return Ok(None);
            };
            let exercise_blocks = query_all(
                conn,
                "SELECT * FROM exercise_blocks WHERE workout_id = ? ORDER BY order_index",
                [&id],
            )?;
            Ok(Some(WorkoutWithBlocks {
                workout,
                exercise_blocks,
            }))
        })
        .await
    }

    pub async fn update_workout_status(&self, id: &str, status: WorkoutStatus) -> Result<bool> {
        let id = id.to_string();
        self.run(move |conn| {
            let updated = conn.execute(
                "UPDATE workouts SET status = ? WHERE id = ?",
                params![status.as_str(), id],
            )?;
            Ok(updated > 0)
        })
        .await
    }

    // Workout logs
    pub async fn find_workout_log(&self, id: &str) -> Result<Option<WorkoutLog>> {
        let id = id.to_string();
        self.run(move |conn| {
            Ok(query_optional(
                conn,
                "SELECT * FROM workout_logs WHERE id = ?",
                [&id],
            )?)
        })
        .await
    }

    /// Completed workout logs for a user, newest first.
    pub async fn find_history(&self, user_id: &str, limit: i64) -> Result<Vec<WorkoutLog>> {
        let user_id = user_id.to_string();
        self.run(move |conn| {
            Ok(query_all(
                conn,
                "SELECT * FROM workout_logs
                 WHERE user_id = ? AND completed_at IS NOT NULL
                 ORDER BY completed_at DESC
                 LIMIT ?",
                params![user_id, limit],
            )?)
        })
        .await
    }

    pub async fn find_last_completed(&self, user_id: &str) -> Result<Option<WorkoutLog>> {
        Ok(self.find_history(user_id, 1).await?.into_iter().next())
    }

    // Set logs
    pub async fn find_set_logs(&self, workout_log_id: &str) -> Result<Vec<SetLogEntry>> {
        let workout_log_id = workout_log_id.to_string();
        self.run(move |conn| {
            Ok(query_all(
                conn,
                "SELECT * FROM set_logs WHERE workout_log_id = ? ORDER BY logged_at, rowid",
                [&workout_log_id],
            )?)
        })
        .await
    }
}

#[async_trait]
impl WorkoutRepository for SqliteWorkoutRepository {
    async fn load_workout(&self, workout_id: &str) -> Result<Option<WorkoutWithBlocks>> {
        self.find_workout(workout_id).await
    }

    async fn start_session(&self, workout_id: &str, user_id: &str) -> Result<WorkoutLog> {
        let workout_id = workout_id.to_string();
        let user_id = user_id.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE workouts SET status = ? WHERE id = ?",
                params![WorkoutStatus::InProgress.as_str(), workout_id],
            )?;
            if updated == 0 {
                return Err(AppError::NotFound("Workout not found".to_string()));
            }

            let log = WorkoutLog {
                id: Uuid::new_v4().to_string(),
                workout_id,
                user_id,
                started_at: Utc::now(),
                completed_at: None,
                duration_minutes: None,
                mood_before: None,
                mood_after: None,
                perceived_effort: None,
                energy_level: None,
                notes: None,
            };
            tx.execute(
                "INSERT INTO workout_logs (id, workout_id, user_id, started_at) VALUES (?, ?, ?, ?)",
                params![log.id, log.workout_id, log.user_id, log.started_at],
            )?;
            tx.commit()?;

            Ok(log)
        })
        .await
    }

    async fn append_set(&self, set: NewSetLog) -> Result<SetLogEntry> {
        self.run(move |conn| {
            let entry = SetLogEntry {
                id: Uuid::new_v4().to_string(),
                workout_log_id: set.workout_log_id,
                exercise_block_id: set.exercise_block_id,
                set_number: set.set_number,
                weight_kg: set.weight_kg,
                reps_completed: set.reps_completed,
                rpe: set.rpe,
                completed: set.completed,
                logged_at: Utc::now(),
            };
            conn.execute(
                "INSERT INTO set_logs
                    (id, workout_log_id, exercise_block_id, set_number, weight_kg,
                     reps_completed, rpe, completed, logged_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    entry.id,
                    entry.workout_log_id,
                    entry.exercise_block_id,
                    entry.set_number,
                    entry.weight_kg,
                    entry.reps_completed,
                    entry.rpe.map(u8::from),
                    entry.completed,
                    entry.logged_at
                ],
            )?;
            Ok(entry)
        })
        .await
    }

    async fn finalize_session(
        &self,
        workout_log_id: &str,
        workout_id: &str,
        completion: CompleteWorkout,
    ) -> Result<WorkoutLog> {
        let workout_log_id = workout_log_id.to_string();
        let workout_id = workout_id.to_string();
        self.run(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "UPDATE workouts SET status = ? WHERE id = ?",
                params![WorkoutStatus::Completed.as_str(), workout_id],
            )?;
            let updated = tx.execute(
                "UPDATE workout_logs
                 SET completed_at = ?, duration_minutes = ?, mood_before = COALESCE(?, mood_before),
                     mood_after = ?, perceived_effort = ?, energy_level = ?, notes = ?
                 WHERE id = ?",
                params![
                    completion.completed_at,
                    completion.duration_minutes,
                    completion.mood_before,
                    completion.mood_after,
                    completion.perceived_effort,
                    completion.energy_level,
                    completion.notes,
                    workout_log_id
                ],
            )?;
            if updated == 0 {
                return Err(AppError::NotFound("Workout log not found".to_string()));
            }

            let log = query_optional(
                &tx,
                "SELECT * FROM workout_logs WHERE id = ?",
                [&workout_log_id],
            )?
            .ok_or_else(|| AppError::NotFound("Workout log not found".to_string()))?;
            tx.commit()?;

            Ok(log)
        })
        .await
    }
}
