use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{ExerciseBlock, FromSqliteRow, NewExerciseBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Skipped,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::Scheduled => "scheduled",
            WorkoutStatus::InProgress => "in_progress",
            WorkoutStatus::Completed => "completed",
            WorkoutStatus::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "in_progress" => WorkoutStatus::InProgress,
            "completed" => WorkoutStatus::Completed,
            "skipped" => WorkoutStatus::Skipped,
            _ => WorkoutStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub workout_type: Option<String>,
    pub status: WorkoutStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status: String = row.get("status")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            workout_type: row.get("workout_type")?,
            status: WorkoutStatus::parse(&status),
            scheduled_date: row.get("scheduled_date")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// A workout definition together with its blocks in `order_index` order.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutWithBlocks {
    #[serde(flatten)]
    pub workout: Workout,
    pub exercise_blocks: Vec<ExerciseBlock>,
}

#[derive(Debug, Deserialize)]
pub struct NewWorkout {
    pub user_id: Option<String>,
    pub title: String,
    pub workout_type: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub exercise_blocks: Vec<NewExerciseBlock>,
}

impl NewWorkout {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Workout title must not be empty".to_string());
        }
        if self.exercise_blocks.is_empty() {
            return Err("A workout needs at least one exercise block".to_string());
        }
        self.exercise_blocks.iter().try_for_each(NewExerciseBlock::validate)
    }
}
