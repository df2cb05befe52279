use rusqlite::types::Type;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// Rest interval used when a block does not prescribe one.
pub const DEFAULT_REST_SECONDS: u32 = 90;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseBlock {
    pub id: String,
    pub workout_id: String,
    pub order_index: i32,
    pub exercise_name: String,
    pub sets: u32,
    pub reps: Option<String>,
    pub rest_seconds: Option<u32>,
    pub tempo: Option<String>,
    pub coaching_cues: Vec<String>,
    pub video_url: Option<String>,
    pub notes: Option<String>,
}

impl ExerciseBlock {
    pub fn rest_duration(&self) -> u32 {
        self.rest_seconds.unwrap_or(DEFAULT_REST_SECONDS)
    }
}

impl FromSqliteRow for ExerciseBlock {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let cues: String = row.get("coaching_cues")?;
        let coaching_cues = serde_json::from_str(&cues).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
        })?;
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            order_index: row.get("order_index")?,
            exercise_name: row.get("exercise_name")?,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            rest_seconds: row.get("rest_seconds")?,
            tempo: row.get("tempo")?,
            coaching_cues,
            video_url: row.get("video_url")?,
            notes: row.get("notes")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExerciseBlock {
    pub exercise_name: String,
    pub sets: u32,
    pub reps: Option<String>,
    pub rest_seconds: Option<u32>,
    pub tempo: Option<String>,
    #[serde(default)]
    pub coaching_cues: Vec<String>,
    pub video_url: Option<String>,
    pub notes: Option<String>,
}

impl NewExerciseBlock {
    pub fn validate(&self) -> Result<(), String> {
        if self.exercise_name.trim().is_empty() {
            return Err("Exercise name must not be empty".to_string());
        }
        if self.sets == 0 {
            return Err(format!(
                "{} must prescribe at least one set",
                self.exercise_name
            ));
        }
        Ok(())
    }
}
