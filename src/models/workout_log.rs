use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: String,
    pub workout_id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub mood_before: Option<u8>,
    pub mood_after: Option<u8>,
    pub perceived_effort: Option<u8>,
    pub energy_level: Option<u8>,
    pub notes: Option<String>,
}

impl WorkoutLog {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl FromSqliteRow for WorkoutLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            user_id: row.get("user_id")?,
            started_at: row.get("started_at")?,
            completed_at: row.get("completed_at")?,
            duration_minutes: row.get("duration_minutes")?,
            mood_before: row.get("mood_before")?,
            mood_after: row.get("mood_after")?,
            perceived_effort: row.get("perceived_effort")?,
            energy_level: row.get("energy_level")?,
            notes: row.get("notes")?,
        })
    }
}

/// Fields written back to the workout log when a session is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteWorkout {
    pub mood_after: u8,
    pub mood_before: Option<u8>,
    pub perceived_effort: Option<u8>,
    pub energy_level: Option<u8>,
    pub notes: Option<String>,
    pub duration_minutes: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeInput {
    pub mood: u8,
    pub mood_before: Option<u8>,
    pub notes: Option<String>,
    pub perceived_effort: Option<u8>,
    pub energy_level: Option<u8>,
    #[serde(default)]
    pub confirm_early: bool,
}

fn check_scale(name: &str, value: Option<u8>, min: u8, max: u8) -> Result<(), String> {
    match value {
        Some(v) if !(min..=max).contains(&v) => {
            Err(format!("{name} must be between {min} and {max}, got {v}"))
        }
        _ => Ok(()),
    }
}

impl FinalizeInput {
    pub fn validate(&self) -> Result<(), String> {
        check_scale("Mood", Some(self.mood), 1, 5)?;
        check_scale("Mood before", self.mood_before, 1, 5)?;
        check_scale("Perceived effort", self.perceived_effort, 1, 10)?;
        check_scale("Energy level", self.energy_level, 1, 5)
    }

    /// Blank notes are stored as absent.
    pub fn trimmed_notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(mood: u8) -> FinalizeInput {
        FinalizeInput {
            mood,
            mood_before: None,
            notes: None,
            perceived_effort: None,
            energy_level: None,
            confirm_early: false,
        }
    }

    #[test]
    fn test_finalize_mood_range() {
        assert!(input(1).validate().is_ok());
        assert!(input(5).validate().is_ok());
        assert!(input(0).validate().is_err());
        assert!(input(6).validate().is_err());
    }

    #[test]
    fn test_finalize_optional_scales() {
        let mut finalize = input(3);
        finalize.perceived_effort = Some(10);
        finalize.energy_level = Some(5);
        assert!(finalize.validate().is_ok());

        finalize.perceived_effort = Some(11);
        assert!(finalize.validate().is_err());
    }

    #[test]
    fn test_trimmed_notes_drops_blank() {
        let mut finalize = input(3);
        finalize.notes = Some("   ".to_string());
        assert_eq!(finalize.trimmed_notes(), None);

        finalize.notes = Some(" felt strong ".to_string());
        assert_eq!(finalize.trimmed_notes(), Some("felt strong".to_string()));
    }
}
