use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FromSqliteRow;

pub const MIN_RPE: u8 = 6;
pub const MAX_RPE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("RPE must be between 6 and 10, got {0}")]
pub struct InvalidRpe(pub u8);

/// Rate of perceived exertion on the 6-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rpe(u8);

impl Rpe {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rpe {
    type Error = InvalidRpe;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_RPE..=MAX_RPE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidRpe(value))
        }
    }
}

impl From<Rpe> for u8 {
    fn from(rpe: Rpe) -> Self {
        rpe.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLogEntry {
    pub id: String,
    pub workout_log_id: String,
    pub exercise_block_id: String,
    pub set_number: u32,
    pub weight_kg: f64,
    pub reps_completed: u32,
    pub rpe: Option<Rpe>,
    pub completed: bool,
    pub logged_at: DateTime<Utc>,
}

impl SetLogEntry {
    pub fn volume(&self) -> f64 {
        self.weight_kg * f64::from(self.reps_completed)
    }
}

impl FromSqliteRow for SetLogEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let rpe: Option<u8> = row.get("rpe")?;
        let rpe = rpe
            .map(Rpe::try_from)
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(e)))?;
        Ok(Self {
            id: row.get("id")?,
            workout_log_id: row.get("workout_log_id")?,
            exercise_block_id: row.get("exercise_block_id")?,
            set_number: row.get("set_number")?,
            weight_kg: row.get("weight_kg")?,
            reps_completed: row.get("reps_completed")?,
            rpe,
            completed: row.get("completed")?,
            logged_at: row.get("logged_at")?,
        })
    }
}

/// A validated set ready to be written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSetLog {
    pub workout_log_id: String,
    pub exercise_block_id: String,
    pub set_number: u32,
    pub weight_kg: f64,
    pub reps_completed: u32,
    pub rpe: Option<Rpe>,
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

/// Raw set input as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct SetInput {
    pub weight_kg: f64,
    pub reps_completed: u32,
    pub rpe: Option<u8>,
    #[serde(default = "default_completed")]
    pub completed: bool,
}

impl SetInput {
    pub fn validated_rpe(&self) -> Result<Option<Rpe>, InvalidRpe> {
        self.rpe.map(Rpe::try_from).transpose()
    }

    pub fn validate_weight(&self) -> Result<f64, String> {
        if !self.weight_kg.is_finite() || self.weight_kg < 0.0 {
            return Err(format!(
                "Weight must be a non-negative number, got {}",
                self.weight_kg
            ));
        }
        Ok(self.weight_kg)
    }
}
