use serde::Serialize;

use crate::models::{ExerciseBlock, SetLogEntry};

/// Calories per kilogram of volume. A rough heuristic, kept fixed.
pub const CALORIES_PER_KG_VOLUME: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_sets: u32,
    pub total_reps: u64,
    pub total_volume: f64,
    pub estimated_calories: u64,
    pub average_rpe: Option<f64>,
    pub sets_remaining: u32,
}

pub fn estimated_calories(total_volume: f64) -> u64 {
    (total_volume.max(0.0) * CALORIES_PER_KG_VOLUME).round() as u64
}

impl SessionSummary {
    /// Failed sets count exactly like completed ones.
    pub fn compute(entries: &[SetLogEntry], blocks: &[ExerciseBlock]) -> Self {
        let total_sets = u32::try_from(entries.len()).unwrap_or(u32::MAX);
        let total_reps = entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(u64::from(e.reps_completed)));
        let total_volume: f64 = entries.iter().map(SetLogEntry::volume).sum();

        let rpes: Vec<f64> = entries
            .iter()
            .filter_map(|e| e.rpe)
            .map(|rpe| f64::from(rpe.value()))
            .collect();
        let average_rpe =
            (!rpes.is_empty()).then(|| rpes.iter().sum::<f64>() / rpes.len() as f64);

        let target_sets = blocks
            .iter()
            .fold(0u64, |acc, b| acc.saturating_add(u64::from(b.sets)));
        let sets_remaining = target_sets.saturating_sub(u64::from(total_sets));

        Self {
            total_sets,
            total_reps,
            total_volume,
            estimated_calories: estimated_calories(total_volume),
            average_rpe,
            sets_remaining: u32::try_from(sets_remaining).unwrap_or(u32::MAX),
        }
    }
}
