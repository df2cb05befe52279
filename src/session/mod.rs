//! Guided workout session.
//!
//! A [`WorkoutSession`] walks a user through the blocks of one workout:
//! sets are logged against the current block, a rest interval follows every
//! set, and the rest completion moves the cursor forward. All state lives in
//! memory; only the workout log and individual sets are written through the
//! [`WorkoutRepository`].

pub mod cursor;
pub mod rest;
pub mod store;
pub mod summary;
pub mod ticker;
pub mod timer;

use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{
    CompleteWorkout, ExerciseBlock, FinalizeInput, NewSetLog, SetInput, SetLogEntry, Workout,
    WorkoutLog, WorkoutWithBlocks,
};
use crate::repositories::WorkoutRepository;

pub use cursor::{ExerciseAdvance, ExerciseCursor, SetAdvance};
pub use rest::{RestState, RestTimer, DEFAULT_EXTEND_SECONDS, REST_COMPLETION_DELAY};
pub use store::{SessionStore, SharedSession};
pub use summary::{estimated_calories, SessionSummary, CALORIES_PER_KG_VOLUME};
pub use ticker::TickSettings;
pub use timer::SessionTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Opened but not started; no workout log exists yet.
    Ready,
    Active,
    /// The last set of the last block has rested; waiting for finalize.
    AwaitingFinalize,
    Finalized,
    Abandoned,
}

/// What the rest completion did to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progression {
    NextSet {
        exercise_index: usize,
        set_index: u32,
    },
    NextExercise {
        exercise_index: usize,
    },
    ReadyToFinalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Quiet,
    RestExpired,
}

#[derive(Debug)]
pub struct WorkoutSession {
    id: String,
    user_id: String,
    workout: Workout,
    blocks: Vec<ExerciseBlock>,
    cursor: ExerciseCursor,
    timer: SessionTimer,
    rest: RestTimer,
    entries: Vec<SetLogEntry>,
    workout_log: Option<WorkoutLog>,
    phase: SessionPhase,
}

impl WorkoutSession {
    pub fn new(id: String, user_id: String, definition: WorkoutWithBlocks) -> Result<Self> {
        let WorkoutWithBlocks {
            workout,
            exercise_blocks,
        } = definition;
        let cursor = ExerciseCursor::new(exercise_blocks.iter().map(|b| b.sets).collect())
            .ok_or_else(|| {
                AppError::Validation(format!("Workout {} has no exercise blocks", workout.id))
            })?;

        Ok(Self {
            id,
            user_id,
            workout,
            blocks: exercise_blocks,
            cursor,
            timer: SessionTimer::new(),
            rest: RestTimer::new(),
            entries: Vec::new(),
            workout_log: None,
            phase: SessionPhase::Ready,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn blocks(&self) -> &[ExerciseBlock] {
        &self.blocks
    }

    pub fn entries(&self) -> &[SetLogEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> &ExerciseCursor {
        &self.cursor
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn rest(&self) -> &RestTimer {
        &self.rest
    }

    pub fn workout_log(&self) -> Option<&WorkoutLog> {
        self.workout_log.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_block(&self) -> &ExerciseBlock {
        &self.blocks[self.cursor.exercise_index()]
    }

    pub fn is_closed(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Finalized | SessionPhase::Abandoned
        )
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(AppError::SessionClosed);
        }
        Ok(())
    }

    fn active_log_id(&self) -> Result<String> {
        self.workout_log
            .as_ref()
            .map(|log| log.id.clone())
            .ok_or(AppError::NoActiveSession)
    }

    /// Create the backing workout log and start the session clock.
    pub async fn begin(&mut self, repo: &dyn WorkoutRepository) -> Result<&WorkoutLog> {
        self.ensure_open()?;
        if self.workout_log.is_some() {
            return Err(AppError::SessionAlreadyStarted);
        }

        let log = repo.start_session(&self.workout.id, &self.user_id).await?;
        tracing::info!(
            "Session {} started workout {} (log {})",
            self.id,
            self.workout.id,
            log.id
        );

        self.timer.start();
        self.phase = SessionPhase::Active;
        Ok(self.workout_log.insert(log))
    }

    /// Persist one set for the current block and open the rest interval.
    ///
    /// On a failed write nothing is appended and no rest is opened.
    pub async fn log_set(
        &mut self,
        repo: &dyn WorkoutRepository,
        input: SetInput,
    ) -> Result<SetLogEntry> {
        self.ensure_open()?;
        let workout_log_id = self.active_log_id()?;
        if self.phase == SessionPhase::AwaitingFinalize {
            return Err(AppError::AllSetsLogged);
        }
        if self.rest.is_pending() {
            return Err(AppError::RestInProgress);
        }

        let weight_kg = input.validate_weight().map_err(AppError::Validation)?;
        let rpe = input
            .validated_rpe()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let block = self.current_block();
        let rest_seconds = block.rest_duration();
        let new_set = NewSetLog {
            workout_log_id,
            exercise_block_id: block.id.clone(),
            set_number: self.cursor.set_index() + 1,
            weight_kg,
            reps_completed: input.reps_completed,
            rpe,
            completed: input.completed,
        };

        let entry = repo.append_set(new_set).await.map_err(|e| {
            tracing::warn!("Failed to log set for session {}: {}", self.id, e);
            e
        })?;

        tracing::debug!(
            "Session {} logged set {} of {} ({} kg x {})",
            self.id,
            entry.set_number,
            self.current_block().exercise_name,
            entry.weight_kg,
            entry.reps_completed
        );

        self.entries.push(entry.clone());
        self.rest.start(rest_seconds);
        Ok(entry)
    }

    /// True when the rest interval has reached zero but the completion
    /// callback has not run yet. A zero-second rest is in this state as soon
    /// as the set is logged.
    pub fn rest_awaiting_completion(&self) -> bool {
        self.rest.state() == RestState::Expired
    }

    /// One-second step for the session clock and any running rest interval.
    pub fn tick(&mut self) -> TickOutcome {
        match self.phase {
            SessionPhase::Active => {
                self.timer.tick();
                if self.rest.tick() {
                    TickOutcome::RestExpired
                } else {
                    TickOutcome::Quiet
                }
            }
            SessionPhase::AwaitingFinalize => {
                self.timer.tick();
                TickOutcome::Quiet
            }
            SessionPhase::Ready | SessionPhase::Finalized | SessionPhase::Abandoned => {
                TickOutcome::Quiet
            }
        }
    }

    /// Rest completion callback. No-op unless an interval expired or was skipped.
    pub fn complete_rest(&mut self) -> Option<Progression> {
        self.rest.take_finished()?;

        let progression = match self.cursor.advance_set() {
            SetAdvance::NextSet { set_index } => Progression::NextSet {
                exercise_index: self.cursor.exercise_index(),
                set_index,
            },
            SetAdvance::ExerciseComplete => match self.cursor.advance_exercise() {
                ExerciseAdvance::Moved { exercise_index } => {
                    Progression::NextExercise { exercise_index }
                }
                ExerciseAdvance::SessionComplete | ExerciseAdvance::AlreadyComplete => {
                    self.phase = SessionPhase::AwaitingFinalize;
                    Progression::ReadyToFinalize
                }
            },
        };

        tracing::debug!("Session {} rest finished: {:?}", self.id, progression);
        Some(progression)
    }

    pub fn skip_rest(&mut self) -> Result<Option<Progression>> {
        self.ensure_open()?;
        self.rest.skip();
        Ok(self.complete_rest())
    }

    pub fn extend_rest(&mut self, seconds: u32) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.rest.extend(seconds))
    }

    pub fn pause(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.timer.pause();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.timer.resume();
        Ok(())
    }

    /// Jump to a block. Any pending rest interval is dropped.
    pub fn select_exercise(&mut self, index: usize) -> Result<usize> {
        self.ensure_open()?;
        self.rest.discard();
        let selected = self.cursor.select_exercise(index);
        if self.phase == SessionPhase::AwaitingFinalize {
            self.phase = SessionPhase::Active;
        }
        Ok(selected)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::compute(&self.entries, &self.blocks)
    }

    /// Write mood, notes and duration to the workout log and close the session.
    ///
    /// Finalizing with sets still outstanding requires `confirm_early`.
    pub async fn finalize(
        &mut self,
        repo: &dyn WorkoutRepository,
        input: FinalizeInput,
    ) -> Result<(WorkoutLog, SessionSummary)> {
        self.ensure_open()?;
        let workout_log_id = self.active_log_id()?;
        input.validate().map_err(AppError::Validation)?;

        let summary = self.summary();
        if summary.sets_remaining > 0 && !input.confirm_early {
            return Err(AppError::SetsRemaining(summary.sets_remaining));
        }

        let completion = CompleteWorkout {
            mood_after: input.mood,
            mood_before: input.mood_before,
            perceived_effort: input.perceived_effort,
            energy_level: input.energy_level,
            notes: input.trimmed_notes(),
            duration_minutes: self.timer.elapsed_minutes(),
            completed_at: Utc::now(),
        };

        let log = repo
            .finalize_session(&workout_log_id, &self.workout.id, completion)
            .await?;

        tracing::info!(
            "Session {} finalized: {} sets, {} kg volume",
            self.id,
            summary.total_sets,
            summary.total_volume
        );

        self.workout_log = Some(log.clone());
        self.rest.discard();
        self.timer.reset();
        self.phase = SessionPhase::Finalized;
        Ok((log, summary))
    }

    pub fn abandon(&mut self) {
        tracing::info!("Session {} abandoned", self.id);
        self.rest.discard();
        self.timer.reset();
        self.phase = SessionPhase::Abandoned;
    }

    pub fn snapshot(&self) -> SessionView {
        let block = self.current_block();
        SessionView {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            workout_id: self.workout.id.clone(),
            workout_title: self.workout.title.clone(),
            workout_log_id: self.workout_log.as_ref().map(|log| log.id.clone()),
            phase: self.phase,
            exercise_index: self.cursor.exercise_index(),
            set_index: self.cursor.set_index(),
            current_exercise: CurrentExercise {
                id: block.id.clone(),
                name: block.exercise_name.clone(),
                target_sets: block.sets,
                target_reps: block.reps.clone(),
                rest_seconds: block.rest_duration(),
                tempo: block.tempo.clone(),
                coaching_cues: block.coaching_cues.clone(),
            },
            next_exercise: self
                .cursor
                .next_exercise_index()
                .map(|i| self.blocks[i].exercise_name.clone()),
            elapsed_seconds: self.timer.elapsed_seconds(),
            paused: self.timer.is_paused(),
            rest: RestView {
                state: self.rest.state(),
                remaining: self.rest.remaining(),
                total_duration: self.rest.total_duration(),
                progress: self.rest.progress(),
            },
            sets_logged: self.entries.len(),
            total_target_sets: self.cursor.total_target_sets(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentExercise {
    pub id: String,
    pub name: String,
    pub target_sets: u32,
    pub target_reps: Option<String>,
    pub rest_seconds: u32,
    pub tempo: Option<String>,
    pub coaching_cues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestView {
    pub state: RestState,
    pub remaining: u32,
    pub total_duration: u32,
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: String,
    pub user_id: String,
    pub workout_id: String,
    pub workout_title: String,
    pub workout_log_id: Option<String>,
    pub phase: SessionPhase,
    pub exercise_index: usize,
    pub set_index: u32,
    pub current_exercise: CurrentExercise,
    pub next_exercise: Option<String>,
    pub elapsed_seconds: u64,
    pub paused: bool,
    pub rest: RestView,
    pub sets_logged: usize,
    pub total_target_sets: u32,
}
