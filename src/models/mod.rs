pub mod exercise_block;
pub mod from_row;
pub mod set_log;
pub mod workout;
pub mod workout_log;

pub use exercise_block::{ExerciseBlock, NewExerciseBlock, DEFAULT_REST_SECONDS};
pub use from_row::{query_all, query_optional, FromSqliteRow};
pub use set_log::{InvalidRpe, NewSetLog, Rpe, SetInput, SetLogEntry};
pub use workout::{NewWorkout, Workout, WorkoutStatus, WorkoutWithBlocks};
pub use workout_log::{CompleteWorkout, FinalizeInput, WorkoutLog};
