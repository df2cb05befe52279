mod common;

use chrono::{Duration, Utc};
use tokio_test::{assert_err, assert_ok};

use setpace::error::AppError;
use setpace::models::{CompleteWorkout, NewSetLog, NewWorkout, Rpe, WorkoutStatus};
use setpace::repositories::{SqliteWorkoutRepository, WorkoutRepository};

fn completion(mood_after: u8, completed_at: chrono::DateTime<Utc>) -> CompleteWorkout {
    CompleteWorkout {
        mood_after,
        mood_before: None,
        perceived_effort: Some(6),
        energy_level: None,
        notes: None,
        duration_minutes: 45,
        completed_at,
    }
}

fn new_set(workout_log_id: &str, block_id: &str, set_number: u32) -> NewSetLog {
    NewSetLog {
        workout_log_id: workout_log_id.to_string(),
        exercise_block_id: block_id.to_string(),
        set_number,
        weight_kg: 80.0,
        reps_completed: 6,
        rpe: Some(Rpe::try_from(7u8).unwrap()),
        completed: true,
    }
}

#[tokio::test]
async fn test_create_workout_orders_blocks() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool.clone());

    let mut bench = common::block("Bench Press", 4, Some(120));
    bench.coaching_cues = vec!["Retract scapula".to_string(), "Drive through heels".to_string()];
    let created = common::create_test_workout(
        &pool,
        "athlete",
        vec![bench, common::block("Cable Fly", 3, None)],
    )
    .await;

    let loaded = repo.load_workout(&created.workout.id).await.unwrap().unwrap();
    assert_eq!(loaded.workout.status, WorkoutStatus::Scheduled);
    assert_eq!(loaded.exercise_blocks.len(), 2);
    assert_eq!(loaded.exercise_blocks[0].exercise_name, "Bench Press");
    assert_eq!(loaded.exercise_blocks[0].order_index, 0);
    assert_eq!(loaded.exercise_blocks[0].coaching_cues.len(), 2);
    assert_eq!(loaded.exercise_blocks[1].order_index, 1);
    assert_eq!(loaded.exercise_blocks[1].rest_duration(), 90);
}

#[tokio::test]
async fn test_create_workout_rejects_empty_blocks() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool);

    let result = repo
        .create_workout(NewWorkout {
            user_id: None,
            title: "Rest Day".to_string(),
            workout_type: None,
            scheduled_date: None,
            exercise_blocks: Vec::new(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_load_missing_workout_is_none() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool);

    let loaded = assert_ok!(repo.load_workout("missing").await);
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_start_session_marks_workout_in_progress() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool.clone());
    let workout = common::create_push_workout(&pool, "athlete").await;

    let log = assert_ok!(repo.start_session(&workout.workout.id, "athlete").await);
    assert!(!log.is_completed());

    let stored = repo.find_workout_log(&log.id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, "athlete");

    let workout = repo.find_workout(&workout.workout.id).await.unwrap().unwrap();
    assert_eq!(workout.workout.status, WorkoutStatus::InProgress);
}

#[tokio::test]
async fn test_start_session_for_missing_workout_fails() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool);

    let err = assert_err!(repo.start_session("missing", "athlete").await);
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_set_logs_keep_insertion_order() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool.clone());
    let workout = common::create_push_workout(&pool, "athlete").await;
    let log = repo
        .start_session(&workout.workout.id, "athlete")
        .await
        .unwrap();

    let first_block = &workout.exercise_blocks[0].id;
    let second_block = &workout.exercise_blocks[1].id;
    for (block, number) in [(first_block, 1), (first_block, 2), (second_block, 1)] {
        assert_ok!(repo.append_set(new_set(&log.id, block, number)).await);
    }

    let sets = repo.find_set_logs(&log.id).await.unwrap();
    let order: Vec<(&str, u32)> = sets
        .iter()
        .map(|s| (s.exercise_block_id.as_str(), s.set_number))
        .collect();
    assert_eq!(
        order,
        vec![
            (first_block.as_str(), 1),
            (first_block.as_str(), 2),
            (second_block.as_str(), 1)
        ]
    );
    assert_eq!(sets[0].rpe.map(Rpe::value), Some(7));
}

#[tokio::test]
async fn test_append_set_for_unknown_log_fails() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool.clone());
    let workout = common::create_push_workout(&pool, "athlete").await;

    let err = assert_err!(
        repo.append_set(new_set("missing", &workout.exercise_blocks[0].id, 1))
            .await
    );
    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn test_finalize_session_completes_workout() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool.clone());
    let workout = common::create_push_workout(&pool, "athlete").await;
    let log = repo
        .start_session(&workout.workout.id, "athlete")
        .await
        .unwrap();

    let finished = assert_ok!(
        repo.finalize_session(&log.id, &workout.workout.id, completion(4, Utc::now()))
            .await
    );
    assert!(finished.is_completed());
    assert_eq!(finished.duration_minutes, Some(45));
    assert_eq!(finished.mood_after, Some(4));
    assert_eq!(finished.perceived_effort, Some(6));

    let workout = repo.find_workout(&workout.workout.id).await.unwrap().unwrap();
    assert_eq!(workout.workout.status, WorkoutStatus::Completed);
}

#[tokio::test]
async fn test_finalize_unknown_log_rolls_back() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool.clone());
    let workout = common::create_push_workout(&pool, "athlete").await;

    let err = assert_err!(
        repo.finalize_session("missing", &workout.workout.id, completion(3, Utc::now()))
            .await
    );
    assert!(matches!(err, AppError::NotFound(_)));

    let workout = repo.find_workout(&workout.workout.id).await.unwrap().unwrap();
    assert_eq!(workout.workout.status, WorkoutStatus::Scheduled);
}

#[tokio::test]
async fn test_history_is_newest_first_and_completed_only() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool.clone());
    let now = Utc::now();

    let mut finished = Vec::new();
    for days_ago in [3, 1, 2] {
        let workout = common::create_push_workout(&pool, "athlete").await;
        let log = repo
            .start_session(&workout.workout.id, "athlete")
            .await
            .unwrap();
        repo.finalize_session(
            &log.id,
            &workout.workout.id,
            completion(3, now - Duration::days(days_ago)),
        )
        .await
        .unwrap();
        finished.push(log.id);
    }

    // In progress, never finalized
    let open = common::create_push_workout(&pool, "athlete").await;
    repo.start_session(&open.workout.id, "athlete").await.unwrap();

    let history = repo.find_history("athlete", 10).await.unwrap();
    let ids: Vec<&str> = history.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec![
            finished[1].as_str(),
            finished[2].as_str(),
            finished[0].as_str()
        ]);

    let limited = repo.find_history("athlete", 2).await.unwrap();
    assert_eq!(limited.len(), 2);

    let last = repo.find_last_completed("athlete").await.unwrap().unwrap();
    assert_eq!(last.id, finished[1]);

    assert!(repo.find_history("someone-else", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_workout_status() {
    let pool = common::setup_test_db();
    let repo = SqliteWorkoutRepository::new(pool.clone());
    let workout = common::create_push_workout(&pool, "athlete").await;

    assert!(repo
        .update_workout_status(&workout.workout.id, WorkoutStatus::Skipped)
        .await
        .unwrap());
    assert!(!repo
        .update_workout_status("missing", WorkoutStatus::Skipped)
        .await
        .unwrap());

    let workout = repo.find_workout(&workout.workout.id).await.unwrap().unwrap();
    assert_eq!(workout.workout.status, WorkoutStatus::Skipped);
}
