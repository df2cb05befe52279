use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use setpace::config::Config;
use setpace::handlers::{sessions, workouts};
use setpace::repositories::SqliteWorkoutRepository;
use setpace::session::{SessionStore, TickSettings};
use setpace::version::GIT_VERSION;
use setpace::{db, migrations, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "setpace=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("setpace {}", GIT_VERSION);
    tracing::info!("Connecting to database: {}", config.database_url);

    // Create database pool
    let pool = db::create_pool(&config.database_url)?;

    // Run migrations
    migrations::run_migrations(&pool)?;

    // Create repositories
    let workout_repo = SqliteWorkoutRepository::new(pool.clone());

    // Create handler states
    let sessions_state = sessions::SessionsState {
        repo: Arc::new(workout_repo.clone()),
        store: SessionStore::new(),
        tick: TickSettings {
            interval: config.tick_interval(),
            rest_completion_delay: config.rest_completion_delay(),
        },
    };
    let workouts_state = workouts::WorkoutsState {
        workout_repo: workout_repo.clone(),
    };

    // Build router
    let app = routes::create_router(sessions_state, workouts_state);

    // Start server
    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
