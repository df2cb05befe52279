use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::{SharedSession, TickOutcome, REST_COMPLETION_DELAY};

#[derive(Debug, Clone, Copy)]
pub struct TickSettings {
    pub interval: Duration,
    pub rest_completion_delay: Duration,
}

impl Default for TickSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            rest_completion_delay: REST_COMPLETION_DELAY,
        }
    }
}

/// Drive the session clock and rest countdown until the session closes or
/// is dropped from the store.
pub fn spawn(session: &SharedSession, settings: TickSettings) -> JoinHandle<()> {
    let weak = Arc::downgrade(session);

    tokio::spawn(async move {
        let mut interval = time::interval(settings.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;

            let Some(session) = weak.upgrade() else {
                break;
            };
            let mut guard = session.lock().await;
            if guard.is_closed() {
                tracing::debug!("Ticker for session {} stopping", guard.id());
                break;
            }

            if guard.tick() == TickOutcome::RestExpired {
                tracing::debug!("Rest expired in session {}", guard.id());
                drop(guard);
                schedule_rest_completion(&session, settings.rest_completion_delay);
            }
        }
    })
}

/// Run the rest completion callback once `delay` has passed.
pub fn schedule_rest_completion(session: &SharedSession, delay: Duration) {
    let session = Arc::clone(session);
    tokio::spawn(async move {
        time::sleep(delay).await;
        let mut guard = session.lock().await;
        // A skip during the delay has already consumed the interval
        if let Some(progression) = guard.complete_rest() {
            tracing::info!("Session {} advanced: {:?}", guard.id(), progression);
        }
    });
}
