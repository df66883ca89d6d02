//! Poll scheduler: drives the fetch client while a session is connected.
//!
//! Connecting starts a background loop that fetches `/metrics` and `/health`
//! immediately and then on every interval tick. Each tick spawns the two
//! fetches as separate tasks so neither can hold the other up. Logging out
//! cancels the loop and bumps the session generation under the state lock;
//! any response that arrives afterwards fails the generation check and is
//! dropped.
//!
//! Every applied change republishes the derived [`View`] on a watch channel.

mod state;


pub use state::DashboardState;

use crate::client::DashboardApi;
use crate::config::{AuthFailurePolicy, PollConfig};
use crate::session::{ActiveSession, SessionError};
use crate::view::{derive_view, View};
use chrono::Local;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Session context shared by the scheduler and its fetch tasks.
///
/// Never held across an `.await`.
pub type SharedState = Arc<Mutex<DashboardState>>;

fn lock(state: &Mutex<DashboardState>) -> MutexGuard<'_, DashboardState> {
    // A panicking fetch task must not take the dashboard down with it
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handles shared by the loop and every task it spawns.
#[derive(Clone)]
struct PollContext {
    api: Arc<dyn DashboardApi>,
    state: SharedState,
    views: Arc<watch::Sender<View>>,
    policy: AuthFailurePolicy,
}

impl PollContext {
    /// Recompute the view and publish it. Caller holds the state lock.
    fn publish(&self, state: &DashboardState) {
        self.views.send_replace(derive_view(state));
    }
}

/// Running poll loop of one session.
struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Starts and stops polling with the connection state.
pub struct PollScheduler {
    context: PollContext,
    interval: Duration,
    polling: Option<PollHandle>,
}

impl PollScheduler {
    pub fn new(api: Arc<dyn DashboardApi>, config: &PollConfig) -> Self {
        let state = DashboardState::new();
        let (views, _) = watch::channel(derive_view(&state));

        Self {
            context: PollContext {
                api,
                state: Arc::new(Mutex::new(state)),
                views: Arc::new(views),
                policy: config.on_auth_failure,
            },
            interval: config.interval(),
            polling: None,
        }
    }

    /// Receiver of the latest view; updated after every applied change.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.context.views.subscribe()
    }

    /// The current view, derived now.
    pub fn view(&self) -> View {
        derive_view(&lock(&self.context.state))
    }

    pub fn state(&self) -> SharedState {
        Arc::clone(&self.context.state)
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.context.state).is_connected()
    }

    /// True while a poll loop task is alive.
    pub fn is_polling(&self) -> bool {
        self.polling
            .as_ref()
            .is_some_and(|handle| !handle.task.is_finished())
    }

    /// Submit `candidate` and, if it is non-blank, start polling with it.
    ///
    /// A blank candidate leaves any running session polling. A valid one
    /// replaces it. Must be called from within a tokio runtime.
    pub fn connect(&mut self, candidate: &str) -> Result<(), SessionError> {
        let session = {
            let mut state = lock(&self.context.state);
            let result = state.connect(candidate);
            self.context.publish(&state);
            result?
        };
        // The old generation is already stale; its loop exits here
        self.stop();

        tracing::info!(
            api_key = %session.credential.redacted(),
            generation = session.generation,
            interval_ms = self.interval.as_millis() as u64,
            "Session connected, polling started"
        );

        let cancel = CancellationToken::new();
        let task = spawn_poll_loop(
            self.context.clone(),
            session,
            self.interval,
            cancel.clone(),
        );
        self.polling = Some(PollHandle { cancel, task });
        Ok(())
    }

    /// Stop polling and reset the session. Responses still in flight are
    /// dropped when they arrive.
    pub fn logout(&mut self) {
        self.stop();
        let mut state = lock(&self.context.state);
        state.logout();
        self.context.publish(&state);
        tracing::info!("Session logged out, polling stopped");
    }

    /// Cancel the loop without waiting for it.
    fn stop(&mut self) {
        if let Some(handle) = self.polling.take() {
            handle.cancel.cancel();
        }
    }

    /// Cancel polling and wait for the loop task to exit.
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.polling.take() {
            handle.cancel.cancel();
            if let Err(e) = handle.task.await {
                tracing::warn!(error = %e, "Poll loop ended abnormally");
            }
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_poll_loop(
    context: PollContext,
    session: ActiveSession,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // First tick completes immediately: connecting polls right away
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(generation = session.generation, "Poll loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    // The session may have ended without a logout call
                    // (auth-failure disconnect policy)
                    if !lock(&context.state).gate().is_current(session.generation) {
                        tracing::debug!(generation = session.generation, "Session ended, poll loop exiting");
                        break;
                    }
                    tokio::spawn(poll_metrics(context.clone(), session.clone(), cancel.clone()));
                    tokio::spawn(poll_health(context.clone(), session.generation, cancel.clone()));
                }
            }
        }
    })
}

async fn poll_metrics(context: PollContext, session: ActiveSession, cancel: CancellationToken) {
    let result = tokio::select! {
        _ = cancel.cancelled() => return,
        result = context.api.fetch_metrics(&session.credential) => result,
    };

    let outcome = crate::logging::outcome_label(&result);
    if let Err(e) = &result {
        tracing::debug!(error = ?e, "Metrics poll failed");
    }

    let mut state = lock(&context.state);
    if state.apply_metrics(session.generation, result, Local::now(), context.policy) {
        metrics::counter!("gatewatch_polls_total", "endpoint" => "metrics", "outcome" => outcome)
            .increment(1);
        if !state.is_connected() {
            tracing::warn!(
                error = state.error().unwrap_or_default(),
                "Metrics request rejected, disconnecting"
            );
        }
        context.publish(&state);
    } else {
        metrics::counter!("gatewatch_stale_responses_total", "endpoint" => "metrics").increment(1);
        tracing::trace!(generation = session.generation, "Dropped stale metrics response");
    }
}

async fn poll_health(context: PollContext, generation: u64, cancel: CancellationToken) {
    let health = tokio::select! {
        _ = cancel.cancelled() => return,
        health = context.api.fetch_health() => health,
    };

    let outcome = if health.is_healthy() { "healthy" } else { "down" };

    let mut state = lock(&context.state);
    if state.apply_health(generation, health) {
        metrics::counter!("gatewatch_polls_total", "endpoint" => "health", "outcome" => outcome)
            .increment(1);
        context.publish(&state);
    } else {
        metrics::counter!("gatewatch_stale_responses_total", "endpoint" => "health").increment(1);
        tracing::trace!(generation, "Dropped stale health response");
    }
}
