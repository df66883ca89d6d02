//! Snapshot command: one metrics and health fetch, printed once

use crate::cli::{load_config_with_overrides, start_client, SnapshotArgs};
use crate::client::DashboardApi;
use crate::config::AuthFailurePolicy;
use crate::poller::DashboardState;
use crate::view::{derive_view, render, render_json, View};
use chrono::Local;

/// Fetch both endpoints concurrently and derive the resulting view.
///
/// A failed metrics fetch is an error here; there is no earlier snapshot to
/// fall back on.
pub async fn take_snapshot(
    api: &dyn DashboardApi,
    api_key: &str,
) -> Result<View, Box<dyn std::error::Error>> {
    let mut state = DashboardState::new();
    let session = state.connect(api_key)?;

    let (metrics, health) = tokio::join!(
        api.fetch_metrics(&session.credential),
        api.fetch_health()
    );

    let metrics = metrics?;
    state.apply_metrics(
        session.generation,
        Ok(metrics),
        Local::now(),
        AuthFailurePolicy::KeepPolling,
    );
    state.apply_health(session.generation, health);

    Ok(derive_view(&state))
}

/// Handle `gatewatch snapshot` command
pub async fn run_snapshot(args: SnapshotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.connection)?;
    let client = start_client(&config)?;

    let view = take_snapshot(&client, &args.api_key).await?;
    let output = if args.json {
        render_json(&view)?
    } else {
        render(&view)
    };
    println!("{}", output);

    Ok(())
}
