//! Watch command: the interactive dashboard
//!
//! Reads commands from stdin while redrawing on every view the scheduler
//! publishes. Disconnected, a line is an API key; connected, `logout` ends the
//! session. `quit` or Ctrl-C exits either way.

use crate::cli::{load_config_with_overrides, start_client, WatchArgs};
use crate::poller::PollScheduler;
use crate::view::{render, View};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// One line of user input, interpreted against the connection state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    Logout,
    /// Raw line, handed to the session gate as-is
    Submit(String),
    Ignore,
}

pub fn parse_input(line: &str, connected: bool) -> Input {
    let command = line.trim();
    match command {
        "quit" | "exit" => Input::Quit,
        "logout" if connected => Input::Logout,
        _ if connected => Input::Ignore,
        _ => Input::Submit(line.to_string()),
    }
}

fn draw(view: &View, clear: bool) {
    let mut stdout = std::io::stdout().lock();
    if clear {
        let _ = write!(stdout, "{}", CLEAR_SCREEN);
    }
    let _ = write!(stdout, "{}", render(view));
    let _ = stdout.flush();
}

/// Handle `gatewatch watch` command
pub async fn run_watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config_with_overrides(&args.connection)?;
    if let Some(interval_ms) = args.interval {
        config.poll.interval_ms = interval_ms;
    }
    let client = start_client(&config)?;

    tracing::info!(
        base_url = %client.base_url(),
        interval_ms = config.poll.interval_ms,
        "Starting dashboard"
    );

    let mut scheduler = PollScheduler::new(Arc::new(client), &config.poll);
    let mut views = scheduler.subscribe();
    let clear = !args.no_clear;

    if let Some(ref api_key) = args.api_key {
        if let Err(e) = scheduler.connect(api_key) {
            tracing::warn!(error = %e, "Ignoring --api-key");
        }
    }
    let initial = views.borrow_and_update().clone();
    draw(&initial, clear);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                draw(&view, clear);
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    // Keep watching an established session with no input attached
                    if !scheduler.is_connected() {
                        break;
                    }
                    tracing::debug!("stdin closed, watching until interrupted");
                    stdin_open = false;
                    continue;
                };
                match parse_input(&line, scheduler.is_connected()) {
                    Input::Quit => break,
                    Input::Logout => scheduler.logout(),
                    Input::Submit(candidate) => {
                        if let Err(e) = scheduler.connect(&candidate) {
                            tracing::debug!(error = %e, "Key submission rejected");
                        }
                    }
                    Input::Ignore => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    scheduler.shutdown().await;
    tracing::info!("Dashboard stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_line_is_submitted_raw() {
        assert_eq!(
            parse_input("  abc-123 ", false),
            Input::Submit("  abc-123 ".to_string())
        );
        assert_eq!(parse_input("", false), Input::Submit(String::new()));
    }

    #[test]
    fn test_quit_works_in_both_states() {
        assert_eq!(parse_input("quit", false), Input::Quit);
        assert_eq!(parse_input(" exit ", true), Input::Quit);
    }

    #[test]
    fn test_logout_only_when_connected() {
        assert_eq!(parse_input("logout", true), Input::Logout);
        assert_eq!(
            parse_input("logout", false),
            Input::Submit("logout".to_string())
        );
    }

    #[test]
    fn test_other_input_ignored_while_connected() {
        assert_eq!(parse_input("abc", true), Input::Ignore);
        assert_eq!(parse_input("", true), Input::Ignore);
    }
}
