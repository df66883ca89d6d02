//! Terminal rendering for views

use super::{Card, DashboardView, HealthIndicator, Tally, TrafficBreakdown, View};
use crate::history::ChartSeries;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::fmt::Write;

/// Unicode blocks used for sparklines, lowest first
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const TITLE: &str = "API Gateway Dashboard";

/// Render a view as terminal text
pub fn render(view: &View) -> String {
    match view {
        View::Login { error } => render_login(error.as_deref()),
        View::Loading { error, health } => render_loading(error.as_deref(), *health),
        View::Dashboard(dashboard) => render_dashboard(dashboard),
    }
}

/// Render a view as pretty JSON
pub fn render_json(view: &View) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(view)
}

/// Render values as a sparkline scaled between their min and max
pub fn sparkline(values: &[u64]) -> String {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return String::new();
    };
    let range = (max - min).max(1) as f64;

    values
        .iter()
        .map(|&v| {
            let normalized = ((v - min) as f64 / range).clamp(0.0, 1.0);
            let idx = (normalized * (BLOCKS.len() - 1) as f64).round() as usize;
            BLOCKS[idx]
        })
        .collect()
}

fn render_login(error: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE.bold());
    let _ = writeln!(out);
    if let Some(error) = error {
        let _ = writeln!(out, "{}", error.red());
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "Enter API key and press Enter (or 'quit' to exit):");
    out
}

fn render_loading(error: Option<&str>, health: HealthIndicator) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", TITLE.bold(), health_label(health));
    let _ = writeln!(out);
    let _ = writeln!(out, "Loading metrics...");
    if let Some(error) = error {
        let _ = writeln!(out, "{}", error.red());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", footer());
    out
}

fn render_dashboard(dashboard: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", TITLE.bold(), health_label(dashboard.health));
    if let Some(error) = &dashboard.error {
        let _ = writeln!(out, "{}", error.red());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", format_cards_table(&dashboard.cards));
    let _ = writeln!(out);
    let _ = write!(out, "{}", format_chart(&dashboard.chart));
    if !dashboard.breakdown.is_empty() {
        let _ = writeln!(out);
        let _ = write!(out, "{}", format_breakdown(&dashboard.breakdown));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", footer());
    out
}

fn footer() -> String {
    "Type 'logout' to disconnect or 'quit' to exit."
        .dimmed()
        .to_string()
}

fn health_label(health: HealthIndicator) -> String {
    match health {
        HealthIndicator::Healthy => health.label().green().to_string(),
        HealthIndicator::Down => health.label().red().to_string(),
    }
}

fn card_value(card: &Card) -> String {
    let value = match card.unit {
        Some(unit) => format!("{} {}", card.value, unit),
        None => card.value.clone(),
    };
    if card.alert {
        format!("{} ⚠", value).red().bold().to_string()
    } else {
        value
    }
}

/// Format the headline cards as a one-row table
pub fn format_cards_table(cards: &[Card]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(cards.iter().map(|c| c.title).collect::<Vec<_>>());
    table.add_row(cards.iter().map(|c| Cell::new(card_value(c))).collect::<Vec<_>>());
    table.to_string()
}

/// Format the chart series as two labelled sparklines
pub fn format_chart(chart: &ChartSeries) -> String {
    let mut out = String::new();
    let (Some(first), Some(last)) = (chart.labels.first(), chart.labels.last()) else {
        let _ = writeln!(out, "Request history: no samples yet");
        return out;
    };

    let _ = writeln!(
        out,
        "Request history ({} samples, {} - {})",
        chart.len(),
        first,
        last
    );
    let _ = writeln!(
        out,
        "  Requests      {}  {}",
        sparkline(&chart.requests).cyan(),
        chart.requests.last().copied().unwrap_or_default()
    );
    let _ = writeln!(
        out,
        "  Rate Limited  {}  {}",
        sparkline(&chart.rate_limited).yellow(),
        chart.rate_limited.last().copied().unwrap_or_default()
    );
    out
}

fn tally_table(header: [&str; 2], rows: &[Tally]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    for row in rows {
        table.add_row(vec![Cell::new(&row.label), Cell::new(row.count)]);
    }
    table.to_string()
}

/// Format the secondary gateway figures
pub fn format_breakdown(breakdown: &TrafficBreakdown) -> String {
    let mut out = String::new();

    let mut facts = Vec::new();
    if let Some(success) = breakdown.success_count {
        facts.push(format!("Successful: {}", success));
    }
    if let Some(errors) = breakdown.server_errors {
        let text = format!("Server errors: {}", errors);
        facts.push(if errors > 0 {
            text.red().to_string()
        } else {
            text
        });
    }
    if let Some(redis) = breakdown.redis_connected {
        facts.push(if redis {
            "Redis: connected".green().to_string()
        } else {
            "Redis: disconnected".red().to_string()
        });
    }
    if let Some(keys) = breakdown.active_api_keys {
        facts.push(format!("Active keys: {}", keys));
    }
    if !facts.is_empty() {
        let _ = writeln!(out, "{}", facts.join("  |  "));
    }

    if !breakdown.endpoint_hits.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            tally_table(["Endpoint", "Hits"], &breakdown.endpoint_hits)
        );
    }
    if !breakdown.client_usage.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            tally_table(["Client", "Requests"], &breakdown.client_usage)
        );
    }
    out
}
