//! Metrics history ring buffer
//!
//! Keeps the last 20 metrics samples of a session for the dashboard chart.

use std::collections::VecDeque;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::client::MetricsSnapshot;

/// Maximum number of samples kept for the chart
pub const HISTORY_CAPACITY: usize = 20;

/// Time format of sample labels
const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// One chart point, captured from a snapshot when it arrived
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySample {
    /// Wall-clock capture time, "HH:MM:SS"
    pub timestamp: String,
    pub requests: u64,
    #[serde(rename = "rateLimited")]
    pub rate_limited: u64,
}

impl HistorySample {
    /// Derive a sample from `snapshot` as captured at `at`.
    pub fn capture<Tz: TimeZone>(snapshot: &MetricsSnapshot, at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            requests: snapshot.total_requests,
            rate_limited: snapshot.rate_limited_requests,
        }
    }
}

/// Parallel chart series derived from the buffer, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub requests: Vec<u64>,
    pub rate_limited: Vec<u64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Bounded FIFO of history samples (max 20)
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<HistorySample>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_CAPACITY),
            capacity: HISTORY_CAPACITY,
        }
    }

    /// Appends a sample, evicting the oldest first if already at capacity
    pub fn append(&mut self, sample: HistorySample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in chronological order (oldest first)
    pub fn iter(&self) -> impl Iterator<Item = &HistorySample> {
        self.samples.iter()
    }

    pub fn to_chart_series(&self) -> ChartSeries {
        let mut series = ChartSeries {
            labels: Vec::with_capacity(self.samples.len()),
            requests: Vec::with_capacity(self.samples.len()),
            rate_limited: Vec::with_capacity(self.samples.len()),
        };
        for sample in &self.samples {
            series.labels.push(sample.timestamp.clone());
            series.requests.push(sample.requests);
            series.rate_limited.push(sample.rate_limited);
        }
        series
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
