//! Turns monitor logs into the chart's series: extraction, the trailing window
//! and the time labels.
//!
//! The window is anchored at the latest sample in the data, not at the wall
//! clock, so a monitor that stopped reporting still shows its last day.

use chrono::{DateTime, Duration, Utc};

use super::types::MonitorLogRecord;

pub const WINDOW_HOURS: i64 = 24;

pub fn window_length() -> Duration {
    Duration::hours(WINDOW_HOURS)
}

/// Index-aligned timestamps and response times, in log order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    pub response_times: Vec<Option<f64>>,
}

impl TimeSeries {
    pub fn from_records(records: &[MonitorLogRecord]) -> Self {
        let (timestamps, response_times) = records
            .iter()
            .map(|record| (record.created_at, record.response_time))
            .unzip();

        Self {
            timestamps,
            response_times,
        }
    }

    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.timestamps.iter().max().copied()
    }

    /// `None` when there is no sample to anchor the window on.
    pub fn window_start(&self, length: Duration) -> Option<DateTime<Utc>> {
        self.latest().map(|latest| latest - length)
    }

    /// Keeps samples at or after `latest - length` and blanks the others.
    /// Samples outside the window become `None` so the chart shows a gap.
    pub fn window(
        &self,
        length: Duration,
        format_label: impl Fn(DateTime<Utc>) -> String,
    ) -> WindowedSeries {
        let Some(window_start) = self.window_start(length) else {
            return WindowedSeries::default();
        };

        let in_window = self
            .timestamps
            .iter()
            .map(|timestamp| *timestamp >= window_start)
            .collect::<Vec<_>>();

        let chart_data = self
            .response_times
            .iter()
            .zip(&in_window)
            .map(|(response_time, in_window)| response_time.filter(|_| *in_window))
            .collect();

        let time_labels = format_labels(&self.timestamps, &in_window, format_label);

        WindowedSeries {
            window_start: Some(window_start),
            in_window,
            chart_data,
            time_labels,
        }
    }
}

/// Labels for in-window timestamps, empty strings elsewhere so the category
/// axis stays aligned with the data.
pub fn format_labels(
    timestamps: &[DateTime<Utc>],
    in_window: &[bool],
    format_label: impl Fn(DateTime<Utc>) -> String,
) -> Vec<String> {
    timestamps
        .iter()
        .zip(in_window)
        .map(|(timestamp, in_window)| {
            if *in_window {
                format_label(*timestamp)
            } else {
                String::new()
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowedSeries {
    pub window_start: Option<DateTime<Utc>>,
    pub in_window: Vec<bool>,
    pub chart_data: Vec<Option<f64>>,
    pub time_labels: Vec<String>,
}

impl WindowedSeries {
    pub fn len(&self) -> usize {
        self.chart_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chart_data.is_empty()
    }

    pub fn summary(&self) -> WindowSummary {
        let samples = self.in_window.iter().filter(|in_window| **in_window).count();
        let down = self
            .in_window
            .iter()
            .zip(&self.chart_data)
            .filter(|(in_window, value)| **in_window && value.is_none())
            .count();

        WindowSummary {
            samples,
            down,
            max_response_time: self.max_value(),
        }
    }

    pub fn max_value(&self) -> Option<f64> {
        self.chart_data
            .iter()
            .flatten()
            .max_by(|value1, value2| value1.total_cmp(value2))
            .copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowSummary {
    /// Checks inside the window.
    pub samples: usize,
    /// In-window checks without a response time.
    pub down: usize,
    pub max_response_time: Option<f64>,
}
