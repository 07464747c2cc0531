//! Request timing measurement

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Timing block of the echo response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub request_start_time: String,
    pub request_end_time: String,
    pub processing_time_ms: u64,
    pub processing_time_seconds: f64,
    pub delay_applied_seconds: u64,
}

impl Timing {
    /// Value for the `X-Processing-Time-Ms` header
    pub fn millis_header(&self) -> String {
        self.processing_time_ms.to_string()
    }

    /// Value for the `X-Processing-Time-Seconds` header, always three decimals
    pub fn seconds_header(&self) -> String {
        format!("{:.3}", self.processing_time_seconds)
    }
}

/// Wall-clock stopwatch started when a request enters the handler
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started_at: DateTime<Utc>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self::started_at(Utc::now())
    }

    pub const fn started_at(started_at: DateTime<Utc>) -> Self {
        Self { started_at }
    }

    /// Stop now and produce the timing block
    pub fn stop(&self, delay_applied_seconds: u64) -> Timing {
        self.stop_at(Utc::now(), delay_applied_seconds)
    }

    pub fn stop_at(&self, ended_at: DateTime<Utc>, delay_applied_seconds: u64) -> Timing {
        // Clock steps backwards clamp to zero
        let elapsed = ended_at.timestamp_millis() - self.started_at.timestamp_millis();
        let processing_time_ms = u64::try_from(elapsed).unwrap_or(0);

        Timing {
            request_start_time: iso8601(self.started_at),
            request_end_time: iso8601(ended_at),
            processing_time_ms,
            processing_time_seconds: millis_to_seconds(processing_time_ms),
            delay_applied_seconds,
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`
pub fn iso8601(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Milliseconds as seconds; whole milliseconds never carry more than three decimals
#[allow(clippy::cast_precision_loss)]
pub fn millis_to_seconds(millis: u64) -> f64 {
    millis as f64 / 1000.0
}
