//! Unit tests for the telemetry bounded context.


use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Mutex;

use crate::telemetry::domain::TelemetryPayload;

/// Clock that starts at a fixed instant and advances one minute per reading.
pub(super) struct StepClock {
    next: Mutex<DateTime<Utc>>,
}

impl StepClock {
    pub(super) fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::starting_at(epoch())
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock lock should not be poisoned");
        let now = *next;
        *next = now + Duration::minutes(1);
        now
    }
}

pub(super) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

pub(super) fn minutes_after_epoch(minutes: i64) -> DateTime<Utc> {
    epoch() + Duration::minutes(minutes)
}

pub(super) fn payload(value: Value) -> TelemetryPayload {
    TelemetryPayload::from_value(value).expect("test payload should be an object")
}

pub(super) fn sample_payload(host: &str) -> TelemetryPayload {
    payload(json!({"host": host, "cpu": "i7", "mem": [8, 16]}))
}
