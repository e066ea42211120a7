//! Given steps for host ingestion BDD scenarios.

use super::world::{IngestionWorld, run_async};
use eyre::WrapErr;
use hostwatch::critical_point::{domain::Thresholds, services::CreateCriticalPointRequest};
use hostwatch::telemetry::{domain::TelemetryPayload, ports::TabularRow};
use rstest_bdd_macros::given;
use serde_json::json;

#[given(
    r#"a payload for host "{host}" with cpu "{cpu}" and memory sizes {first:u32} and {second:u32}"#
)]
fn a_payload_for_host(
    world: &mut IngestionWorld,
    host: String,
    cpu: String,
    first: u32,
    second: u32,
) -> Result<(), eyre::Report> {
    let payload = TelemetryPayload::from_value(json!({
        "host": host,
        "cpu": cpu,
        "mem": [first, second],
    }))
    .wrap_err("build scenario payload")?;
    world.pending_payloads.push(payload);
    Ok(())
}

#[given("{count:usize} spreadsheet rows where row {bad:usize} holds malformed JSON")]
fn spreadsheet_rows_with_one_malformed(world: &mut IngestionWorld, count: usize, bad: usize) {
    world.pending_rows = (1..=count)
        .map(|position| {
            let cell = if position == bad {
                "{\"host\": \"broken\"".to_owned()
            } else {
                json!({"host": format!("h{position}"), "cpu": "i7"}).to_string()
            };
            // Row 1 of the sheet is the header.
            TabularRow::new(position + 1, Some(cell))
        })
        .collect();
}

#[given(r#"a critical point "{name}" with minimum {min:f64} and maximum {max:f64}"#)]
fn a_critical_point(
    world: &mut IngestionWorld,
    name: String,
    min: f64,
    max: f64,
) -> Result<(), eyre::Report> {
    let request = CreateCriticalPointRequest::new(name)
        .with_thresholds(Thresholds::new().with_min(min).with_max(max));
    run_async(world.critical_points.create(request)).wrap_err("create scenario critical point")?;
    Ok(())
}
