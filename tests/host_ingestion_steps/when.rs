//! When steps for host ingestion BDD scenarios.

use super::world::{IngestionWorld, run_async};
use eyre::WrapErr;
use hostwatch::critical_point::domain::CriticalPointPatch;
use hostwatch::telemetry::ports::TabularRow;
use rstest_bdd_macros::when;

#[when("the payload is ingested directly")]
fn ingest_payload_directly(world: &mut IngestionWorld) -> Result<(), eyre::Report> {
    let payload = world
        .pending_payloads
        .pop()
        .ok_or_else(|| eyre::eyre!("no pending payload in scenario world"))?;
    run_async(world.ingestion.ingest(payload)).wrap_err("ingest scenario payload")?;
    Ok(())
}

#[when("every payload is ingested directly")]
fn ingest_every_payload(world: &mut IngestionWorld) -> Result<(), eyre::Report> {
    let payloads = std::mem::take(&mut world.pending_payloads);
    run_async(world.ingestion.ingest_batch(payloads)).wrap_err("ingest scenario payloads")?;
    Ok(())
}

#[when("the payload is imported from a spreadsheet row")]
fn import_payload_row(world: &mut IngestionWorld) -> Result<(), eyre::Report> {
    let payload = world
        .pending_payloads
        .pop()
        .ok_or_else(|| eyre::eyre!("no pending payload in scenario world"))?;
    let row = TabularRow::new(2, Some(payload.into_value().to_string()));
    let report = run_async(world.import.import_rows(vec![row]));
    world.last_report = Some(report);
    Ok(())
}

#[when("the rows are imported")]
fn import_rows(world: &mut IngestionWorld) {
    let rows = std::mem::take(&mut world.pending_rows);
    world.last_report = Some(run_async(world.import.import_rows(rows)));
}

#[when(r#"host "{host}" is deleted"#)]
fn delete_host(world: &mut IngestionWorld, host: String) -> Result<(), eyre::Report> {
    run_async(world.ingestion.delete_host(&host)).wrap_err("delete scenario host")?;
    Ok(())
}

#[when("its minimum is updated to {min:f64}")]
fn update_minimum(world: &mut IngestionWorld, min: f64) -> Result<(), eyre::Report> {
    let points = run_async(world.critical_points.list(0, 1)).wrap_err("list critical points")?;
    let point = points
        .first()
        .ok_or_else(|| eyre::eyre!("no critical point in scenario world"))?;
    run_async(world.critical_points.update(
        point.attribute_name().as_str(),
        &CriticalPointPatch::new().set_min(Some(min)),
    ))
    .wrap_err("update critical point minimum")?;
    Ok(())
}
