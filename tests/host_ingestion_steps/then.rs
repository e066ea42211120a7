//! Then steps for host ingestion BDD scenarios.

use super::world::{IngestionWorld, run_async};
use rstest_bdd_macros::then;

#[then(r#"host "{host}" has {count:usize} attribute rows"#)]
fn host_has_rows(world: &IngestionWorld, host: String, count: usize) -> Result<(), eyre::Report> {
    let rows = run_async(world.ingestion.attributes_for_host(&host))
        .map_err(|err| eyre::eyre!("attribute lookup failed: {err}"))?;
    eyre::ensure!(
        rows.len() == count,
        "expected {count} rows for {host}, found {}",
        rows.len()
    );
    Ok(())
}

#[then(r#"attribute "{name}" of host "{host}" has value "{value}""#)]
fn attribute_has_value(
    world: &IngestionWorld,
    name: String,
    host: String,
    value: String,
) -> Result<(), eyre::Report> {
    let rows = run_async(world.ingestion.attributes_for_host(&host))
        .map_err(|err| eyre::eyre!("attribute lookup failed: {err}"))?;
    eyre::ensure!(
        rows.iter()
            .any(|row| row.attribute_name() == name && row.attribute_value() == value),
        "no row {name} = {value} for {host}"
    );
    Ok(())
}

#[then("the import reports {processed:usize} processed rows and {failed:usize} failure")]
fn import_reports(
    world: &IngestionWorld,
    processed: usize,
    failed: usize,
) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing import report in scenario world"))?;
    eyre::ensure!(
        report.processed_count == processed,
        "expected {processed} processed rows, got {}",
        report.processed_count
    );
    eyre::ensure!(
        report.failed_rows.len() == failed,
        "expected {failed} failures, got {}",
        report.failed_rows.len()
    );
    Ok(())
}

#[then(r#"critical point "{name}" has minimum {min:f64} and maximum {max:f64}"#)]
fn critical_point_has_thresholds(
    world: &IngestionWorld,
    name: String,
    min: f64,
    max: f64,
) -> Result<(), eyre::Report> {
    let points = run_async(world.critical_points.list(0, 10))
        .map_err(|err| eyre::eyre!("listing failed: {err}"))?;
    let point = points
        .iter()
        .find(|point| point.attribute_name().as_str() == name)
        .ok_or_else(|| eyre::eyre!("critical point {name} not found"))?;
    eyre::ensure!(
        point.min_value() == Some(min) && point.max_value() == Some(max),
        "unexpected thresholds {:?}",
        point.thresholds()
    );
    Ok(())
}
