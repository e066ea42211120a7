//! Critical point repository tests against `PostgreSQL`.

use super::helpers::{FixedClock, TemporaryDatabase, test_database};
use hostwatch::critical_point::{
    adapters::postgres::PostgresCriticalPointRepository,
    domain::{CriticalPoint, CriticalPointPatch, Thresholds},
    ports::CriticalPointRepositoryError,
    services::{CreateCriticalPointRequest, CriticalPointRegistryService, CriticalPointServiceError},
};
use std::sync::Arc;

type PostgresRegistry = CriticalPointRegistryService<PostgresCriticalPointRepository, FixedClock>;

fn registry_at(
    repository: &Arc<PostgresCriticalPointRepository>,
    minute: i64,
) -> Result<PostgresRegistry, eyre::Report> {
    Ok(CriticalPointRegistryService::new(
        Arc::clone(repository),
        Arc::new(FixedClock::at_minute(minute)?),
    ))
}

fn postgres_repository(
    database: &TemporaryDatabase,
) -> Result<Arc<PostgresCriticalPointRepository>, eyre::Report> {
    Ok(Arc::new(PostgresCriticalPointRepository::new(database.pool()?)))
}

fn names(points: &[CriticalPoint]) -> Vec<&str> {
    points.iter().map(|point| point.attribute_name().as_str()).collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn points_can_be_created_patched_and_deleted() -> Result<(), eyre::Report> {
    let Some(database) = test_database()? else {
        return Ok(());
    };
    let registry = registry_at(&postgres_repository(&database)?, 0)?;

    let created = registry
        .create(
            CreateCriticalPointRequest::new("cpu_temp")
                .with_thresholds(Thresholds::new().with_min(10.0).with_max(90.0)),
        )
        .await?;
    assert_eq!(created.created_at(), FixedClock::at_minute(0)?.instant());

    let patched = registry
        .update(
            "cpu_temp",
            &CriticalPointPatch::new().set_max(None).set_exact(Some(42.0)),
        )
        .await?;
    let expected = Thresholds::new().with_min(10.0).with_exact(42.0);
    assert_eq!(patched.thresholds(), &expected);

    let listed = registry.list(0, 10).await?;
    assert_eq!(names(&listed), vec!["cpu_temp"]);
    assert_eq!(
        listed.iter().map(|point| *point.thresholds()).collect::<Vec<_>>(),
        vec![expected]
    );

    registry.delete("cpu_temp").await?;
    assert!(registry.list(0, 10).await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn second_create_with_the_same_name_is_a_duplicate() -> Result<(), eyre::Report> {
    let Some(database) = test_database()? else {
        return Ok(());
    };
    let registry = registry_at(&postgres_repository(&database)?, 0)?;
    registry.create(CreateCriticalPointRequest::new("cpu_temp")).await?;

    let second = registry.create(CreateCriticalPointRequest::new("cpu_temp")).await;

    assert!(matches!(
        second,
        Err(CriticalPointServiceError::Repository(CriticalPointRepositoryError::Duplicate(name)))
            if name.as_str() == "cpu_temp"
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_points_are_not_found() -> Result<(), eyre::Report> {
    let Some(database) = test_database()? else {
        return Ok(());
    };
    let registry = registry_at(&postgres_repository(&database)?, 0)?;

    let updated = registry
        .update("missing", &CriticalPointPatch::new().set_min(Some(1.0)))
        .await;
    let deleted = registry.delete("missing").await;

    assert!(matches!(
        updated,
        Err(CriticalPointServiceError::Repository(CriticalPointRepositoryError::NotFound(_)))
    ));
    assert!(matches!(
        deleted,
        Err(CriticalPointServiceError::Repository(CriticalPointRepositoryError::NotFound(_)))
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_orders_by_creation_then_name() -> Result<(), eyre::Report> {
    let Some(database) = test_database()? else {
        return Ok(());
    };
    let repository = postgres_repository(&database)?;
    let later = registry_at(&repository, 1)?;
    let earlier = registry_at(&repository, 0)?;
    later.create(CreateCriticalPointRequest::new("b_point")).await?;
    later.create(CreateCriticalPointRequest::new("a_point")).await?;
    earlier.create(CreateCriticalPointRequest::new("z_point")).await?;

    let everything = later.list(0, 10).await?;
    let middle = later.list(1, 1).await?;

    assert_eq!(names(&everything), vec!["z_point", "a_point", "b_point"]);
    assert_eq!(names(&middle), vec!["a_point"]);
    Ok(())
}
