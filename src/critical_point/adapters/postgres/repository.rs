//! `PostgreSQL` repository implementation for critical points.

use super::{
    models::{CriticalPointRow, NewCriticalPointRow},
    schema::critical_points,
};
use crate::critical_point::{
    domain::{AttributeName, CriticalPoint, PersistedCriticalPointData, Thresholds},
    ports::{CriticalPointRepository, CriticalPointRepositoryError, CriticalPointRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by critical point adapters.
pub type CriticalPointPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed critical point repository.
#[derive(Debug, Clone)]
pub struct PostgresCriticalPointRepository {
    pool: CriticalPointPgPool,
}

impl PostgresCriticalPointRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CriticalPointPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> CriticalPointRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CriticalPointRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(CriticalPointRepositoryError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(CriticalPointRepositoryError::persistence)?
    }
}

#[async_trait]
impl CriticalPointRepository for PostgresCriticalPointRepository {
    async fn create(&self, point: &CriticalPoint) -> CriticalPointRepositoryResult<()> {
        let name = point.attribute_name().clone();
        let new_row = to_new_row(point);

        self.run_blocking(move |connection| {
            diesel::insert_into(critical_points::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| create_error(name, err))?;
            Ok(())
        })
        .await
    }

    async fn list(
        &self,
        offset: usize,
        limit: usize,
    ) -> CriticalPointRepositoryResult<Vec<CriticalPoint>> {
        let rows_to_skip =
            i64::try_from(offset).map_err(CriticalPointRepositoryError::persistence)?;
        let max_rows = i64::try_from(limit).map_err(CriticalPointRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let rows = page_query(rows_to_skip, max_rows).load::<CriticalPointRow>(connection)?;
            rows.into_iter().map(row_to_critical_point).collect()
        })
        .await
    }

    async fn find(
        &self,
        name: &AttributeName,
    ) -> CriticalPointRepositoryResult<Option<CriticalPoint>> {
        let key = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = critical_points::table
                .find(&key)
                .select(CriticalPointRow::as_select())
                .first::<CriticalPointRow>(connection)
                .optional()?;
            row.map(row_to_critical_point).transpose()
        })
        .await
    }

    async fn update(&self, point: &CriticalPoint) -> CriticalPointRepositoryResult<()> {
        let name = point.attribute_name().clone();
        let thresholds = *point.thresholds();

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(critical_points::table.find(name.as_str()))
                .set((
                    critical_points::min_value.eq(thresholds.min_value),
                    critical_points::max_value.eq(thresholds.max_value),
                    critical_points::exact_value.eq(thresholds.exact_value),
                ))
                .execute(connection)?;
            if updated_count == 0 {
                return Err(CriticalPointRepositoryError::NotFound(name));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, name: &AttributeName) -> CriticalPointRepositoryResult<()> {
        let key = name.clone();
        self.run_blocking(move |connection| {
            let deleted_count =
                diesel::delete(critical_points::table.find(key.as_str())).execute(connection)?;
            if deleted_count == 0 {
                return Err(CriticalPointRepositoryError::NotFound(key));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(point: &CriticalPoint) -> NewCriticalPointRow {
    NewCriticalPointRow {
        attribute_name: point.attribute_name().as_str().to_owned(),
        min_value: point.min_value(),
        max_value: point.max_value(),
        exact_value: point.exact_value(),
        created_at: point.created_at(),
    }
}

fn row_to_critical_point(row: CriticalPointRow) -> CriticalPointRepositoryResult<CriticalPoint> {
    let CriticalPointRow {
        attribute_name,
        min_value,
        max_value,
        exact_value,
        created_at,
    } = row;

    let parsed_name = AttributeName::new(attribute_name)
        .map_err(CriticalPointRepositoryError::invalid_persisted_data)?;

    Ok(CriticalPoint::from_persisted(PersistedCriticalPointData {
        attribute_name: parsed_name,
        thresholds: Thresholds {
            min_value,
            max_value,
            exact_value,
        },
        created_at,
    }))
}

type BoxedCriticalPointQuery = critical_points::BoxedQuery<'static, Pg>;

fn page_query(rows_to_skip: i64, max_rows: i64) -> BoxedCriticalPointQuery {
    critical_points::table
        .order((
            critical_points::created_at.asc(),
            critical_points::attribute_name.asc(),
        ))
        .offset(rows_to_skip)
        .limit(max_rows)
        .into_boxed()
}

fn create_error(name: AttributeName, err: DieselError) -> CriticalPointRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CriticalPointRepositoryError::Duplicate(name)
        }
        _ => CriticalPointRepositoryError::persistence(err),
    }
}
