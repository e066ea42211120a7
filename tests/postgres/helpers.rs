//! Shared helpers for `PostgreSQL` integration tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::{Connection, RunQueryDsl};
use eyre::{Report, WrapErr};
use mockable::Clock;
use url::Url;
use uuid::Uuid;

/// Environment variable naming the server used for scratch databases.
pub const TEST_DATABASE_URL_ENV: &str = "HOSTWATCH_TEST_DATABASE_URL";

const SCHEMA: &str =
    include_str!("../../migrations/2026-10-01-000000_create_telemetry_tables/up.sql");

/// Connection pool over a scratch database.
pub type TestPgPool = Pool<ConnectionManager<PgConnection>>;

/// Database created for one test and dropped when the value goes away.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Creates a uniquely named database and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the server is unreachable or the schema fails to
    /// apply.
    pub fn create(admin_url: &str) -> Result<Self, Report> {
        let name = format!("hostwatch_test_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::establish(admin_url)
            .wrap_err_with(|| format!("connect to {TEST_DATABASE_URL_ENV}"))?;
        diesel::sql_query(format!("CREATE DATABASE \"{name}\"")).execute(&mut admin)?;

        let mut url = Url::parse(admin_url)?;
        url.set_path(&name);
        let database = Self {
            admin_url: admin_url.to_owned(),
            name,
            url: url.into(),
        };

        let mut connection = PgConnection::establish(&database.url)?;
        connection
            .batch_execute(SCHEMA)
            .wrap_err("apply telemetry schema")?;
        Ok(database)
    }

    /// Builds a small pool over the database.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be opened.
    pub fn pool(&self) -> Result<TestPgPool, Report> {
        Ok(Pool::builder()
            .max_size(4)
            .build(ConnectionManager::new(self.url.as_str()))?)
    }

    fn drop_database(&self) -> Result<(), Report> {
        let mut admin = PgConnection::establish(&self.admin_url)?;
        diesel::sql_query(format!(
            "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
            self.name
        ))
        .execute(&mut admin)?;
        Ok(())
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        if let Err(err) = self.drop_database() {
            tracing::warn!(database = %self.name, error = %err, "failed to drop test database");
        }
    }
}

/// Creates a scratch database when the test server is configured.
///
/// # Errors
///
/// Returns an error when the variable is set but the database cannot be
/// prepared.
pub fn test_database() -> Result<Option<TemporaryDatabase>, Report> {
    match std::env::var(TEST_DATABASE_URL_ENV) {
        Ok(admin_url) => TemporaryDatabase::create(&admin_url).map(Some),
        Err(_) => Ok(None),
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Returns a clock reading `2026-01-01T00:00:00Z` plus `minutes`.
    ///
    /// # Errors
    ///
    /// Returns an error when the instant cannot be represented.
    pub fn at_minute(minutes: i64) -> Result<Self, Report> {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| eyre::eyre!("invalid fixed timestamp"))?;
        Ok(Self(start + chrono::Duration::minutes(minutes)))
    }

    /// Returns the pinned instant.
    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}
