//! Query-string decoding for the filtered attribute listing.
//!
//! The `hosts`, `params`, and `values` keys may repeat; each occurrence adds
//! one alternative to its dimension. `start_date` and `end_date` accept
//! RFC 3339 timestamps, or timestamps without an offset, which are read as
//! UTC.

use crate::server::error::ApiError;
use crate::telemetry::domain::AttributeFilter;
use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Builds an [`AttributeFilter`] from a raw query string.
///
/// Unknown keys are ignored.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] when a timestamp or pagination value
/// cannot be parsed.
pub fn parse_filter_query(query: Option<&str>) -> Result<AttributeFilter, ApiError> {
    let mut hosts = Vec::new();
    let mut names = Vec::new();
    let mut values = Vec::new();
    let mut filter = AttributeFilter::new();

    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "hosts" => hosts.push(value.into_owned()),
            "params" => names.push(value.into_owned()),
            "values" => values.push(value.into_owned()),
            "start_date" => filter = filter.recorded_from(parse_timestamp("start_date", &value)?),
            "end_date" => filter = filter.recorded_until(parse_timestamp("end_date", &value)?),
            "offset" => filter = filter.with_offset(parse_count("offset", &value)?),
            "limit" => filter = filter.with_limit(parse_count("limit", &value)?),
            _ => {}
        }
    }

    Ok(filter
        .with_hosts(hosts)
        .with_attribute_names(names)
        .with_attribute_values(values))
}

fn parse_timestamp(field: &str, text: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ApiError::invalid(format!("{field} is not a valid timestamp: {text}")))
}

fn parse_count(field: &str, text: &str) -> Result<usize, ApiError> {
    let count = text
        .parse()
        .map_err(|_| ApiError::invalid(format!("{field} must be a non-negative integer: {text}")))?;
    checked_count(field, count)
}

/// Rejects pagination counts the database cannot represent as `BIGINT`.
pub(super) fn checked_count(field: &str, count: usize) -> Result<usize, ApiError> {
    if i64::try_from(count).is_err() {
        return Err(ApiError::invalid(format!(
            "{field} must not exceed {}: {count}",
            i64::MAX
        )));
    }
    Ok(count)
}
