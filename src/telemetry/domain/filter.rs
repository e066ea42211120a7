//! Multi-dimensional predicate over attribute rows.

use super::AttributeRow;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Filter criteria for attribute row queries.
///
/// Each non-empty dimension narrows the result (dimensions are AND-combined);
/// the values inside one dimension are alternatives (OR-combined). Time
/// bounds are inclusive on both ends. Matches are returned in
/// [`row_order`] and `offset`/`limit` page through that order. Without them
/// the full matching set is returned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeFilter {
    hosts: BTreeSet<String>,
    attribute_names: BTreeSet<String>,
    attribute_values: BTreeSet<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    offset: Option<usize>,
    limit: Option<usize>,
}

impl AttributeFilter {
    /// Creates a filter that matches every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to the given hosts.
    #[must_use]
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts.extend(hosts.into_iter().map(Into::into));
        self
    }

    /// Restricts results to the given attribute names.
    #[must_use]
    pub fn with_attribute_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attribute_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Restricts results to rows whose value text is one of `values`.
    #[must_use]
    pub fn with_attribute_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attribute_values
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Keeps rows recorded at or after `start`.
    #[must_use]
    pub const fn recorded_from(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Keeps rows recorded at or before `end`.
    #[must_use]
    pub const fn recorded_until(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Skips the first `offset` matching rows.
    #[must_use]
    pub const fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns at most `limit` matching rows.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the host dimension.
    #[must_use]
    pub const fn hosts(&self) -> &BTreeSet<String> {
        &self.hosts
    }

    /// Returns the attribute name dimension.
    #[must_use]
    pub const fn attribute_names(&self) -> &BTreeSet<String> {
        &self.attribute_names
    }

    /// Returns the attribute value dimension.
    #[must_use]
    pub const fn attribute_values(&self) -> &BTreeSet<String> {
        &self.attribute_values
    }

    /// Returns the inclusive lower time bound.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Returns the inclusive upper time bound.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Returns the number of matching rows to skip.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Returns the maximum number of rows to return.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns `true` when `row` satisfies every dimension of the filter.
    ///
    /// Pagination is not part of the predicate; see [`Self::paginate`].
    #[must_use]
    pub fn matches(&self, row: &AttributeRow) -> bool {
        accepts(&self.hosts, row.host().as_str())
            && accepts(&self.attribute_names, row.attribute_name())
            && accepts(&self.attribute_values, row.attribute_value())
            && self.start.is_none_or(|start| row.recorded_at() >= start)
            && self.end.is_none_or(|end| row.recorded_at() <= end)
    }

    /// Applies `offset` and `limit` to an already-filtered row sequence.
    pub fn paginate<I>(&self, rows: I) -> Vec<AttributeRow>
    where
        I: IntoIterator<Item = AttributeRow>,
    {
        let skipped = rows.into_iter().skip(self.offset.unwrap_or(0));
        match self.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }
}

fn accepts(allowed: &BTreeSet<String>, candidate: &str) -> bool {
    allowed.is_empty() || allowed.contains(candidate)
}

/// Total order in which attribute queries return rows: recording time, then
/// host, attribute name, and attribute value compared bytewise, then row id.
#[must_use]
pub fn row_order(left: &AttributeRow, right: &AttributeRow) -> Ordering {
    left.recorded_at()
        .cmp(&right.recorded_at())
        .then_with(|| left.host().as_str().cmp(right.host().as_str()))
        .then_with(|| left.attribute_name().cmp(right.attribute_name()))
        .then_with(|| left.attribute_value().cmp(right.attribute_value()))
        .then_with(|| left.id().cmp(&right.id()))
}
