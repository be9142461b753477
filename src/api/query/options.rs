//! Collection query options
//!
//! Fluent description of a collection fetch that turns into
//! [`QueryParameters`] right before the request is sent.

use super::filters::Filter;
use super::parameters::QueryParameters;
use crate::api::constants::params;
use chrono::{DateTime, Utc};

pub const CREATED_AT_FIELD: &str = "systemCreatedAt";
pub const MODIFIED_AT_FIELD: &str = "systemModifiedAt";
pub const NUMBER_FIELD: &str = "no";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub created_after: Option<DateTime<Utc>>,
    pub modified_after: Option<DateTime<Utc>>,
    pub order_by: Option<String>,
    pub select: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub filter: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only records created after the given instant
    pub fn created_after(mut self, at: DateTime<Utc>) -> Self {
        self.created_after = Some(at);
        self
    }

    /// Only records modified after the given instant
    pub fn modified_after(mut self, at: DateTime<Utc>) -> Self {
        self.modified_after = Some(at);
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Comma separated field list
    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Raw OData filter expression, AND-combined with the time filters
    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter = Some(expression.into());
        self
    }

    /// Records whose number equals `number`
    pub fn number(number: &str) -> Self {
        Self::new().filter(Filter::eq(NUMBER_FIELD, number).to_odata_string())
    }

    /// Combined `$filter` clause, if any input contributes one.
    ///
    /// Order is fixed: created, modified, then the raw expression.
    pub fn filter_clause(&self) -> Option<String> {
        let mut clauses = Vec::new();

        if let Some(at) = self.created_after {
            clauses.push(Filter::gt(CREATED_AT_FIELD, at));
        }
        if let Some(at) = self.modified_after {
            clauses.push(Filter::gt(MODIFIED_AT_FIELD, at));
        }
        if let Some(expression) = non_empty(&self.filter) {
            clauses.push(Filter::raw(expression));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(Filter::and(clauses).to_odata_string())
        }
    }

    /// Build the OData parameter map.
    ///
    /// Empty strings and a zero offset or limit contribute nothing.
    pub fn to_parameters(&self) -> QueryParameters {
        let mut parameters = QueryParameters::new();

        if let Some(filter) = self.filter_clause() {
            parameters.insert(params::FILTER, filter);
        }
        if let Some(order_by) = non_empty(&self.order_by) {
            parameters.insert(params::ORDER_BY, order_by);
        }
        if let Some(select) = non_empty(&self.select) {
            parameters.insert(params::SELECT, select);
        }
        if let Some(offset) = self.offset.filter(|n| *n > 0) {
            parameters.insert(params::SKIP, offset.to_string());
        }
        if let Some(limit) = self.limit.filter(|n| *n > 0) {
            parameters.insert(params::TOP, limit.to_string());
        }

        parameters
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
