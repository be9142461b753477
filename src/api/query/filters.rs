//! OData filter clauses
//!
//! Provides the `$filter` clauses the client composes: comparisons, raw
//! caller-supplied expressions and their AND-combination.

use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, FilterValue),
    Gt(String, FilterValue),
    Lt(String, FilterValue),

    /// Every clause must hold
    And(Vec<Filter>),

    // Raw OData filter for caller-supplied expressions
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    DateTime(DateTime<Utc>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Gt(field.into(), value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Lt(field.into(), value.into())
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Self::And(filters)
    }

    pub fn raw(filter: impl Into<String>) -> Self {
        Self::Raw(filter.into())
    }

    /// Convert filter to OData query string.
    ///
    /// An `And` writes its first clause bare and wraps every following
    /// clause: `a and (b) and (c)`.
    pub fn to_odata_string(&self) -> String {
        match self {
            Filter::Eq(field, value) => format!("{} eq {}", field, value.to_odata_string()),
            Filter::Gt(field, value) => format!("{} gt {}", field, value.to_odata_string()),
            Filter::Lt(field, value) => format!("{} lt {}", field, value.to_odata_string()),

            Filter::And(filters) => {
                let mut clauses = filters.iter().map(|f| f.to_odata_string());
                let Some(first) = clauses.next() else {
                    return String::new();
                };
                clauses.fold(first, |acc, clause| format!("{} and ({})", acc, clause))
            }

            Filter::Raw(raw) => raw.clone(),
        }
    }
}

impl FilterValue {
    pub fn to_odata_string(&self) -> String {
        match self {
            FilterValue::String(s) => format!("'{}'", s.replace('\'', "''")),
            FilterValue::Integer(i) => i.to_string(),
            // DateTimeOffset literals are unquoted
            FilterValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        FilterValue::DateTime(value)
    }
}
