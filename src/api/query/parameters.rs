use crate::api::constants::params;
use std::collections::BTreeMap;

/// OData query parameters for a single request.
///
/// Keys are unique, so a map never holds more than one `$filter`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    params: BTreeMap<String, String>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|v| v.as_str())
    }

    pub fn filter(&self) -> Option<&str> {
        self.get(params::FILTER)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Name/value pairs in name order
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
