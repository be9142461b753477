//! Collection page handling
//!
//! Only the paging envelope has a concrete shape; records stay untyped.

use crate::api::error::{ApiError, ApiResult};
use serde::Deserialize;
use serde_json::Value;

/// One page of an OData collection response
#[derive(Debug, Clone, Deserialize)]
pub struct ResultPage {
    pub value: Vec<Value>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

impl ResultPage {
    /// Parse OData response JSON into a page
    pub fn from_json(json: Value) -> ApiResult<Self> {
        serde_json::from_value(json)
            .map_err(|e| ApiError::Decode(format!("response is not a collection page: {}", e)))
    }

    /// Check if there are more results available
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}
