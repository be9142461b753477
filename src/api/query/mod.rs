//! OData query building
//!
//! Turns optional collection query inputs into `$filter`, `$orderby`,
//! `$select`, `$skip` and `$top` parameters, and parses paged responses.

pub mod filters;
pub mod options;
pub mod parameters;
pub mod result;

pub use filters::{Filter, FilterValue};
pub use options::QueryOptions;
pub use parameters::QueryParameters;
pub use result::ResultPage;
