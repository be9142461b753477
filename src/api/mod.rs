//! Business Central OData API client
//!
//! Client-credentials authentication, transparent token refresh on 401,
//! OData query parameter construction and `@odata.nextLink` pagination for
//! the company-scoped collections of the Business Central API.

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod models;
pub mod query;
pub mod transport;

pub use auth::{ClientCredentialsProvider, TokenProvider};
pub use client::BusinessCentralClient;
pub use error::{ApiError, ApiResult};
pub use models::{Credentials, Token};
pub use query::{Filter, FilterValue, QueryOptions, QueryParameters, ResultPage};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody, TransportOptions};
