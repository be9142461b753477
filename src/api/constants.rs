//! API constants and URL builders for the Business Central OData v4 API

/// Business Central API version segment
pub const API_VERSION: &str = "v2.0";

/// Default API host
pub const API_HOST: &str = "https://api.businesscentral.dynamics.com/";

/// Default identity authority host
pub const AUTHORITY_HOST: &str = "https://login.microsoftonline.com/";

/// Scope requested when none is configured
pub const DEFAULT_SCOPE: &str = "https://api.businesscentral.dynamics.com/.default";

/// Token type used when the identity service omits one
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Collection names exposed by the API
pub mod tables {
    pub const CUSTOMERS: &str = "SQLCustomer";
    pub const PRODUCTS: &str = "SQLProduct";
}

/// OData query parameter names
pub mod params {
    pub const FILTER: &str = "$filter";
    pub const ORDER_BY: &str = "$orderby";
    pub const SELECT: &str = "$select";
    pub const SKIP: &str = "$skip";
    pub const TOP: &str = "$top";
}

/// Standard headers and response annotations
pub mod headers {
    pub const ACCEPT: &str = "Accept";
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Unencoded path segments of the company-scoped OData base.
///
/// Single quotes in the company name are doubled; percent-encoding is left to
/// the URL builder so reserved characters stay inside the company segment.
pub fn company_segments(tenant_id: &str, environment: &str, company: &str) -> [String; 5] {
    [
        API_VERSION.to_string(),
        tenant_id.to_string(),
        environment.to_string(),
        "ODataV4".to_string(),
        format!("Company('{}')", company.replace('\'', "''")),
    ]
}

/// Client-credentials token endpoint below the identity host
pub fn token_path(tenant_id: &str) -> String {
    format!("{}/oauth2/v2.0/token", tenant_id)
}
