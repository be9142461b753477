//! End-to-end check of the reqwest transport against a mock server

mod common;

use bc_client::api::{ApiError, BusinessCentralClient, QueryOptions};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_token_endpoint(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/contoso/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=app-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": access_token
        })))
        .mount(server)
        .await;
}

fn settings_for(server: &MockServer) -> bc_client::config::Settings {
    let host = Url::parse(&server.uri()).unwrap();
    common::settings()
        .with_api_host(host.clone())
        .with_authority_host(host)
}

#[tokio::test]
async fn test_product_lookup_over_http() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "abc").await;

    Mock::given(method("GET"))
        .and(path_regex(r"/ODataV4/Company\('CRONUS'\)/SQLProduct$"))
        .and(query_param("$filter", "no eq '060.166.0574'"))
        .and(header("Authorization", "Bearer abc"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"no": "060.166.0574", "description": "Bicycle"}],
            "@odata.nextLink": format!("{}/next/SQLProduct?skiptoken=1", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next/SQLProduct"))
        .and(query_param("skiptoken", "1"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"no": "060.166.0574", "description": "Bicycle (variant)"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BusinessCentralClient::connect(&settings_for(&server))
        .await
        .unwrap();
    let records = client.get_product("060.166.0574").await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["description"], "Bicycle (variant)");
}

#[tokio::test]
async fn test_http_error_over_http() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "abc").await;

    Mock::given(method("GET"))
        .and(path_regex(r"/SQLCustomer$"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad filter"))
        .expect(1)
        .mount(&server)
        .await;

    let client = BusinessCentralClient::connect(&settings_for(&server))
        .await
        .unwrap();
    let error = client
        .get_customers(&QueryOptions::new().filter("no eq"))
        .await
        .unwrap_err();

    match error {
        ApiError::Http { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Bad filter");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let server = MockServer::start().await;
    let settings = settings_for(&server);
    drop(server);

    let error = BusinessCentralClient::connect(&settings)
        .await
        .err()
        .expect("connect should fail");
    assert!(matches!(error, ApiError::Transport(_)));
}
