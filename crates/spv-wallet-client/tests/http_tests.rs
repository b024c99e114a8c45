/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for HTTP client
[POS]:    Integration tests - HTTP endpoints
[UPDATE]: When HTTP endpoints change
*/

mod common;

use common::{TEST_XPRIV, TEST_XPUB, client_for, setup_mock_server};
use rstest::rstest;
use serde_json::json;
use spv_wallet_client::auth::{AUTH_HEADER, AUTH_SIGNATURE};
use spv_wallet_client::{
    AuthMode, ClientConfig, Credential, DraftTransactionRequest, Metadata, SortDirection,
    SpvWalletClient, SpvWalletError, TransactionConfig, TransactionOutput, TransactionsQuery,
};
use std::time::Duration;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let client = assert_ok!(SpvWalletClient::new());
    assert_eq!(client.auth_mode(), AuthMode::NoAuth);
}

#[test]
fn test_client_with_config() {
    let config = ClientConfig {
        base_url: "https://wallet.example.com/api/v1".to_string(),
        timeout: Duration::from_secs(5),
        credential: Some(Credential::XPub(TEST_XPUB.to_string())),
        ..Default::default()
    };
    let client = assert_ok!(SpvWalletClient::with_config(config));
    assert_eq!(client.auth_mode(), AuthMode::PublicKeyOnly);
}

#[rstest]
#[case("http://localhost:3003/api/v1", "http://localhost:3003/api/v1/transactions")]
#[case("http://localhost:3003/api/v1/", "http://localhost:3003/api/v1/transactions")]
#[case("https://wallet.example.com", "https://wallet.example.com/transactions")]
fn test_endpoint_urls(#[case] base_url: &str, #[case] expected: &str) {
    let client = assert_ok!(SpvWalletClient::builder().base_url(base_url).build());
    assert_eq!(assert_ok!(client.url("transactions")).as_str(), expected);
}

#[tokio::test]
async fn test_draft_transaction() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/transactions/drafts"))
        .and(header(AUTH_HEADER, TEST_XPUB))
        .and(header_exists(AUTH_SIGNATURE))
        .and(body_partial_json(json!({
            "config": {"outputs": [{"to": "alice@example.com", "satoshis": 1000}]}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "draft-1",
            "hex": "0100",
            "xpubId": "xpub-id",
            "configuration": {"fee": 1, "outputs": [{"to": "alice@example.com", "satoshis": 1000}]},
            "status": "draft"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, |b| b.with_xpriv(TEST_XPRIV));
    let req = DraftTransactionRequest {
        config: TransactionConfig {
            outputs: vec![TransactionOutput {
                to: "alice@example.com".to_string(),
                satoshis: 1000,
                ..Default::default()
            }],
            ..Default::default()
        },
        metadata: Metadata::new(),
    };

    let draft = assert_ok!(client.draft_transaction(&req).await);
    assert_eq!(draft.id, "draft-1");
    assert_eq!(draft.configuration.fee, 1);
    assert_eq!(draft.configuration.outputs[0].satoshis, 1000);
}

#[tokio::test]
async fn test_transactions_sorted_listing() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/transactions"))
        .and(query_param("sortBy", "created_at"))
        .and(query_param("sort", "desc"))
        .and(query_param("size", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"id": "tx-1", "status": "MINED"}],
            "page": {"size": 1, "number": 1, "totalElements": 1, "totalPages": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, |b| b.with_xpriv(TEST_XPRIV));
    let query = TransactionsQuery::new()
        .page_size(1)
        .order_by("created_at")
        .sort(SortDirection::Desc);

    let txs = assert_ok!(client.transactions(&query).await);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].status, "MINED");
}

#[rstest]
#[case(400, "error-bind-body-invalid")]
#[case(401, "error-unauthorized")]
#[case(500, "error-internal-server-error")]
#[tokio::test]
async fn test_api_errors_are_mapped(#[case] status: u16, #[case] code: &str) {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/configs/shared"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "code": code,
            "message": "request rejected"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, |b| b.with_xpub(TEST_XPUB));
    let err = client.shared_config().await.unwrap_err();

    assert_eq!(err.status(), Some(status));
    assert_eq!(err.is_auth_error(), status == 401);
    match err {
        SpvWalletError::Api { code: got, message, .. } => {
            assert_eq!(got, code);
            assert_eq!(message, "request rejected");
        }
        other => panic!("Expected Api error variant, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_serialization_error() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/transactions/tx-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server, |b| b);
    let err = client.transaction("tx-1").await.unwrap_err();
    assert!(matches!(err, SpvWalletError::Serialization(_)));
}
