/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for spv-wallet-client tests

use spv_wallet_client::SpvWalletClient;
use reqwest::header::HeaderMap;
use wiremock::MockServer;

/// BIP32 test vector 2 master key
pub const TEST_XPRIV: &str = "xprv9s21ZrQH143K31xYSDQpPDxsXRTUcvj2iNHm5NUtrGiGG5e2DtALGdso3pGz6ssrdK4PFmM8NSpSBHNqPqm55Qn3LqFtT2emdEXVYsCzC2U";
pub const TEST_XPUB: &str = "xpub661MyMwAqRbcFW31YEwpkMuc5THy2PSt5bDMsktWQcFF8syAmRUapSCGu8ED9W6oDMSgv6Zz8idoc4a6mr8BDzTJY47LJhkJ8UB7WEGuduB";

/// Private key 1, compressed WIF
#[allow(dead_code)]
pub const TEST_ACCESS_KEY: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";
#[allow(dead_code)]
pub const TEST_ACCESS_KEY_PUBKEY: &str =
    "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at `server`, optionally configured through `configure`
#[allow(dead_code)]
pub fn client_for(
    server: &MockServer,
    configure: impl FnOnce(spv_wallet_client::ClientBuilder) -> spv_wallet_client::ClientBuilder,
) -> SpvWalletClient {
    configure(SpvWalletClient::builder().base_url(format!("{}/api/v1", server.uri())))
        .build()
        .expect("client init")
}

/// Header value as a string, panicking when missing
#[allow(dead_code)]
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .unwrap_or_else(|| panic!("missing header {name}"))
        .to_str()
        .expect("header is not ascii")
}
