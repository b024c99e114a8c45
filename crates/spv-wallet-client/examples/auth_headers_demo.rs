/*
[INPUT]:  Optional config file path and SPV_WALLET_* environment variables
[OUTPUT]: Printed x-auth-* headers and the shared config fetched from the server
[POS]:    Examples - authentication flow demonstration
[UPDATE]: When auth modes or configuration loading change
*/

use std::path::PathBuf;

use reqwest::header::HeaderMap;
use spv_wallet_client::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Example: request authentication
///
/// Usage: `cargo run --example auth_headers_demo -- [config.toml]`
///
/// Credentials come from the file or from `SPV_WALLET_XPRIV`,
/// `SPV_WALLET_XPUB` or `SPV_WALLET_ACCESS_KEY`.
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== SPV Wallet Authentication Example ===\n");

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = ClientConfig::load(path.as_deref())?;
    let auth = AuthHeaders::from_credential(config.credential.as_ref())?;
    println!("Auth mode: {}", auth.mode());

    // Headers for a sample POST body
    let body = serde_json::to_vec(&RecordTransactionRequest {
        hex: "0100".to_string(),
        reference_id: "draft-id".to_string(),
        ..Default::default()
    })?;
    let mut headers = HeaderMap::new();
    auth.append(&mut headers, &body)?;
    for (name, value) in &headers {
        println!("  {name}: {}", value.to_str().unwrap_or("<binary>"));
    }

    let client = SpvWalletClient::with_config(config)?;
    match client.shared_config().await {
        Ok(shared) => info!(domains = ?shared.paymail_domains, "shared config fetched"),
        Err(err) => warn!(error = %err, "shared config request failed"),
    }

    Ok(())
}
