/*
[INPUT]:  ClientConfig (base URL, timeouts, credential) and request bodies
[OUTPUT]: Authenticated HTTP requests and decoded API responses
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::fmt;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::auth::{AuthHeaders, AuthMode};
use crate::config::{ClientConfig, Credential};
use crate::http::{Result, SpvWalletError};

/// Main HTTP client for the SPV Wallet API.
///
/// Auth configuration is fixed at construction; the client can be shared
/// across tasks and every request is authenticated independently.
#[derive(Debug, Clone)]
pub struct SpvWalletClient {
    http_client: Client,
    base_url: Url,
    auth: AuthHeaders,
}

impl SpvWalletClient {
    /// Create a client with default configuration and no credential
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from an explicit configuration.
    ///
    /// Key material is parsed here; a malformed key fails construction.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let auth = AuthHeaders::from_credential(config.credential.as_ref())?;
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let client = Self {
            http_client,
            base_url: parse_base_url(&config.base_url)?,
            auth,
        };
        info!(base_url = %client.base_url, mode = %client.auth_mode(), "spv wallet client created");
        Ok(client)
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth.mode()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint relative to the base URL
    pub fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    pub async fn get(&self, url: Url) -> Result<Response> {
        self.send(Method::GET, url, Vec::new()).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> Result<Response> {
        let body = serde_json::to_vec(body)?;
        self.send(Method::POST, url, body).await
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> Result<Response> {
        let body = serde_json::to_vec(body)?;
        self.send(Method::PATCH, url, body).await
    }

    /// Authenticate and dispatch one request.
    ///
    /// The auth headers cover exactly `body`; if they cannot be produced the
    /// request is not sent.
    async fn send(&self, method: Method, url: Url, body: Vec<u8>) -> Result<Response> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.auth.append(&mut headers, &body)?;

        debug!(%method, %url, mode = %self.auth_mode(), body_len = body.len(), "sending request");

        let mut builder = self.http_client.request(method, url).headers(headers);
        if !body.is_empty() {
            builder = builder.body(body);
        }
        Ok(builder.send().await?)
    }

    pub(crate) async fn get_json<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        let url = self.url(endpoint)?;
        decode_json(self.get(url).await?).await
    }

    pub(crate) async fn get_json_url<R: DeserializeOwned>(&self, url: Url) -> Result<R> {
        decode_json(self.get(url).await?).await
    }

    pub(crate) async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<R> {
        let url = self.url(endpoint)?;
        decode_json(self.post(url, body).await?).await
    }

    pub(crate) async fn patch_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<R> {
        let url = self.url(endpoint)?;
        decode_json(self.patch(url, body).await?).await
    }
}

/// Decode a JSON response, mapping 4xx/5xx to [`SpvWalletError::Api`]
pub async fn decode_json<R: DeserializeOwned>(response: Response) -> Result<R> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_client_error() || status.is_server_error() {
        debug!(%status, "api error response");
        return Err(SpvWalletError::from_response(status, &bytes));
    }
    Ok(serde_json::from_slice(&bytes)?)
}

// `Url::join` drops the last segment unless the base ends with a slash.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Builder for [`SpvWalletClient`].
///
/// Credentials given through the builder are resolved once in
/// [`ClientBuilder::build`], access key first, then xpriv, then xpub.
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    xpriv: Option<String>,
    xpub: Option<String>,
    access_key: Option<String>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("xpriv", &self.xpriv.as_ref().map(|_| "<redacted>"))
            .field("xpub", &self.xpub)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.config.connect_timeout = connect_timeout;
        self
    }

    /// Sign requests with children of this extended private key
    pub fn with_xpriv(mut self, xpriv: impl Into<String>) -> Self {
        self.xpriv = Some(xpriv.into());
        self
    }

    /// Identify requests by this extended public key, unsigned
    pub fn with_xpub(mut self, xpub: impl Into<String>) -> Self {
        self.xpub = Some(xpub.into());
        self
    }

    /// Sign requests with this access key (WIF or hex)
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    pub fn build(self) -> Result<SpvWalletClient> {
        let Self {
            mut config,
            xpriv,
            xpub,
            access_key,
        } = self;
        if let Some(credential) = Credential::select(xpriv, xpub, access_key) {
            config.credential = Some(credential);
        }
        SpvWalletClient::with_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XPRIV: &str = "xprv9s21ZrQH143K31xYSDQpPDxsXRTUcvj2iNHm5NUtrGiGG5e2DtALGdso3pGz6ssrdK4PFmM8NSpSBHNqPqm55Qn3LqFtT2emdEXVYsCzC2U";
    const XPUB: &str = "xpub661MyMwAqRbcFW31YEwpkMuc5THy2PSt5bDMsktWQcFF8syAmRUapSCGu8ED9W6oDMSgv6Zz8idoc4a6mr8BDzTJY47LJhkJ8UB7WEGuduB";
    const ACCESS_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_default_client_has_no_auth() {
        let client = SpvWalletClient::new().unwrap();
        assert_eq!(client.auth_mode(), AuthMode::NoAuth);
        assert_eq!(client.base_url().as_str(), "http://localhost:3003/api/v1/");
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = SpvWalletClient::builder()
            .base_url("https://wallet.example.com/api/v1")
            .build()
            .unwrap();
        assert_eq!(
            client.url("/transactions/drafts").unwrap().as_str(),
            "https://wallet.example.com/api/v1/transactions/drafts"
        );
    }

    #[test]
    fn test_builder_precedence() {
        let client = SpvWalletClient::builder()
            .with_xpub(XPUB)
            .with_xpriv(XPRIV)
            .with_access_key(ACCESS_KEY)
            .build()
            .unwrap();
        assert_eq!(client.auth_mode(), AuthMode::SignedWithAccessKey);

        let client = SpvWalletClient::builder()
            .with_xpub(XPUB)
            .with_xpriv(XPRIV)
            .build()
            .unwrap();
        assert_eq!(client.auth_mode(), AuthMode::SignedWithDerivedKey);

        let client = SpvWalletClient::builder().with_xpub(XPUB).build().unwrap();
        assert_eq!(client.auth_mode(), AuthMode::PublicKeyOnly);
    }

    #[test]
    fn test_malformed_key_fails_construction() {
        let err = SpvWalletClient::builder()
            .with_access_key("definitely-not-a-key")
            .build()
            .unwrap_err();
        match err {
            SpvWalletError::Auth(auth) => assert!(auth.is_key_format()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_builder_debug_redacts_private_keys() {
        let builder = SpvWalletClient::builder()
            .with_access_key(ACCESS_KEY)
            .with_xpriv(XPRIV)
            .with_xpub(XPUB);
        let debug = format!("{builder:?}");

        assert!(!debug.contains(XPRIV));
        assert!(!debug.contains(ACCESS_KEY));
        assert!(debug.contains(XPUB));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = SpvWalletClient::builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, SpvWalletError::UrlParse(_)));
    }
}
