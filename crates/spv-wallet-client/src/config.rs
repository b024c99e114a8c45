/*
[INPUT]:  Config file and SPV_WALLET_* environment variables, or builder calls
[OUTPUT]: ClientConfig holding at most one credential
[POS]:    Configuration layer - client setup
[UPDATE]: When adding new configuration options
*/

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::http::{Result, SpvWalletError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3003/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "SPV_WALLET";

/// Key material identifying the client.
///
/// A config holds one of these or none, so a client can only ever be in a
/// single auth mode.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Extended private key; requests are signed with nonce-derived children
    XPriv(String),
    /// Extended public key; requests carry the identity header only
    XPub(String),
    /// Standalone private key (WIF or hex); requests are signed with it
    AccessKey(String),
}

impl Credential {
    /// Pick one credential by precedence: access key, then xpriv, then xpub
    pub fn select(
        xpriv: Option<String>,
        xpub: Option<String>,
        access_key: Option<String>,
    ) -> Option<Credential> {
        let configured = [access_key.is_some(), xpriv.is_some(), xpub.is_some()]
            .iter()
            .filter(|set| **set)
            .count();

        let selected = access_key
            .map(Credential::AccessKey)
            .or_else(|| xpriv.map(Credential::XPriv))
            .or_else(|| xpub.map(Credential::XPub));

        if let Some(credential) = selected.as_ref().filter(|_| configured > 1) {
            warn!(
                selected = credential.kind(),
                configured, "multiple credentials configured; lower-precedence ones ignored"
            );
        }
        selected
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credential::XPriv(_) => "xpriv",
            Credential::XPub(_) => "xpub",
            Credential::AccessKey(_) => "access_key",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::XPub(xpub) => write!(f, "XPub({xpub})"),
            other => write!(f, "{}(<redacted>)", other.kind()),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub credential: Option<Credential>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            credential: None,
        }
    }
}

/// Flat, serde-friendly form of [`ClientConfig`]
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub xpriv: Option<String>,
    #[serde(default)]
    pub xpub: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
}

impl ClientSettings {
    /// Load settings from an optional file (TOML, YAML or JSON by extension)
    /// overlaid with `SPV_WALLET_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, None)
    }

    /// `env` replaces the process environment when given
    fn load_from(path: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(env))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| SpvWalletError::Config(e.to_string()))
    }

    pub fn into_config(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            credential: Credential::select(self.xpriv, self.xpub, self.access_key),
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("xpriv", &self.xpriv.as_ref().map(|_| "<redacted>"))
            .field("xpub", &self.xpub)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ClientConfig {
    /// Shorthand for [`ClientSettings::load`] followed by `into_config`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        ClientSettings::load(path).map(ClientSettings::into_config)
    }
}
