/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public SPV Wallet client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod config;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{AuthError, AuthHeaders, AuthMode, ExtendedKey, MessageSigner};

// Re-export configuration
pub use config::{ClientConfig, ClientSettings, Credential};

// Re-export commonly used types from http
pub use http::{
    ClientBuilder, Result, SpvWalletClient, SpvWalletError, TimeRange, TransactionFilter,
    TransactionsQuery,
};

// Re-export all types
pub use types::*;
