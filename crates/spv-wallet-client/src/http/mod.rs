/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod configurations;
pub mod error;
pub mod query;
pub mod transactions;

pub use error::{Result, SpvWalletError};

pub use client::{ClientBuilder, SpvWalletClient, decode_json};
pub use query::{TimeRange, TransactionFilter, TransactionsQuery};
