/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::{Metadata, TransactionConfig};

/// POST /transactions/drafts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftTransactionRequest {
    pub config: TransactionConfig,
    #[serde(default)]
    pub metadata: Metadata,
}

/// POST /transactions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionRequest {
    #[serde(default)]
    pub metadata: Metadata,
    pub hex: String,
    pub reference_id: String,
}

/// PATCH /transactions/{id}
///
/// `id` selects the transaction and is not part of the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTransactionMetadataRequest {
    #[serde(skip)]
    pub id: String,
    pub metadata: Metadata,
}
