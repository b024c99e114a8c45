/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response models with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::TransactionDirection;

/// Free-form metadata attached to wallet records
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Fields shared by every persisted model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(flatten)]
    pub model: Model,
    pub id: String,
    #[serde(default)]
    pub hex: String,
    #[serde(default)]
    pub xpub_in_ids: Vec<String>,
    #[serde(default)]
    pub xpub_out_ids: Vec<String>,
    #[serde(default)]
    pub block_hash: String,
    #[serde(default)]
    pub block_height: u64,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub number_of_inputs: u32,
    #[serde(default)]
    pub number_of_outputs: u32,
    #[serde(default)]
    pub draft_id: String,
    #[serde(default)]
    pub total_value: u64,
    #[serde(default)]
    pub output_value: i64,
    #[serde(default)]
    pub outputs: BTreeMap<String, i64>,
    #[serde(default)]
    pub status: String,
    #[serde(
        default,
        rename = "direction",
        alias = "transactionDirection",
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_direction: Option<TransactionDirection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,
    #[serde(default)]
    pub satoshis: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub script: String,
    #[serde(default)]
    pub use_for_change: bool,
}

/// Draft configuration: outputs plus change and fee policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub change_strategy: String,
    #[serde(default)]
    pub change_minimum_satoshis: u64,
    #[serde(default)]
    pub change_number_of_destinations: u32,
    #[serde(default)]
    pub change_satoshis: u64,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub outputs: Vec<TransactionOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftTransaction {
    #[serde(flatten)]
    pub model: Model,
    pub id: String,
    #[serde(default)]
    pub hex: String,
    #[serde(default)]
    pub xpub_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub configuration: TransactionConfig,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub final_tx_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedConfig {
    #[serde(default)]
    pub paymail_domains: Vec<String>,
    #[serde(default)]
    pub experimental_features: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescription {
    pub size: u32,
    pub number: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

/// Paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageModel<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub page: PageDescription,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_deserializes_wire_names() {
        let json = r#"{
            "id": "07a1d71e-a1c2-4bca-abd0-7f006ad8dbe8",
            "hex": "0100039604ede024c6b6eb70279fe504e4eff",
            "xpubInIds": ["59ab2244-d575-4bc8-987c-50ab9462ac12"],
            "xpubOutIds": ["85952324-c42b-418c-8fa4-8ae3ec253460"],
            "blockHash": "c5105d50088a17a08075ca542293a288",
            "blockHeight": 833505,
            "fee": 1,
            "numberOfInputs": 3,
            "numberOfOutputs": 2,
            "draftId": "d33f936d-475f-4641-9ac7-e0743ad146d6",
            "totalValue": 51,
            "outputValue": 50,
            "outputs": {"1a08d547": -51, "32d5a09c": 50},
            "status": "MINED",
            "direction": "outgoing",
            "metadata": {"key": "value"},
            "createdAt": "2024-02-26T11:00:28.069911Z"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.block_height, 833_505);
        assert_eq!(tx.xpub_in_ids.len(), 1);
        assert_eq!(tx.outputs.get("1a08d547"), Some(&-51));
        assert_eq!(tx.transaction_direction, Some(TransactionDirection::Outgoing));
        assert_eq!(
            tx.model.metadata.as_ref().and_then(|m| m.get("key")),
            Some(&serde_json::json!("value"))
        );
        assert!(tx.model.created_at.is_some());
    }

    #[test]
    fn test_page_model_defaults() {
        let page: PageModel<Transaction> = serde_json::from_str("{}").unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.page.total_pages, 0);
    }

    #[test]
    fn test_shared_config() {
        let cfg: SharedConfig = serde_json::from_str(
            r#"{"paymailDomains":["example.com"],"experimentalFeatures":{"pikeContactsEnabled":true}}"#,
        )
        .unwrap();
        assert_eq!(cfg.paymail_domains, vec!["example.com"]);
        assert_eq!(cfg.experimental_features.get("pikeContactsEnabled"), Some(&true));
    }
}
