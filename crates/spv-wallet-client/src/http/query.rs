/*
[INPUT]:  Pagination, model/transaction filters and metadata filters
[OUTPUT]: Sorted, URL-encoded query parameters for listing endpoints
[POS]:    HTTP layer - query string construction
[UPDATE]: When the server adds filter fields
*/

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::http::{Result, SpvWalletError};
use crate::types::{Metadata, SortDirection};

/// Deepest metadata nesting the builder will flatten
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Query parameters keyed by name; a key may repeat
pub type QueryValues = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub include_deleted: Option<bool>,
    pub created_range: Option<TimeRange>,
    pub updated_range: Option<TimeRange>,
    pub id: Option<String>,
    pub hex: Option<String>,
    pub block_hash: Option<String>,
    pub block_height: Option<u64>,
    pub draft_id: Option<String>,
    pub status: Option<String>,
}

/// Builder for `GET /transactions` query parameters
#[derive(Debug, Clone)]
pub struct TransactionsQuery {
    page: Option<u32>,
    page_size: Option<u32>,
    order_by: Option<String>,
    sort: Option<SortDirection>,
    filter: TransactionFilter,
    metadata: Metadata,
    max_depth: usize,
}

impl Default for TransactionsQuery {
    fn default() -> Self {
        Self {
            page: None,
            page_size: None,
            order_by: None,
            sort: None,
            filter: TransactionFilter::default(),
            metadata: Metadata::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TransactionsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn sort(mut self, direction: SortDirection) -> Self {
        self.sort = Some(direction);
        self
    }

    pub fn filter(mut self, filter: TransactionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Collect every non-empty parameter
    pub fn build(&self) -> Result<QueryValues> {
        let mut values = QueryValues::new();
        let mut push = |key: &str, value: String| {
            values.entry(key.to_string()).or_default().push(value);
        };

        if let Some(page) = self.page {
            push("page", page.to_string());
        }
        if let Some(size) = self.page_size {
            push("size", size.to_string());
        }
        if let Some(field) = &self.order_by {
            push("sortBy", field.clone());
        }
        if let Some(sort) = self.sort {
            push("sort", sort.to_string());
        }

        let f = &self.filter;
        if let Some(include_deleted) = f.include_deleted {
            push("includeDeleted", include_deleted.to_string());
        }
        for (name, range) in [("createdRange", &f.created_range), ("updatedRange", &f.updated_range)] {
            let Some(range) = range else { continue };
            if let Some(from) = range.from {
                push(&format!("{name}[from]"), rfc3339(from));
            }
            if let Some(to) = range.to {
                push(&format!("{name}[to]"), rfc3339(to));
            }
        }
        for (name, value) in [
            ("id", &f.id),
            ("hex", &f.hex),
            ("blockHash", &f.block_hash),
            ("draftId", &f.draft_id),
            ("status", &f.status),
        ] {
            if let Some(value) = value {
                push(name, value.clone());
            }
        }
        if let Some(height) = f.block_height {
            push("blockHeight", height.to_string());
        }

        for (key, value) in &self.metadata {
            flatten_metadata(&format!("metadata[{key}]"), value, 1, self.max_depth, &mut values)?;
        }
        Ok(values)
    }

    /// `application/x-www-form-urlencoded` query string, keys sorted
    pub fn encode(&self) -> Result<String> {
        let values = self.build()?;
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, list) in &values {
            for value in list {
                serializer.append_pair(key, value);
            }
        }
        Ok(serializer.finish())
    }
}

fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn flatten_metadata(
    prefix: &str,
    value: &Value,
    depth: usize,
    max_depth: usize,
    out: &mut QueryValues,
) -> Result<()> {
    if depth > max_depth {
        return Err(SpvWalletError::QueryBuild(format!(
            "metadata nesting exceeds max depth {max_depth} at {prefix}"
        )));
    }

    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_metadata(&format!("{prefix}[{key}]"), nested, depth + 1, max_depth, out)?;
            }
        }
        Value::Array(items) => {
            let key = format!("{prefix}[]");
            for item in items {
                flatten_metadata(&key, item, depth + 1, max_depth, out)?;
            }
        }
        Value::String(s) => out.entry(prefix.to_string()).or_default().push(s.clone()),
        Value::Bool(_) | Value::Number(_) => {
            out.entry(prefix.to_string()).or_default().push(value.to_string())
        }
    }
    Ok(())
}
