/*
[INPUT]:  Transaction requests, query filters and an authenticated client
[OUTPUT]: Transaction and draft transaction records
[POS]:    HTTP layer - /transactions endpoints
[UPDATE]: When adding new transaction endpoints or changing request shapes
*/

use crate::http::query::TransactionsQuery;
use crate::http::{Result, SpvWalletClient};
use crate::types::{
    DraftTransaction, DraftTransactionRequest, PageModel, RecordTransactionRequest, Transaction,
    UpdateTransactionMetadataRequest,
};

const TRANSACTIONS: &str = "transactions";

impl SpvWalletClient {
    /// Fetch a single transaction
    ///
    /// GET /transactions/{id}
    pub async fn transaction(&self, id: &str) -> Result<Transaction> {
        self.get_json(&format!("{TRANSACTIONS}/{id}")).await
    }

    /// List transactions matching the query
    ///
    /// GET /transactions?{query}
    pub async fn transactions(&self, query: &TransactionsQuery) -> Result<Vec<Transaction>> {
        // `transactions?{query}`, no slash before the query string.
        let mut url = self.url(TRANSACTIONS)?;
        let params = query.encode()?;
        if !params.is_empty() {
            url.set_query(Some(&params));
        }

        let page: PageModel<Transaction> = self.get_json_url(url).await?;
        Ok(page.content)
    }

    /// Create a draft transaction
    ///
    /// POST /transactions/drafts
    pub async fn draft_transaction(&self, req: &DraftTransactionRequest) -> Result<DraftTransaction> {
        self.post_json(&format!("{TRANSACTIONS}/drafts"), req).await
    }

    /// Record a signed transaction
    ///
    /// POST /transactions
    pub async fn record_transaction(&self, req: &RecordTransactionRequest) -> Result<Transaction> {
        self.post_json(TRANSACTIONS, req).await
    }

    /// Replace a transaction's metadata
    ///
    /// PATCH /transactions/{id}
    pub async fn update_transaction_metadata(
        &self,
        req: &UpdateTransactionMetadataRequest,
    ) -> Result<Transaction> {
        self.patch_json(&format!("{TRANSACTIONS}/{}", req.id), req).await
    }
}
