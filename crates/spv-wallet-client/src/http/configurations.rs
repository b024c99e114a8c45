/*
[INPUT]:  Authenticated client
[OUTPUT]: Shared wallet service configuration
[POS]:    HTTP layer - /configs endpoints
[UPDATE]: When adding new configuration endpoints
*/

use crate::http::{Result, SpvWalletClient};
use crate::types::SharedConfig;

impl SpvWalletClient {
    /// GET /configs/shared
    pub async fn shared_config(&self) -> Result<SharedConfig> {
        self.get_json("configs/shared").await
    }
}
