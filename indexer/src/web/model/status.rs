use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use utxo_indexer_database::models::status::Status;

#[derive(ToSchema, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[schema(example = "42")]
    pub ledger_index: u32,
    pub protocol_version: u8,
    #[schema(example = "shimmer")]
    pub network_name: String,
    pub database_version: u32,
}

impl From<Status> for StatusResponse {
    fn from(status: Status) -> Self {
        StatusResponse {
            ledger_index: status.ledger_index,
            protocol_version: status.protocol_version,
            network_name: status.network_name,
            database_version: status.database_version,
        }
    }
}
