use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use crate::query::IndexerResult;

#[skip_serializing_none]
#[derive(ToSchema, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputsResponse {
    #[schema(example = "42")]
    pub ledger_index: u32,
    pub page_size: u32,
    /// Resumption token, suffixed with the page size it was produced for.
    pub cursor: Option<String>,
    /// Matching output ids as hex strings, in query order.
    pub items: Vec<String>,
}

impl From<IndexerResult> for OutputsResponse {
    fn from(result: IndexerResult) -> Self {
        let cursor = result.cursor.map(|cursor| format!("{}.{}", cursor, result.page_size));
        OutputsResponse {
            ledger_index: result.ledger_index,
            page_size: result.page_size,
            cursor,
            items: result.output_ids.iter().map(|id| id.to_hex()).collect(),
        }
    }
}
