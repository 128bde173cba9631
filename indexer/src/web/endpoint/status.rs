use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::indexer::Indexer;
use crate::web::model::status::StatusResponse;
use crate::web::params::ApiError;
use crate::web::web_server;

#[utoipa::path(
    method(get),
    path = "/status",
    tag = web_server::INDEXER_TAG,
    description = "Get the ledger state the index reflects",
    responses(
        (status = StatusCode::OK, description = "Success", body = StatusResponse, content_type = "application/json")
    )
)]
pub async fn get_status(
    Extension(indexer): Extension<Indexer>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = indexer.status().await?;
    Ok(Json(status.into()))
}
