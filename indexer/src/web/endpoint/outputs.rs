use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::indexer::Indexer;
use crate::query::alias::AliasFilter;
use crate::query::basic::BasicOutputFilter;
use crate::query::foundry::FoundryFilter;
use crate::query::nft::NftFilter;
use crate::settings::Settings;
use crate::web::model::outputs::OutputsResponse;
use crate::web::params::{check_token_count, parse_address, parse_cursor, parse_tag, ApiError};
use crate::web::web_server;
use utxo_indexer_ledger::ids::{AliasId, FoundryId, NftId};

#[derive(Deserialize, IntoParams, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BasicOutputsParams {
    pub has_native_tokens: Option<bool>,
    pub min_native_token_count: Option<u32>,
    pub max_native_token_count: Option<u32>,
    /// Bech32 address the output is unlockable by.
    pub address: Option<String>,
    pub has_storage_deposit_return: Option<bool>,
    pub storage_deposit_return_address: Option<String>,
    pub has_expiration: Option<bool>,
    pub expiration_return_address: Option<String>,
    pub expires_before: Option<u32>,
    pub expires_after: Option<u32>,
    pub has_timelock: Option<bool>,
    pub timelocked_before: Option<u32>,
    pub timelocked_after: Option<u32>,
    pub sender: Option<String>,
    /// Tag feature as hex.
    pub tag: Option<String>,
    pub created_before: Option<u32>,
    pub created_after: Option<u32>,
    pub page_size: Option<u32>,
    /// Resumption token from a previous page, `cursor.pageSize`.
    pub cursor: Option<String>,
}

#[utoipa::path(
    method(get),
    path = "/outputs/basic",
    tag = web_server::INDEXER_TAG,
    description = "Get basic outputs filtered by the given parameters",
    params(BasicOutputsParams),
    responses(
        (status = StatusCode::OK, description = "Success", body = OutputsResponse, content_type = "application/json")
    )
)]
pub async fn get_basic_outputs(
    Extension(indexer): Extension<Indexer>,
    Extension(settings): Extension<Settings>,
    Query(params): Query<BasicOutputsParams>,
) -> Result<Json<OutputsResponse>, ApiError> {
    let hrp = &settings.cli_args.bech32_hrp;
    let max_page_size = settings.cli_args.max_page_size;
    let mut filter = BasicOutputFilter {
        has_native_tokens: params.has_native_tokens,
        expires_before: params.expires_before,
        expires_after: params.expires_after,
        has_storage_deposit_return: params.has_storage_deposit_return,
        has_expiration: params.has_expiration,
        has_timelock: params.has_timelock,
        timelocked_before: params.timelocked_before,
        timelocked_after: params.timelocked_after,
        created_before: params.created_before,
        created_after: params.created_after,
        page_size: max_page_size,
        ..Default::default()
    };
    if let Some(count) = params.min_native_token_count {
        filter.min_native_token_count = Some(check_token_count(count)?);
    }
    if let Some(count) = params.max_native_token_count {
        filter.max_native_token_count = Some(check_token_count(count)?);
    }
    if let Some(address) = &params.address {
        filter.unlockable_by_address = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.storage_deposit_return_address {
        filter.storage_deposit_return_address = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.expiration_return_address {
        filter.expiration_return_address = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.sender {
        filter.sender = Some(parse_address(address, hrp)?);
    }
    if let Some(tag) = &params.tag {
        filter.tag = Some(parse_tag(tag)?);
    }
    if let Some(page_size) = params.page_size {
        filter.page_size = page_size.min(max_page_size);
    }
    if let Some(cursor) = &params.cursor {
        let (cursor, page_size) = parse_cursor(cursor, max_page_size)?;
        filter.cursor = Some(cursor);
        filter.page_size = page_size;
    }
    Ok(Json(indexer.basic_outputs_with_filters(&filter).await?.into()))
}

#[derive(Deserialize, IntoParams, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NftOutputsParams {
    pub has_native_tokens: Option<bool>,
    pub min_native_token_count: Option<u32>,
    pub max_native_token_count: Option<u32>,
    pub address: Option<String>,
    pub has_storage_deposit_return: Option<bool>,
    pub storage_deposit_return_address: Option<String>,
    pub has_expiration: Option<bool>,
    pub expiration_return_address: Option<String>,
    pub expires_before: Option<u32>,
    pub expires_after: Option<u32>,
    pub has_timelock: Option<bool>,
    pub timelocked_before: Option<u32>,
    pub timelocked_after: Option<u32>,
    pub issuer: Option<String>,
    pub sender: Option<String>,
    pub tag: Option<String>,
    pub created_before: Option<u32>,
    pub created_after: Option<u32>,
    pub page_size: Option<u32>,
    pub cursor: Option<String>,
}

#[utoipa::path(
    method(get),
    path = "/outputs/nft",
    tag = web_server::INDEXER_TAG,
    description = "Get nft outputs filtered by the given parameters",
    params(NftOutputsParams),
    responses(
        (status = StatusCode::OK, description = "Success", body = OutputsResponse, content_type = "application/json")
    )
)]
pub async fn get_nft_outputs(
    Extension(indexer): Extension<Indexer>,
    Extension(settings): Extension<Settings>,
    Query(params): Query<NftOutputsParams>,
) -> Result<Json<OutputsResponse>, ApiError> {
    let hrp = &settings.cli_args.bech32_hrp;
    let max_page_size = settings.cli_args.max_page_size;
    let mut filter = NftFilter {
        has_native_tokens: params.has_native_tokens,
        expires_before: params.expires_before,
        expires_after: params.expires_after,
        has_storage_deposit_return: params.has_storage_deposit_return,
        has_expiration: params.has_expiration,
        has_timelock: params.has_timelock,
        timelocked_before: params.timelocked_before,
        timelocked_after: params.timelocked_after,
        created_before: params.created_before,
        created_after: params.created_after,
        page_size: max_page_size,
        ..Default::default()
    };
    if let Some(count) = params.min_native_token_count {
        filter.min_native_token_count = Some(check_token_count(count)?);
    }
    if let Some(count) = params.max_native_token_count {
        filter.max_native_token_count = Some(check_token_count(count)?);
    }
    if let Some(address) = &params.address {
        filter.unlockable_by_address = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.storage_deposit_return_address {
        filter.storage_deposit_return_address = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.expiration_return_address {
        filter.expiration_return_address = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.issuer {
        filter.issuer = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.sender {
        filter.sender = Some(parse_address(address, hrp)?);
    }
    if let Some(tag) = &params.tag {
        filter.tag = Some(parse_tag(tag)?);
    }
    if let Some(page_size) = params.page_size {
        filter.page_size = page_size.min(max_page_size);
    }
    if let Some(cursor) = &params.cursor {
        let (cursor, page_size) = parse_cursor(cursor, max_page_size)?;
        filter.cursor = Some(cursor);
        filter.page_size = page_size;
    }
    Ok(Json(indexer.nft_outputs_with_filters(&filter).await?.into()))
}

#[derive(Deserialize, IntoParams, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AliasOutputsParams {
    pub has_native_tokens: Option<bool>,
    pub min_native_token_count: Option<u32>,
    pub max_native_token_count: Option<u32>,
    pub state_controller: Option<String>,
    pub governor: Option<String>,
    pub issuer: Option<String>,
    pub sender: Option<String>,
    pub created_before: Option<u32>,
    pub created_after: Option<u32>,
    pub page_size: Option<u32>,
    pub cursor: Option<String>,
}

#[utoipa::path(
    method(get),
    path = "/outputs/alias",
    tag = web_server::INDEXER_TAG,
    description = "Get alias outputs filtered by the given parameters",
    params(AliasOutputsParams),
    responses(
        (status = StatusCode::OK, description = "Success", body = OutputsResponse, content_type = "application/json")
    )
)]
pub async fn get_alias_outputs(
    Extension(indexer): Extension<Indexer>,
    Extension(settings): Extension<Settings>,
    Query(params): Query<AliasOutputsParams>,
) -> Result<Json<OutputsResponse>, ApiError> {
    let hrp = &settings.cli_args.bech32_hrp;
    let max_page_size = settings.cli_args.max_page_size;
    let mut filter = AliasFilter {
        has_native_tokens: params.has_native_tokens,
        created_before: params.created_before,
        created_after: params.created_after,
        page_size: max_page_size,
        ..Default::default()
    };
    if let Some(count) = params.min_native_token_count {
        filter.min_native_token_count = Some(check_token_count(count)?);
    }
    if let Some(count) = params.max_native_token_count {
        filter.max_native_token_count = Some(check_token_count(count)?);
    }
    if let Some(address) = &params.state_controller {
        filter.state_controller = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.governor {
        filter.governor = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.issuer {
        filter.issuer = Some(parse_address(address, hrp)?);
    }
    if let Some(address) = &params.sender {
        filter.sender = Some(parse_address(address, hrp)?);
    }
    if let Some(page_size) = params.page_size {
        filter.page_size = page_size.min(max_page_size);
    }
    if let Some(cursor) = &params.cursor {
        let (cursor, page_size) = parse_cursor(cursor, max_page_size)?;
        filter.cursor = Some(cursor);
        filter.page_size = page_size;
    }
    Ok(Json(indexer.alias_outputs_with_filters(&filter).await?.into()))
}

#[derive(Deserialize, IntoParams, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FoundryOutputsParams {
    pub has_native_tokens: Option<bool>,
    pub min_native_token_count: Option<u32>,
    pub max_native_token_count: Option<u32>,
    /// Bech32 alias address controlling the foundry.
    pub alias_address: Option<String>,
    pub created_before: Option<u32>,
    pub created_after: Option<u32>,
    pub page_size: Option<u32>,
    pub cursor: Option<String>,
}

#[utoipa::path(
    method(get),
    path = "/outputs/foundry",
    tag = web_server::INDEXER_TAG,
    description = "Get foundry outputs filtered by the given parameters",
    params(FoundryOutputsParams),
    responses(
        (status = StatusCode::OK, description = "Success", body = OutputsResponse, content_type = "application/json")
    )
)]
pub async fn get_foundry_outputs(
    Extension(indexer): Extension<Indexer>,
    Extension(settings): Extension<Settings>,
    Query(params): Query<FoundryOutputsParams>,
) -> Result<Json<OutputsResponse>, ApiError> {
    let hrp = &settings.cli_args.bech32_hrp;
    let max_page_size = settings.cli_args.max_page_size;
    let mut filter = FoundryFilter {
        has_native_tokens: params.has_native_tokens,
        created_before: params.created_before,
        created_after: params.created_after,
        page_size: max_page_size,
        ..Default::default()
    };
    if let Some(count) = params.min_native_token_count {
        filter.min_native_token_count = Some(check_token_count(count)?);
    }
    if let Some(count) = params.max_native_token_count {
        filter.max_native_token_count = Some(check_token_count(count)?);
    }
    if let Some(address) = &params.alias_address {
        let address = parse_address(address, hrp)?;
        if !address.is_alias() {
            return Err(ApiError::BadRequest(format!(
                "invalid address '{address}': not an alias address"
            )));
        }
        filter.alias_address = Some(address);
    }
    if let Some(page_size) = params.page_size {
        filter.page_size = page_size.min(max_page_size);
    }
    if let Some(cursor) = &params.cursor {
        let (cursor, page_size) = parse_cursor(cursor, max_page_size)?;
        filter.cursor = Some(cursor);
        filter.page_size = page_size;
    }
    Ok(Json(indexer.foundry_outputs_with_filters(&filter).await?.into()))
}

#[utoipa::path(
    method(get),
    path = "/outputs/alias/{alias_id}",
    tag = web_server::INDEXER_TAG,
    description = "Get the current output of an alias",
    params(("alias_id" = String, Path, description = "Alias id as hex")),
    responses(
        (status = StatusCode::OK, description = "Success", body = OutputsResponse, content_type = "application/json"),
        (status = StatusCode::NOT_FOUND, description = "No record found")
    )
)]
pub async fn get_alias_by_id(
    Extension(indexer): Extension<Indexer>,
    Path(alias_id): Path<String>,
) -> Result<Json<OutputsResponse>, ApiError> {
    let alias_id = AliasId::from_hex(&alias_id)
        .map_err(|e| ApiError::BadRequest(format!("invalid alias id: {e}")))?;
    let result = indexer.alias_output(&alias_id).await?;
    if result.output_ids.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(result.into()))
}

#[utoipa::path(
    method(get),
    path = "/outputs/nft/{nft_id}",
    tag = web_server::INDEXER_TAG,
    description = "Get the current output of an nft",
    params(("nft_id" = String, Path, description = "Nft id as hex")),
    responses(
        (status = StatusCode::OK, description = "Success", body = OutputsResponse, content_type = "application/json"),
        (status = StatusCode::NOT_FOUND, description = "No record found")
    )
)]
pub async fn get_nft_by_id(
    Extension(indexer): Extension<Indexer>,
    Path(nft_id): Path<String>,
) -> Result<Json<OutputsResponse>, ApiError> {
    let nft_id =
        NftId::from_hex(&nft_id).map_err(|e| ApiError::BadRequest(format!("invalid nft id: {e}")))?;
    let result = indexer.nft_output(&nft_id).await?;
    if result.output_ids.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(result.into()))
}

#[utoipa::path(
    method(get),
    path = "/outputs/foundry/{foundry_id}",
    tag = web_server::INDEXER_TAG,
    description = "Get the current output of a foundry",
    params(("foundry_id" = String, Path, description = "Foundry id as hex")),
    responses(
        (status = StatusCode::OK, description = "Success", body = OutputsResponse, content_type = "application/json"),
        (status = StatusCode::NOT_FOUND, description = "No record found")
    )
)]
pub async fn get_foundry_by_id(
    Extension(indexer): Extension<Indexer>,
    Path(foundry_id): Path<String>,
) -> Result<Json<OutputsResponse>, ApiError> {
    let foundry_id = FoundryId::from_hex(&foundry_id)
        .map_err(|e| ApiError::BadRequest(format!("invalid foundry id: {e}")))?;
    let result = indexer.foundry_output(&foundry_id).await?;
    if result.output_ids.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(result.into()))
}
