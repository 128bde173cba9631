use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{Extension, Json, Router};
use log::info;
use tokio::time::sleep;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{openapi, OpenApi};
use utoipa_axum::router::OpenApiRouter;

use crate::indexer::Indexer;
use crate::settings::Settings;
use crate::web::endpoint;
use crate::web::endpoint::{outputs, status};
use crate::web::model;

pub const INDEXER_TAG: &str = "indexer";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "UTXO Indexer REST API",
        description = "Filtered lookups over unspent ledger outputs",
    ),
    paths(
        endpoint::outputs::get_basic_outputs,
        endpoint::outputs::get_nft_outputs,
        endpoint::outputs::get_alias_outputs,
        endpoint::outputs::get_foundry_outputs,
        endpoint::outputs::get_alias_by_id,
        endpoint::outputs::get_nft_by_id,
        endpoint::outputs::get_foundry_by_id,
        endpoint::status::get_status,
    ),
    components(schemas(model::outputs::OutputsResponse, model::status::StatusResponse)),
    tags(
        (name = INDEXER_TAG, description = "Output index endpoints"),
    ),
)]
struct ApiDoc;

pub struct WebServer {
    run: Arc<AtomicBool>,
    settings: Settings,
    indexer: Indexer,
}

impl WebServer {
    pub fn new(run: Arc<AtomicBool>, settings: Settings, indexer: Indexer) -> Self {
        WebServer { run, settings, indexer }
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        let listen = self.settings.cli_args.listen.clone();
        let base_path = self.settings.cli_args.base_path.trim_end_matches('/').to_string();

        let (api_router, api) = OpenApiRouter::with_openapi(set_server_path(&base_path))
            .route(&format!("{base_path}/outputs/basic"), get(outputs::get_basic_outputs))
            .route(&format!("{base_path}/outputs/nft"), get(outputs::get_nft_outputs))
            .route(&format!("{base_path}/outputs/nft/{{nft_id}}"), get(outputs::get_nft_by_id))
            .route(&format!("{base_path}/outputs/alias"), get(outputs::get_alias_outputs))
            .route(&format!("{base_path}/outputs/alias/{{alias_id}}"), get(outputs::get_alias_by_id))
            .route(&format!("{base_path}/outputs/foundry"), get(outputs::get_foundry_outputs))
            .route(
                &format!("{base_path}/outputs/foundry/{{foundry_id}}"),
                get(outputs::get_foundry_by_id),
            )
            .route(&format!("{base_path}/status"), get(status::get_status))
            .split_for_parts();

        let app = Router::new()
            .merge(api_router)
            .route(
                &format!("{base_path}/api/openapi.json"),
                get(move || std::future::ready(Json(api.clone()))),
            )
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(Extension(self.indexer.clone()))
            .layer(Extension(self.settings.clone()));

        info!("Starting web server listener on {listen}, base path: '{base_path}'");
        let listener = tokio::net::TcpListener::bind(&listen).await.expect("Failed to open listener");
        let run = self.run.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                while run.load(Ordering::Relaxed) {
                    sleep(Duration::from_secs(1)).await;
                }
                info!("Web server shutdown");
            })
            .await
    }
}

fn set_server_path(base_path: &str) -> openapi::OpenApi {
    let mut api = ApiDoc::openapi();
    if !base_path.is_empty() {
        api.servers = Some(vec![openapi::ServerBuilder::new().url(base_path).build()]);
    }
    api
}
