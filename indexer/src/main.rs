use std::env;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::info;
use tokio::task;

use utxo_indexer::indexer::Indexer;
use utxo_indexer::settings::Settings;
use utxo_indexer::signal::signal_handler::notify_on_signals;
use utxo_indexer::web::web_server::WebServer;
use utxo_indexer_cli::cli_args::get_cli_args;
use utxo_indexer_database::client::IndexerDbClient;

#[tokio::main]
async fn main() {
    println!();
    println!("**************************************************");
    println!("******************* UTXO Indexer *****************");
    println!("**************************************************");
    println!();
    let cli_args = get_cli_args();

    env::set_var("RUST_LOG", &cli_args.log_level);
    env::set_var("RUST_LOG_STYLE", if cli_args.log_no_color { "never" } else { "always" });
    env_logger::builder().target(env_logger::Target::Stdout).format_target(false).format_timestamp_millis().init();

    let database = IndexerDbClient::new_with_args(&cli_args.database_url, cli_args.database_pool_size)
        .await
        .expect("Database connection FAILED");

    if cli_args.initialize_db {
        info!("Initializing database");
        database.drop_schema().await.expect("Unable to drop schema");
    }
    database.create_schema().await.expect("Unable to create schema");
    database.init_status(&cli_args.network).await.expect("Unable to initialize the status row");

    let run = Arc::new(AtomicBool::new(true));
    task::spawn(notify_on_signals(run.clone()));

    let settings = Settings { cli_args };
    let indexer = Indexer::new(database);

    // The ledger-node stream drives the import path through the library API;
    // this process serves the read side.
    let web_server = WebServer::new(run, settings, indexer);
    web_server.run().await.expect("Web server FAILED");
}
