use std::str::FromStr;
use std::time::Duration;

use log::{debug, info, warn, LevelFilter};
use regex::Regex;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Error, Pool, Postgres, Sqlite};

use crate::models::alias::Alias;
use crate::models::basic_output::BasicOutput;
use crate::models::foundry::Foundry;
use crate::models::nft::Nft;
use crate::models::status::Status;
use crate::query;
use crate::query::filtered::{FilteredOutputQuery, FilteredResults, Pagination};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DatabaseEngine {
    Postgres,
    Sqlite,
}

#[derive(Clone)]
pub enum IndexerPool {
    Postgres(Pool<Postgres>),
    Sqlite(Pool<Sqlite>),
}

impl IndexerPool {
    pub fn engine(&self) -> DatabaseEngine {
        match self {
            IndexerPool::Postgres(_) => DatabaseEngine::Postgres,
            IndexerPool::Sqlite(_) => DatabaseEngine::Sqlite,
        }
    }
}

#[derive(Clone)]
pub struct IndexerDbClient {
    pool: IndexerPool,
}

impl IndexerDbClient {
    pub const SCHEMA_VERSION: u32 = 1;

    pub async fn new(url: &str) -> Result<IndexerDbClient, Error> {
        Self::new_with_args(url, 10).await
    }

    pub async fn new_with_args(url: &str, pool_size: u32) -> Result<IndexerDbClient, Error> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            let url_cleaned = Regex::new(r"(postgres(?:ql)?://[^:/@]+:)[^@]+(@)")
                .expect("Failed to parse url")
                .replace(url, "$1$2");
            debug!("Connecting to PostgreSQL {}", url_cleaned);
            let connect_opts = PgConnectOptions::from_str(url)?
                .log_slow_statements(LevelFilter::Warn, Duration::from_secs(60));
            let pool = PgPoolOptions::new()
                .acquire_timeout(Duration::from_secs(10))
                .max_connections(pool_size)
                .connect_with(connect_opts)
                .await?;
            info!("Connected to PostgreSQL {}", url_cleaned);
            Ok(IndexerDbClient { pool: IndexerPool::Postgres(pool) })
        } else if url.starts_with("sqlite:") {
            debug!("Connecting to SQLite {}", url);
            let connect_opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .acquire_timeout(Duration::from_secs(10))
                .max_connections(pool_size)
                .min_connections(1)
                .connect_with(connect_opts)
                .await?;
            info!("Connected to SQLite {}", url);
            Ok(IndexerDbClient { pool: IndexerPool::Sqlite(pool) })
        } else {
            Err(Error::Configuration(
                format!("unsupported database url '{url}', expected postgres:// or sqlite:").into(),
            ))
        }
    }

    pub fn engine(&self) -> DatabaseEngine {
        self.pool.engine()
    }

    pub fn pool(&self) -> &IndexerPool {
        &self.pool
    }

    pub async fn close(&self) {
        match &self.pool {
            IndexerPool::Postgres(pool) => pool.close().await,
            IndexerPool::Sqlite(pool) => pool.close().await,
        }
    }

    pub async fn create_schema(&self) -> Result<(), Error> {
        match self.select_status().await {
            Ok(status) => {
                if status.database_version != Self::SCHEMA_VERSION {
                    panic!(
                        "Found unsupported schema v{}, this build supports v{}",
                        status.database_version,
                        Self::SCHEMA_VERSION
                    );
                }
                info!("Schema v{} is up to date", status.database_version);
            }
            Err(_) => {
                warn!("Applying schema v{}", Self::SCHEMA_VERSION);
                query::misc::execute_ddl(self.up_ddl(), &self.pool).await?;
                info!("Schema applied successfully");
            }
        }
        Ok(())
    }

    pub async fn drop_schema(&self) -> Result<(), Error> {
        query::misc::execute_ddl(self.down_ddl(), &self.pool).await
    }

    fn up_ddl(&self) -> &'static str {
        match self.engine() {
            DatabaseEngine::Postgres => {
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/postgres/up.sql"))
            }
            DatabaseEngine::Sqlite => {
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/sqlite/up.sql"))
            }
        }
    }

    fn down_ddl(&self) -> &'static str {
        match self.engine() {
            DatabaseEngine::Postgres => {
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/postgres/down.sql"))
            }
            DatabaseEngine::Sqlite => {
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/sqlite/down.sql"))
            }
        }
    }

    /// Seeds the status row at startup when the table is empty.
    pub async fn init_status(&self, network_name: &str) -> Result<u64, Error> {
        query::upsert::init_status(network_name, Self::SCHEMA_VERSION, &self.pool).await
    }

    pub async fn select_status(&self) -> Result<Status, Error> {
        query::select::select_status(&self.pool).await
    }

    pub async fn upsert_status(&self, status: &Status) -> Result<u64, Error> {
        query::upsert::upsert_status(status, &self.pool).await
    }

    pub async fn insert_basic_outputs(&self, outputs: &[BasicOutput]) -> Result<u64, Error> {
        query::insert::insert_basic_outputs(outputs, &self.pool).await
    }

    pub async fn insert_nfts(&self, nfts: &[Nft]) -> Result<u64, Error> {
        query::insert::insert_nfts(nfts, &self.pool).await
    }

    pub async fn insert_aliases(&self, aliases: &[Alias]) -> Result<u64, Error> {
        query::insert::insert_aliases(aliases, &self.pool).await
    }

    pub async fn insert_foundries(&self, foundries: &[Foundry]) -> Result<u64, Error> {
        query::insert::insert_foundries(foundries, &self.pool).await
    }

    pub async fn select_filtered_output_ids(
        &self,
        filter: FilteredOutputQuery,
        page: Pagination,
    ) -> Result<FilteredResults, Error> {
        query::select::select_filtered_output_ids(filter, page, &self.pool).await
    }
}
