use log::trace;
use sqlx::Error;

use crate::client::IndexerPool;
use crate::models::status::Status;

/// Upserts the singleton status row. Run by finalize after all pipelines
/// have drained; queries observe the new ledger index only from this point.
pub async fn upsert_status(status: &Status, pool: &IndexerPool) -> Result<u64, Error> {
    trace!("Saving status at ledger_index {}", status.ledger_index);
    let sql = "INSERT INTO status (id, ledger_index, protocol_version, network_name, database_version) \
        VALUES ($1, $2, $3, $4, $5) \
        ON CONFLICT (id) DO UPDATE SET ledger_index = EXCLUDED.ledger_index, \
        protocol_version = EXCLUDED.protocol_version, network_name = EXCLUDED.network_name, \
        database_version = EXCLUDED.database_version";
    let rows_affected = match pool {
        IndexerPool::Postgres(pool) => sqlx::query(sql)
            .bind(1i32)
            .bind(status.ledger_index as i64)
            .bind(status.protocol_version as i16)
            .bind(&status.network_name)
            .bind(status.database_version as i32)
            .execute(pool)
            .await?
            .rows_affected(),
        IndexerPool::Sqlite(pool) => sqlx::query(sql)
            .bind(1i32)
            .bind(status.ledger_index as i64)
            .bind(status.protocol_version as i16)
            .bind(&status.network_name)
            .bind(status.database_version as i32)
            .execute(pool)
            .await?
            .rows_affected(),
    };
    Ok(rows_affected)
}

/// Seeds the status row at startup when none exists yet; an existing row is
/// left untouched.
pub async fn init_status(network_name: &str, database_version: u32, pool: &IndexerPool) -> Result<u64, Error> {
    let sql = "INSERT INTO status (id, ledger_index, protocol_version, network_name, database_version) \
        VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO NOTHING";
    let rows_affected = match pool {
        IndexerPool::Postgres(pool) => sqlx::query(sql)
            .bind(1i32)
            .bind(0i64)
            .bind(0i16)
            .bind(network_name)
            .bind(database_version as i32)
            .execute(pool)
            .await?
            .rows_affected(),
        IndexerPool::Sqlite(pool) => sqlx::query(sql)
            .bind(1i32)
            .bind(0i64)
            .bind(0i16)
            .bind(network_name)
            .bind(database_version as i32)
            .execute(pool)
            .await?
            .rows_affected(),
    };
    Ok(rows_affected)
}
