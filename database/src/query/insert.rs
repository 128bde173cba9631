use itertools::Itertools;
use sqlx::Error;

use crate::client::IndexerPool;
use crate::models::alias::Alias;
use crate::models::basic_output::BasicOutput;
use crate::models::foundry::Foundry;
use crate::models::nft::Nft;
use crate::query::filtered::BindValue;

pub async fn insert_basic_outputs(outputs: &[BasicOutput], pool: &IndexerPool) -> Result<u64, Error> {
    const COLS: usize = 11;
    let rows = outputs
        .iter()
        .map(|o| {
            vec![
                BindValue::Bytes(o.output_id.clone()),
                BindValue::Int(o.native_token_count as i64),
                BindValue::OptBytes(o.sender.clone()),
                BindValue::OptBytes(o.tag.clone()),
                BindValue::Bytes(o.address.clone()),
                BindValue::OptInt(o.storage_deposit_return),
                BindValue::OptBytes(o.storage_deposit_return_address.clone()),
                BindValue::OptInt(o.timelock_time),
                BindValue::OptInt(o.expiration_time),
                BindValue::OptBytes(o.expiration_return_address.clone()),
                BindValue::Int(o.created_at),
            ]
        })
        .collect();
    execute_batch_insert(
        "INSERT INTO basic_outputs (output_id, native_token_count, sender, tag, address,
            storage_deposit_return, storage_deposit_return_address, timelock_time,
            expiration_time, expiration_return_address, created_at)",
        COLS,
        rows,
        pool,
    )
    .await
}

pub async fn insert_nfts(nfts: &[Nft], pool: &IndexerPool) -> Result<u64, Error> {
    const COLS: usize = 13;
    let rows = nfts
        .iter()
        .map(|n| {
            vec![
                BindValue::Bytes(n.nft_id.clone()),
                BindValue::Bytes(n.output_id.clone()),
                BindValue::Int(n.native_token_count as i64),
                BindValue::OptBytes(n.issuer.clone()),
                BindValue::OptBytes(n.sender.clone()),
                BindValue::OptBytes(n.tag.clone()),
                BindValue::Bytes(n.address.clone()),
                BindValue::OptInt(n.storage_deposit_return),
                BindValue::OptBytes(n.storage_deposit_return_address.clone()),
                BindValue::OptInt(n.timelock_time),
                BindValue::OptInt(n.expiration_time),
                BindValue::OptBytes(n.expiration_return_address.clone()),
                BindValue::Int(n.created_at),
            ]
        })
        .collect();
    execute_batch_insert(
        "INSERT INTO nfts (nft_id, output_id, native_token_count, issuer, sender, tag, address,
            storage_deposit_return, storage_deposit_return_address, timelock_time,
            expiration_time, expiration_return_address, created_at)",
        COLS,
        rows,
        pool,
    )
    .await
}

pub async fn insert_aliases(aliases: &[Alias], pool: &IndexerPool) -> Result<u64, Error> {
    const COLS: usize = 8;
    let rows = aliases
        .iter()
        .map(|a| {
            vec![
                BindValue::Bytes(a.alias_id.clone()),
                BindValue::Bytes(a.output_id.clone()),
                BindValue::Int(a.native_token_count as i64),
                BindValue::Bytes(a.state_controller.clone()),
                BindValue::Bytes(a.governor.clone()),
                BindValue::OptBytes(a.issuer.clone()),
                BindValue::OptBytes(a.sender.clone()),
                BindValue::Int(a.created_at),
            ]
        })
        .collect();
    execute_batch_insert(
        "INSERT INTO aliases (alias_id, output_id, native_token_count, state_controller,
            governor, issuer, sender, created_at)",
        COLS,
        rows,
        pool,
    )
    .await
}

pub async fn insert_foundries(foundries: &[Foundry], pool: &IndexerPool) -> Result<u64, Error> {
    const COLS: usize = 5;
    let rows = foundries
        .iter()
        .map(|f| {
            vec![
                BindValue::Bytes(f.foundry_id.clone()),
                BindValue::Bytes(f.output_id.clone()),
                BindValue::Int(f.native_token_count as i64),
                BindValue::Bytes(f.alias_address.clone()),
                BindValue::Int(f.created_at),
            ]
        })
        .collect();
    execute_batch_insert(
        "INSERT INTO foundries (foundry_id, output_id, native_token_count, alias_address, created_at)",
        COLS,
        rows,
        pool,
    )
    .await
}

/// Writes all rows within a single transaction, chunking the multi-row
/// statement below the backend bind-variable limit.
async fn execute_batch_insert(
    insert_clause: &str,
    columns: usize,
    rows: Vec<Vec<BindValue>>,
    pool: &IndexerPool,
) -> Result<u64, Error> {
    if rows.is_empty() {
        return Ok(0);
    }
    let mut rows_affected = 0;
    match pool {
        IndexerPool::Postgres(pool) => {
            let max_rows = u16::MAX as usize / columns; // 2^16 / fields
            let mut tx = pool.begin().await?;
            for chunk in rows.chunks(max_rows) {
                let sql =
                    format!("{} VALUES {}", insert_clause, generate_placeholders(chunk.len(), columns));
                let mut query = sqlx::query(&sql);
                for row in chunk {
                    for bind in row {
                        query = match bind {
                            BindValue::Bytes(v) => query.bind(v),
                            BindValue::OptBytes(v) => query.bind(v),
                            BindValue::Int(v) => query.bind(v),
                            BindValue::OptInt(v) => query.bind(v),
                            BindValue::Text(v) => query.bind(v),
                        };
                    }
                }
                rows_affected += query.execute(&mut *tx).await?.rows_affected();
            }
            tx.commit().await?;
        }
        IndexerPool::Sqlite(pool) => {
            let max_rows = 32766 / columns; // SQLITE_MAX_VARIABLE_NUMBER
            let mut tx = pool.begin().await?;
            for chunk in rows.chunks(max_rows) {
                let sql =
                    format!("{} VALUES {}", insert_clause, generate_placeholders(chunk.len(), columns));
                let mut query = sqlx::query(&sql);
                for row in chunk {
                    for bind in row {
                        query = match bind {
                            BindValue::Bytes(v) => query.bind(v),
                            BindValue::OptBytes(v) => query.bind(v),
                            BindValue::Int(v) => query.bind(v),
                            BindValue::OptInt(v) => query.bind(v),
                            BindValue::Text(v) => query.bind(v),
                        };
                    }
                }
                rows_affected += query.execute(&mut *tx).await?.rows_affected();
            }
            tx.commit().await?;
        }
    }
    Ok(rows_affected)
}

fn generate_placeholders(rows: usize, columns: usize) -> String {
    (0..rows).map(|i| format!("({})", (1..=columns).map(|c| format!("${}", c + i * columns)).join(", "))).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_number_across_rows() {
        assert_eq!(generate_placeholders(1, 3), "($1, $2, $3)");
        assert_eq!(generate_placeholders(2, 2), "($1, $2), ($3, $4)");
    }
}
