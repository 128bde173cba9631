use log::trace;
use sqlx::{Error, Row};

use crate::client::{DatabaseEngine, IndexerPool};
use crate::models::status::Status;
use crate::query::filtered::{
    cursor_expression, BindValue, FilteredOutputQuery, FilteredResults, Pagination,
};

pub async fn select_status(pool: &IndexerPool) -> Result<Status, Error> {
    let sql = "SELECT ledger_index, protocol_version, network_name, database_version FROM status WHERE id = 1";
    let (ledger_index, protocol_version, network_name, database_version) = match pool {
        IndexerPool::Postgres(pool) => {
            let row = sqlx::query(sql).fetch_one(pool).await?;
            (
                row.try_get::<i64, _>("ledger_index")?,
                row.try_get::<i16, _>("protocol_version")?,
                row.try_get::<String, _>("network_name")?,
                row.try_get::<i32, _>("database_version")?,
            )
        }
        IndexerPool::Sqlite(pool) => {
            let row = sqlx::query(sql).fetch_one(pool).await?;
            (
                row.try_get::<i64, _>("ledger_index")?,
                row.try_get::<i16, _>("protocol_version")?,
                row.try_get::<String, _>("network_name")?,
                row.try_get::<i32, _>("database_version")?,
            )
        }
    };
    Ok(Status {
        ledger_index: ledger_index as u32,
        protocol_version: protocol_version as u8,
        network_name,
        database_version: database_version as u32,
    })
}

struct QueryRow {
    output_id: Vec<u8>,
    cursor: Option<String>,
    ledger_index: i64,
}

/// Executes a composed filter as one read joined against the status row, so
/// every returned id is consistent with the reported ledger index without
/// any locking.
pub async fn select_filtered_output_ids(
    mut query: FilteredOutputQuery,
    page: Pagination,
    pool: &IndexerPool,
) -> Result<FilteredResults, Error> {
    let engine = pool.engine();
    let mut select_list = "output_id".to_string();
    if page.page_size > 0 {
        select_list = format!("output_id, {} AS cursor", cursor_expression(engine));
        if let Some(cursor) = &page.cursor {
            // The comparison is inclusive so same-timestamp rows are never
            // skipped; callers see the cursor row again on the next page.
            let normalized = match engine {
                DatabaseEngine::Sqlite => cursor.to_uppercase(),
                DatabaseEngine::Postgres => cursor.clone(),
            };
            let template = format!("{} >= {{}}", cursor_expression(engine));
            query.bind_condition(&template, BindValue::Text(normalized));
        }
        query.limit(i64::from(page.page_size) + 1);
    }

    let mut sql = format!("SELECT {} FROM {}", select_list, query.table);
    if !query.conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&query.conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at ASC, output_id ASC");
    let mut binds = query.binds;
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT ${}", binds.len() + 1));
        binds.push(BindValue::Int(limit));
    }
    let sql = format!(
        "SELECT results.*, status.ledger_index FROM ({sql}) AS results, (SELECT ledger_index FROM status) AS status"
    );
    trace!("Filtered output query: {sql}");

    let with_cursor = page.page_size > 0;
    let mut rows = fetch_query_rows(&sql, binds, with_cursor, pool).await?;

    let mut ledger_index = rows.first().map(|r| r.ledger_index as u32).unwrap_or_default();
    if rows.is_empty() {
        // Nothing joined against the status row, read the index directly.
        // A failing fallback leaves the index at zero.
        if let Ok(status) = select_status(pool).await {
            ledger_index = status.ledger_index;
        }
    }

    let mut next_cursor = None;
    if page.page_size > 0 && rows.len() as u32 > page.page_size {
        // More rows exist: trim to the page and resume from the last row
        // kept. The inclusive comparison means that row opens the next page
        // again; callers wanting duplicate suppression filter on created_at.
        rows.pop();
        next_cursor = rows.last().and_then(|row| row.cursor.clone()).map(|c| c.to_lowercase());
    }

    Ok(FilteredResults {
        output_ids: rows.into_iter().map(|r| r.output_id).collect(),
        ledger_index,
        next_cursor,
    })
}

async fn fetch_query_rows(
    sql: &str,
    binds: Vec<BindValue>,
    with_cursor: bool,
    pool: &IndexerPool,
) -> Result<Vec<QueryRow>, Error> {
    match pool {
        IndexerPool::Postgres(pool) => {
            let mut query = sqlx::query(sql);
            for bind in &binds {
                query = match bind {
                    BindValue::Bytes(v) => query.bind(v),
                    BindValue::OptBytes(v) => query.bind(v),
                    BindValue::Int(v) => query.bind(v),
                    BindValue::OptInt(v) => query.bind(v),
                    BindValue::Text(v) => query.bind(v),
                };
            }
            query
                .fetch_all(pool)
                .await?
                .iter()
                .map(|row| {
                    Ok(QueryRow {
                        output_id: row.try_get("output_id")?,
                        cursor: if with_cursor { Some(row.try_get("cursor")?) } else { None },
                        ledger_index: row.try_get("ledger_index")?,
                    })
                })
                .collect()
        }
        IndexerPool::Sqlite(pool) => {
            let mut query = sqlx::query(sql);
            for bind in &binds {
                query = match bind {
                    BindValue::Bytes(v) => query.bind(v),
                    BindValue::OptBytes(v) => query.bind(v),
                    BindValue::Int(v) => query.bind(v),
                    BindValue::OptInt(v) => query.bind(v),
                    BindValue::Text(v) => query.bind(v),
                };
            }
            query
                .fetch_all(pool)
                .await?
                .iter()
                .map(|row| {
                    Ok(QueryRow {
                        output_id: row.try_get("output_id")?,
                        cursor: if with_cursor { Some(row.try_get("cursor")?) } else { None },
                        ledger_index: row.try_get("ledger_index")?,
                    })
                })
                .collect()
        }
    }
}
