use sqlx::Error;

use crate::client::IndexerPool;

pub async fn execute_ddl(ddl: &str, pool: &IndexerPool) -> Result<(), Error> {
    for statement in ddl.split(';').filter(|stmt| !stmt.trim().is_empty()) {
        match pool {
            IndexerPool::Postgres(pool) => {
                sqlx::query(statement).execute(pool).await?;
            }
            IndexerPool::Sqlite(pool) => {
                sqlx::query(statement).execute(pool).await?;
            }
        }
    }
    Ok(())
}
