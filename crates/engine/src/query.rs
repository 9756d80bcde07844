//! Raw statement helpers shared by the ranking services

use paperclub_common::errors::Result;
use sea_orm::{ConnectionTrait, FromQueryResult, Statement, Value};

/// Columns of a [`PaperView`](paperclub_common::PaperView), read from alias `p`
pub(crate) const PAPER_COLUMNS: &str = "p.pid, p.username, p.title, p.begin_time, p.description";

/// Run `sql` with positional `$N` values and decode every row
pub(crate) async fn fetch_all<T, C>(db: &C, sql: &str, values: Vec<Value>) -> Result<Vec<T>>
where
    T: FromQueryResult,
    C: ConnectionTrait,
{
    let stmt = Statement::from_sql_and_values(db.get_database_backend(), sql, values);
    Ok(T::find_by_statement(stmt).all(db).await?)
}

/// Run a single-row `COUNT` query whose result column is named `n`
pub(crate) async fn fetch_count<C>(db: &C, sql: &str, values: Vec<Value>) -> Result<u64>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_sql_and_values(db.get_database_backend(), sql, values);

    let n = match db.query_one(stmt).await? {
        Some(row) => row.try_get::<i64>("", "n")?,
        None => 0,
    };

    Ok(n.max(0) as u64)
}

/// Bind a row limit
pub(crate) fn limit(value: u64) -> Value {
    Value::from(i64::try_from(value).unwrap_or(i64::MAX))
}
