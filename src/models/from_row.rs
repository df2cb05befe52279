use rusqlite::{Connection, OptionalExtension, Params, Row};

pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Run `sql` and map every returned row.
pub fn query_all<T, P>(conn: &Connection, sql: &str, params: P) -> rusqlite::Result<Vec<T>>
where
    T: FromSqliteRow,
    P: Params,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| T::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn query_optional<T, P>(conn: &Connection, sql: &str, params: P) -> rusqlite::Result<Option<T>>
where
    T: FromSqliteRow,
    P: Params,
{
    conn.query_row(sql, params, |row| T::from_row(row)).optional()
}
