//! Schema bootstrap
//!
//! DDL for the five tables, emitted per backend. Text keys use byte-order
//! collation on both backends so username and tag tie-breaks agree with `str`
//! ordering. Foreign keys cascade from users to papers and likes, and from
//! papers to tags and likes.

use crate::errors::Result;
use sea_orm::{ConnectionTrait, DbBackend, Statement};
use tracing::{debug, info};

/// Tables owned by the schema, in dependency order
pub const TABLES: [&str; 5] = ["users", "papers", "tagnames", "likes", "tags"];

const POSTGRES_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        username VARCHAR(50) COLLATE "C" NOT NULL PRIMARY KEY,
        password VARCHAR(255) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS papers (
        pid SERIAL PRIMARY KEY,
        username VARCHAR(50) COLLATE "C" NOT NULL
            REFERENCES users (username) ON DELETE CASCADE,
        title VARCHAR(50) NOT NULL,
        description VARCHAR(500) NOT NULL DEFAULT '',
        begin_time TIMESTAMPTZ NOT NULL,
        content TEXT NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS papers_username_idx ON papers (username)",
    "CREATE INDEX IF NOT EXISTS papers_begin_time_idx ON papers (begin_time DESC, pid)",
    r#"
    CREATE TABLE IF NOT EXISTS tagnames (
        tagname VARCHAR(50) COLLATE "C" NOT NULL PRIMARY KEY
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS likes (
        pid INTEGER NOT NULL REFERENCES papers (pid) ON DELETE CASCADE,
        username VARCHAR(50) COLLATE "C" NOT NULL
            REFERENCES users (username) ON DELETE CASCADE,
        like_time TIMESTAMPTZ NOT NULL,
        PRIMARY KEY (pid, username)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS likes_username_idx ON likes (username)",
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        pid INTEGER NOT NULL REFERENCES papers (pid) ON DELETE CASCADE,
        tagname VARCHAR(50) COLLATE "C" NOT NULL
            REFERENCES tagnames (tagname) ON DELETE CASCADE,
        PRIMARY KEY (pid, tagname)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS tags_tagname_idx ON tags (tagname)",
];

const SQLITE_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        username TEXT NOT NULL PRIMARY KEY,
        password TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS papers (
        pid INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL
            REFERENCES users (username) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        begin_time TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS papers_username_idx ON papers (username)",
    "CREATE INDEX IF NOT EXISTS papers_begin_time_idx ON papers (begin_time DESC, pid)",
    r#"
    CREATE TABLE IF NOT EXISTS tagnames (
        tagname TEXT NOT NULL PRIMARY KEY
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS likes (
        pid INTEGER NOT NULL REFERENCES papers (pid) ON DELETE CASCADE,
        username TEXT NOT NULL
            REFERENCES users (username) ON DELETE CASCADE,
        like_time TEXT NOT NULL,
        PRIMARY KEY (pid, username)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS likes_username_idx ON likes (username)",
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        pid INTEGER NOT NULL REFERENCES papers (pid) ON DELETE CASCADE,
        tagname TEXT NOT NULL
            REFERENCES tagnames (tagname) ON DELETE CASCADE,
        PRIMARY KEY (pid, tagname)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS tags_tagname_idx ON tags (tagname)",
];

fn ddl_for(backend: DbBackend) -> &'static [&'static str] {
    match backend {
        DbBackend::Sqlite => SQLITE_DDL,
        _ => POSTGRES_DDL,
    }
}

/// Create every table and index that does not exist yet
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<()> {
    let backend = db.get_database_backend();

    for ddl in ddl_for(backend) {
        db.execute_unprepared(ddl).await?;
    }

    info!(backend = ?backend, "Schema created");
    Ok(())
}

/// Drop every table, dependents first
pub async fn drop_schema<C: ConnectionTrait>(db: &C) -> Result<()> {
    for table in TABLES.iter().rev() {
        db.execute_unprepared(&format!("DROP TABLE IF EXISTS {}", table)).await?;
    }

    info!("Schema dropped");
    Ok(())
}

/// Drop and recreate all tables
pub async fn reset_schema<C: ConnectionTrait>(db: &C) -> Result<()> {
    drop_schema(db).await?;
    create_schema(db).await
}

/// Check whether all five tables are present
pub async fn schema_installed<C: ConnectionTrait>(db: &C) -> Result<bool> {
    let backend = db.get_database_backend();

    let sql = match backend {
        DbBackend::Sqlite => {
            "SELECT COUNT(*) AS n FROM sqlite_master \
             WHERE type = 'table' AND name IN ('users', 'papers', 'tagnames', 'likes', 'tags')"
        }
        _ => {
            "SELECT COUNT(*) AS n FROM information_schema.tables \
             WHERE table_schema = current_schema() \
               AND table_name IN ('users', 'papers', 'tagnames', 'likes', 'tags')"
        }
    };

    let found = match db.query_one(Statement::from_string(backend, sql)).await? {
        Some(row) => row.try_get::<i64>("", "n")?,
        None => 0,
    };

    debug!(found, expected = TABLES.len(), "Checked schema");
    Ok(found == TABLES.len() as i64)
}

/// Create the schema unless it is already complete
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<()> {
    if !schema_installed(db).await? {
        create_schema(db).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_covers_every_table() {
        for backend in [DbBackend::Postgres, DbBackend::Sqlite] {
            let ddl = ddl_for(backend).join("\n");
            for table in TABLES {
                assert!(
                    ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)),
                    "{:?} DDL is missing {}",
                    backend,
                    table
                );
            }
        }
    }

    #[test]
    fn test_postgres_keys_sort_bytewise() {
        let ddl = ddl_for(DbBackend::Postgres).join("\n");
        assert!(ddl.contains(r#"username VARCHAR(50) COLLATE "C""#));
        assert!(ddl.contains(r#"tagname VARCHAR(50) COLLATE "C""#));
    }
}
