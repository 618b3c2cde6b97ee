use rusqlite::Connection;

use crate::db::StoreResult;

pub fn run_migrations(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            path        TEXT PRIMARY KEY,
            body        TEXT NOT NULL,
            updated_at  TEXT DEFAULT (datetime('now'))
        );
    ",
    )?;
    Ok(())
}
