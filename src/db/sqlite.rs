use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::db::migrations::run_migrations;
use crate::db::{merge_into, DocPath, Document, DocumentStore, SetOptions, StoreError, StoreResult};

/// Document store kept in a local SQLite file, one row per document path.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        // WAL lets a CLI invocation write while the dashboard is open
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    fn read(conn: &Connection, path: &DocPath) -> StoreResult<Option<Document>> {
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE path = ?1",
                params![path.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            None => Ok(None),
            Some(body) => match serde_json::from_str::<serde_json::Value>(&body)? {
                serde_json::Value::Object(map) => Ok(Some(map)),
                other => Err(StoreError::Unavailable(format!(
                    "document at {} is not an object: {}",
                    path, other
                ))),
            },
        }
    }

    fn write(conn: &Connection, path: &DocPath, doc: &Document) -> StoreResult<()> {
        let body = serde_json::to_string(doc)?;
        conn.execute(
            "INSERT INTO documents (path, body, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(path) DO UPDATE SET body = ?2, updated_at = datetime('now')",
            params![path.as_str(), body],
        )?;
        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, path: &DocPath) -> StoreResult<Option<Document>> {
        Self::read(&self.conn, path)
    }

    fn set(&self, path: &DocPath, doc: Document, opts: SetOptions) -> StoreResult<()> {
        if !opts.merge {
            return Self::write(&self.conn, path, &doc);
        }
        let tx = self.conn.unchecked_transaction()?;
        let mut existing = Self::read(&tx, path)?.unwrap_or_default();
        merge_into(&mut existing, doc);
        Self::write(&tx, path, &existing)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_document_reads_as_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get(&DocPath::tasks("u1")).unwrap().is_none());
    }

    #[test]
    fn overwrite_replaces_whole_document() {
        let store = SqliteStore::open_in_memory().unwrap();
        let path = DocPath::preferences("u1");
        store.set(&path, doc(json!({"a": 1, "b": 2})), SetOptions::overwrite()).unwrap();
        store.set(&path, doc(json!({"a": 3})), SetOptions::overwrite()).unwrap();
        assert_eq!(store.get(&path).unwrap().unwrap(), doc(json!({"a": 3})));
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        let path = DocPath::preferences("u1");
        store.set(&path, doc(json!({"a": 1, "b": 2})), SetOptions::overwrite()).unwrap();
        store.set(&path, doc(json!({"b": 5, "c": 6})), SetOptions::merge()).unwrap();
        assert_eq!(
            store.get(&path).unwrap().unwrap(),
            doc(json!({"a": 1, "b": 5, "c": 6}))
        );
    }

    #[test]
    fn documents_survive_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("muhasaba.db");
        {
            let store = SqliteStore::open(&db).unwrap();
            store
                .set(&DocPath::contacts("u1"), doc(json!({"x": true})), SetOptions::overwrite())
                .unwrap();
        }
        let store = SqliteStore::open(&db).unwrap();
        assert_eq!(store.get(&DocPath::contacts("u1")).unwrap(), Some(doc(json!({"x": true}))));
    }
}
