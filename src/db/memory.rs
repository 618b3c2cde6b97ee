use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::db::{merge_into, DocPath, Document, DocumentStore, SetOptions, StoreError, StoreResult};

/// In-process store for tests. Reads and writes can be made to fail.
#[derive(Default)]
pub struct MemoryStore {
    docs: RefCell<BTreeMap<DocPath, Document>>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn raw(&self, path: &DocPath) -> Option<Document> {
        self.docs.borrow().get(path).cloned()
    }

    pub fn insert(&self, path: DocPath, doc: serde_json::Value) {
        let doc = doc.as_object().cloned().unwrap_or_default();
        self.docs.borrow_mut().insert(path, doc);
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &DocPath) -> StoreResult<Option<Document>> {
        if self.fail_reads.get() {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.docs.borrow().get(path).cloned())
    }

    fn set(&self, path: &DocPath, doc: Document, opts: SetOptions) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable(format!("writes disabled: {}", path)));
        }
        let mut docs = self.docs.borrow_mut();
        if opts.merge {
            let existing = docs.entry(path.clone()).or_default();
            merge_into(existing, doc);
        } else {
            docs.insert(path.clone(), doc);
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn server_timestamp(&self) -> serde_json::Value {
        serde_json::Value::String("2024-01-01T00:00:00+00:00".to_string())
    }
}
