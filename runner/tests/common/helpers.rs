//! Test helpers for runner tests

use engine::{EngineError, MockDocumentStore, MockMessageChannel, MockRelationalStore};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use super::fixtures::TestFixtures;

/// Temporary directory of case descriptors sharing one `templates/` folder
pub struct CaseDir {
    dir: TempDir,
}

impl CaseDir {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/request.json"), TestFixtures::REQUEST_TEMPLATE).unwrap();
        fs::write(dir.path().join("templates/response.json"), TestFixtures::RESPONSE_TEMPLATE).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `<file>` holding a descriptor that expects `status`
    pub fn add_case(&self, file: &str, name: &str, status: &str) -> PathBuf {
        self.write(file, &TestFixtures::descriptor(name, status).to_string())
    }

    pub fn write(&self, file: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(file);
        fs::write(&path, contents).unwrap();
        path
    }
}

/// Common helper functions for runner tests
pub struct TestHelpers;

impl TestHelpers {
    /// Channel replying `reply` to every request and expecting one close
    pub fn replying_channel(reply: Value) -> MockMessageChannel {
        let mut channel = MockMessageChannel::new();
        channel
            .expect_subscribe()
            .returning(move |_: &str, _: Duration| Ok(reply.clone()));
        channel.expect_publish().returning(|_: &str, _: &Value| Ok(()));
        channel.expect_close().times(1).returning(|| Ok(()));
        channel
    }

    /// Relational store that is never queried and must be closed once
    pub fn idle_relational() -> MockRelationalStore {
        let mut store = MockRelationalStore::new();
        store.expect_query().times(0);
        store.expect_close().times(1).returning(|| Ok(()));
        store
    }

    /// Document store whose close fails, which must not fail the suite
    pub fn failing_close_documents() -> MockDocumentStore {
        let mut store = MockDocumentStore::new();
        store.expect_find().times(0);
        store
            .expect_close()
            .times(1)
            .returning(|| Err(EngineError::transport("document store", "already closed")));
        store
    }

    pub fn idle_documents() -> MockDocumentStore {
        let mut store = MockDocumentStore::new();
        store.expect_find().times(0);
        store.expect_close().times(1).returning(|| Ok(()));
        store
    }
}
