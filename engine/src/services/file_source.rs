//! Filesystem case source

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{EngineError, EngineResult};
use crate::traits::CaseSource;

/// Reads descriptors and templates from disk
///
/// Relative paths resolve against `root` when one is set, otherwise against
/// the working directory.
#[derive(Debug, Clone, Default)]
pub struct FsCaseSource {
    root: Option<PathBuf>,
}

impl FsCaseSource {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl CaseSource for FsCaseSource {
    async fn read_text(&self, path: &Path) -> EngineResult<String> {
        let resolved = self.resolve(path);
        fs::read_to_string(&resolved)
            .await
            .map_err(|e| EngineError::transport("filesystem", format!("{}: {e}", resolved.display())))
    }
}
