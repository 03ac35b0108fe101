use crate::error::{Result, SyncError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Registry of libraries whose docs are auto-generated remotely. The
/// controller asks it which libraries exist and hands it freshly fetched
/// manifests to persist.
#[async_trait]
pub trait AutodocsRegistry: Send + Sync {
    /// Names of all registered auto-doc libraries.
    fn config(&self) -> Vec<String>;

    /// Persist a newly fetched `autodocs.json` manifest.
    async fn write(&self, manifest: serde_json::Value) -> Result<()>;
}

/// File-backed registry keeping the manifest at a fixed path. The manifest
/// is a JSON object keyed by library name.
pub struct FileAutodocsRegistry {
    path: PathBuf,
    cached: Mutex<Option<serde_json::Value>>,
}

impl FileAutodocsRegistry {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    fn manifest(&self) -> serde_json::Value {
        let mut cached = lock(&self.cached);
        if let Some(value) = cached.as_ref() {
            return value.clone();
        }
        let value = read_manifest_safely(&self.path);
        *cached = Some(value.clone());
        value
    }
}

#[async_trait]
impl AutodocsRegistry for FileAutodocsRegistry {
    fn config(&self) -> Vec<String> {
        match self.manifest() {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    async fn write(&self, manifest: serde_json::Value) -> Result<()> {
        if !manifest.is_object() {
            return Err(SyncError::Registry(format!(
                "autodocs manifest must be a JSON object, got {manifest}"
            )));
        }
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(&manifest)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        *lock(&self.cached) = Some(manifest);
        Ok(())
    }
}

fn read_manifest_safely(path: &Path) -> serde_json::Value {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            log::warn!("corrupt autodocs manifest at {}: {err}", path.display());
            serde_json::Value::Object(serde_json::Map::new())
        }),
        Err(_) => serde_json::Value::Object(serde_json::Map::new()),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
