use crate::error::{Result, SyncError};
use crate::paths::REMOTE_CONFIG_FILE;
use crate::remote::{fetch_json, RemoteFetcher};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Metadata snapshot held by the key-value config store. Sizes are byte
/// lengths of the serialized artifacts; `doc_index_last_write` is unix
/// milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_index_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autodocs_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_index_last_write: Option<u64>,
}

/// Partial update applied to stored metadata; `None` fields are left as
/// they are.
#[derive(Debug, Clone, Default)]
pub struct MetaUpdate {
    pub doc_index_size: Option<u64>,
    pub autodocs_size: Option<u64>,
    pub doc_index_last_write: Option<u64>,
}

impl StoreMeta {
    fn apply(&mut self, update: &MetaUpdate) {
        if let Some(size) = update.doc_index_size {
            self.doc_index_size = Some(size);
        }
        if let Some(size) = update.autodocs_size {
            self.autodocs_size = Some(size);
        }
        if let Some(ts) = update.doc_index_last_write {
            self.doc_index_last_write = Some(ts);
        }
    }
}

/// External metadata store with remote/local/static sides. The remote side
/// may fail with a classified remote error; the local sides are
/// best-effort and absorb their own failures.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get_remote(&self) -> Result<StoreMeta>;
    fn get_local(&self) -> StoreMeta;
    fn set_local(&self, update: &MetaUpdate);
    fn set_static(&self, update: &MetaUpdate);
}

/// JSON-file-backed [`ConfigStore`]. Local and static metadata live in two
/// small JSON files written atomically (tmp file + rename); remote metadata
/// is `config.json` fetched from the remote config base.
pub struct FileConfigStore {
    local_path: PathBuf,
    static_path: PathBuf,
    remote_url: String,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl FileConfigStore {
    #[must_use]
    pub fn new(
        local_path: impl Into<PathBuf>,
        static_path: impl Into<PathBuf>,
        remote_config_base: &str,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        let mut remote_url = remote_config_base.to_string();
        if !remote_url.ends_with('/') {
            remote_url.push('/');
        }
        remote_url.push_str(REMOTE_CONFIG_FILE);
        Self {
            local_path: local_path.into(),
            static_path: static_path.into(),
            remote_url,
            fetcher,
        }
    }

    fn update_file(path: &Path, update: &MetaUpdate) {
        let mut meta = read_meta_safely(path);
        meta.apply(update);
        if let Err(err) = write_meta(path, &meta) {
            log::warn!("failed to persist metadata to {}: {err}", path.display());
        }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get_remote(&self) -> Result<StoreMeta> {
        let value = fetch_json(self.fetcher.as_ref(), &self.remote_url).await?;
        serde_json::from_value(value).map_err(|err| SyncError::Parse {
            url: self.remote_url.clone(),
            detail: err.to_string(),
        })
    }

    fn get_local(&self) -> StoreMeta {
        read_meta_safely(&self.local_path)
    }

    fn set_local(&self, update: &MetaUpdate) {
        Self::update_file(&self.local_path, update);
    }

    fn set_static(&self, update: &MetaUpdate) {
        Self::update_file(&self.static_path, update);
    }
}

fn read_meta_safely(path: &Path) -> StoreMeta {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            log::warn!("corrupt metadata at {}: {err}", path.display());
            StoreMeta::default()
        }),
        Err(_) => StoreMeta::default(),
    }
}

fn write_meta(path: &Path, meta: &StoreMeta) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(meta)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteFetcher;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct CannedFetcher(String);

    #[async_trait]
    impl RemoteFetcher for CannedFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn store(dir: &TempDir, body: &str) -> FileConfigStore {
        FileConfigStore::new(
            dir.path().join("local.json"),
            dir.path().join("static.json"),
            "https://example.test/config",
            Arc::new(CannedFetcher(body.to_string())),
        )
    }

    #[tokio::test]
    async fn remote_metadata_is_fetched_and_parsed() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, r#"{"docIndexSize": 120, "autodocsSize": 34}"#);
        let remote = store.get_remote().await.unwrap();
        assert_eq!(remote.doc_index_size, Some(120));
        assert_eq!(remote.autodocs_size, Some(34));
    }

    #[tokio::test]
    async fn unknown_remote_fields_are_ignored() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, r#"{"docIndexSize": 1, "somethingNew": true}"#);
        let remote = store.get_remote().await.unwrap();
        assert_eq!(remote.doc_index_size, Some(1));
    }

    #[test]
    fn local_updates_merge_into_existing_metadata() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, "{}");

        store.set_local(&MetaUpdate {
            doc_index_size: Some(10),
            ..MetaUpdate::default()
        });
        store.set_local(&MetaUpdate {
            doc_index_last_write: Some(777),
            ..MetaUpdate::default()
        });

        let local = store.get_local();
        assert_eq!(local.doc_index_size, Some(10));
        assert_eq!(local.doc_index_last_write, Some(777));
    }

    #[test]
    fn missing_local_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, "{}");
        assert_eq!(store.get_local(), StoreMeta::default());
    }
}
