use crate::builder::{self, BuiltIndexes};
use crate::error::Result;
use crate::hook::{NoopHook, RebuildHook};
use crate::index_store::IndexStore;
use crate::paths::{DocPaths, REMOTE_AUTODOCS_FILE, REMOTE_INDEX_FILE};
use crate::persist::{read_index_safely, write_index};
use crate::registry::AutodocsRegistry;
use crate::remote::{fetch_json, RemoteFetcher};
use crate::store::{ConfigStore, MetaUpdate};
use crate::SyncError;
use docdex_index::IndexNode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Minimum time between unforced remote checks.
pub const UPDATE_INTERVAL_MS: u64 = 3_600_000;

/// Options for [`Indexer::start`].
#[derive(Debug, Clone, Copy)]
pub struct StartOptions {
    /// When false the index is never refreshed from the remote; `index()`
    /// falls back to the published static snapshot. Used while docs are
    /// being reworked locally, so a rebuild pipeline keeps control of the
    /// index.
    pub update_remotely: bool,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            update_remotely: true,
        }
    }
}

/// Options for one [`Indexer::update`] cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Fetch and rebuild regardless of staleness and size deltas.
    pub force: bool,
    /// Write the fetched snapshot to the static location instead of temp.
    pub static_write: bool,
}

/// What one update cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Still inside the TTL window; nothing was checked.
    Skipped,
    /// Remote metadata matched local state; no fetch, no rebuild.
    Unchanged,
    /// At least one remote file was fetched and the index rebuilt.
    Updated,
}

/// The synchronization controller: decides when to re-fetch remote data,
/// fans the fetches out, and triggers rebuild-and-persist cycles.
///
/// Public contract: `start`, `update`, `build`, `index`.
pub struct Indexer {
    paths: DocPaths,
    config: Arc<dyn ConfigStore>,
    autodocs: Arc<dyn AutodocsRegistry>,
    fetcher: Arc<dyn RemoteFetcher>,
    hook: Arc<dyn RebuildHook>,
    store: IndexStore,
    update_interval: Duration,
    update_remotely: AtomicBool,
}

impl Indexer {
    #[must_use]
    pub fn new(
        paths: DocPaths,
        config: Arc<dyn ConfigStore>,
        autodocs: Arc<dyn AutodocsRegistry>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        Self {
            paths,
            config,
            autodocs,
            fetcher,
            hook: Arc::new(NoopHook),
            store: IndexStore::new(),
            update_interval: Duration::from_millis(UPDATE_INTERVAL_MS),
            update_remotely: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn RebuildHook>) -> Self {
        self.hook = hook;
        self
    }

    #[must_use]
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Runs one update immediately and keeps updating once per interval.
    /// Scheduled failures are logged, never propagated; the next tick is
    /// the retry opportunity.
    pub fn start(self: Arc<Self>, options: StartOptions) {
        self.update_remotely
            .store(options.update_remotely, Ordering::Relaxed);
        if !options.update_remotely {
            return;
        }
        let indexer = Arc::clone(&self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(indexer.update_interval);
            loop {
                ticker.tick().await;
                match indexer.update(UpdateOptions::default()).await {
                    Ok(outcome) => log::debug!("scheduled update finished: {outcome:?}"),
                    Err(err) => log::warn!("scheduled update failed: {}", err.diagnostic()),
                }
            }
        });
    }

    /// One synchronization cycle.
    ///
    /// Skips entirely while the last written snapshot is younger than the
    /// update interval, unless forced or the snapshot is unreadable. Then
    /// checks remote metadata and fetches whichever of the autodocs
    /// manifest and the index snapshot changed size; both fetches run
    /// concurrently and are joined before anything is acted on. Any fetch
    /// failure fails the whole cycle with no partial merge and no partial
    /// write. A successful cycle that fetched something ends in a full
    /// rebuild.
    pub async fn update(&self, options: UpdateOptions) -> Result<UpdateOutcome> {
        let since_update = self.since_last_write();
        let stale = since_update.map_or(true, |elapsed| elapsed > self.update_interval);
        if !stale && !options.force {
            log::debug!(
                "index written {since_update:?} ago, inside the {:?} window; skipping",
                self.update_interval
            );
            return Ok(UpdateOutcome::Skipped);
        }

        let remote = report(self.config.get_remote().await)?;
        let local = self.config.get_local();

        let fetch_autodocs =
            options.force || size_differs(local.autodocs_size, remote.autodocs_size);
        let fetch_index =
            options.force || size_differs(local.doc_index_size, remote.doc_index_size);

        let (autodocs_result, index_result) = tokio::join!(
            self.fetch_autodocs(fetch_autodocs),
            self.fetch_index(fetch_index),
        );
        // When both fetches fail, the index error is the one reported.
        let remote_index = report(index_result)?;
        let manifest = report(autodocs_result)?;

        if let Some(manifest) = manifest {
            let size = serde_json::to_vec(&manifest)?.len() as u64;
            self.autodocs.write(manifest).await?;
            self.config.set_local(&MetaUpdate {
                autodocs_size: Some(size),
                ..MetaUpdate::default()
            });
        }
        if let Some(index) = remote_index {
            self.write(Some(index), None, options.static_write)?;
        }

        if !fetch_autodocs && !fetch_index {
            log::debug!("remote sizes match local state; nothing to update");
            return Ok(UpdateOutcome::Unchanged);
        }

        self.rebuild(options).await?;
        Ok(UpdateOutcome::Updated)
    }

    /// Builds both location indexes from the docs trees.
    pub async fn build(&self) -> Result<BuiltIndexes> {
        builder::build(&self.paths, &self.autodocs.config()).await
    }

    /// Persists the given remote and/or locally built index, records write
    /// metadata, and atomically publishes the recomputed merged index.
    pub fn write(
        &self,
        remote: Option<IndexNode>,
        local: Option<IndexNode>,
        static_write: bool,
    ) -> Result<IndexNode> {
        if let Some(remote) = &remote {
            let path = if static_write {
                &self.paths.static_.index
            } else {
                &self.paths.temp.index
            };
            let len = write_index(path, remote)?;
            let update = MetaUpdate {
                doc_index_size: Some(len),
                doc_index_last_write: Some(unix_now_ms()),
                ..MetaUpdate::default()
            };
            if static_write {
                self.config.set_static(&update);
            } else {
                self.config.set_local(&update);
            }
        }
        if let Some(local) = &local {
            write_index(&self.paths.temp.local_index, local)?;
        }
        Ok(self.store.publish(remote, local))
    }

    /// The current merged index. Served from the cache once warm; a cold
    /// call reads the persisted snapshots safely (missing or corrupt files
    /// read as empty) and publishes their merge.
    #[must_use]
    pub fn index(&self) -> IndexNode {
        if let Some(merged) = self.store.merged() {
            return merged;
        }
        let local = read_index_safely(&self.paths.temp.local_index);
        let remote_path = if self.update_remotely.load(Ordering::Relaxed) {
            &self.paths.temp.index
        } else {
            &self.paths.static_.index
        };
        let remote = read_index_safely(remote_path);
        self.store.publish(Some(remote), Some(local))
    }

    async fn rebuild(&self, options: UpdateOptions) -> Result<()> {
        let built = self.build().await?;
        self.write(None, Some(built.temp_index), options.static_write)?;
        self.hook.compare_docs();
        log::info!("index rebuilt after remote update");
        Ok(())
    }

    async fn fetch_autodocs(&self, enabled: bool) -> Result<Option<serde_json::Value>> {
        if !enabled {
            return Ok(None);
        }
        let url = self.paths.remote_url(REMOTE_AUTODOCS_FILE);
        Ok(Some(fetch_json(self.fetcher.as_ref(), &url).await?))
    }

    async fn fetch_index(&self, enabled: bool) -> Result<Option<IndexNode>> {
        if !enabled {
            return Ok(None);
        }
        let url = self.paths.remote_url(REMOTE_INDEX_FILE);
        let value = fetch_json(self.fetcher.as_ref(), &url).await?;
        let index = serde_json::from_value(value).map_err(|err| SyncError::Parse {
            url,
            detail: err.to_string(),
        })?;
        Ok(Some(index))
    }

    /// Elapsed time since the remote snapshot was last written, taken from
    /// the file's mtime. `None` means unreadable, which callers treat as
    /// infinitely stale.
    fn since_last_write(&self) -> Option<Duration> {
        let meta = std::fs::metadata(&self.paths.temp.index).ok()?;
        let mtime = meta.modified().ok()?;
        // A future mtime (clock skew) counts as freshly written.
        Some(SystemTime::now().duration_since(mtime).unwrap_or_default())
    }
}

fn report<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        log::warn!("{}", err.diagnostic());
    }
    result
}

/// A missing local size reads as 0 and a missing remote size as a sentinel
/// that never matches, so either side being unknown forces a fetch.
fn size_differs(local: Option<u64>, remote: Option<u64>) -> bool {
    let local = local.map_or(0, |size| size as i64);
    let remote = remote.map_or(-1, |size| size as i64);
    local != remote
}

fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
