use std::path::PathBuf;

/// One of the two build locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// In-progress, unpublished docs.
    Temp,
    /// Published docs.
    Static,
}

/// Well-known files and subtrees of one documentation location.
#[derive(Debug, Clone)]
pub struct LocationPaths {
    pub root: PathBuf,
    /// Hand-written docs subtree.
    pub docs: PathBuf,
    /// Auto-generated docs subtree.
    pub autodocs: PathBuf,
    /// Cached copy of the remote-published index snapshot.
    pub index: PathBuf,
    /// Index built from this location's own docs.
    pub local_index: PathBuf,
}

impl LocationPaths {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            docs: root.join("docs"),
            autodocs: root.join("autodocs"),
            index: root.join("config").join("index.json"),
            local_index: root.join("config").join("index.local.json"),
            root,
        }
    }
}

/// Both build locations plus the remote config base URL.
#[derive(Debug, Clone)]
pub struct DocPaths {
    pub temp: LocationPaths,
    pub static_: LocationPaths,
    remote_config_url: String,
}

impl DocPaths {
    #[must_use]
    pub fn new(
        temp_root: impl Into<PathBuf>,
        static_root: impl Into<PathBuf>,
        remote_config_url: impl Into<String>,
    ) -> Self {
        let mut remote_config_url = remote_config_url.into();
        if !remote_config_url.ends_with('/') {
            remote_config_url.push('/');
        }
        Self {
            temp: LocationPaths::new(temp_root),
            static_: LocationPaths::new(static_root),
            remote_config_url,
        }
    }

    #[must_use]
    pub fn location(&self, location: Location) -> &LocationPaths {
        match location {
            Location::Temp => &self.temp,
            Location::Static => &self.static_,
        }
    }

    /// URL of a file under the remote config base.
    #[must_use]
    pub fn remote_url(&self, file: &str) -> String {
        format!("{}{file}", self.remote_config_url)
    }
}

/// Paths to remote-published metadata and index files, relative to the
/// remote config base.
pub const REMOTE_CONFIG_FILE: &str = "config.json";
pub const REMOTE_INDEX_FILE: &str = "index.json";
pub const REMOTE_AUTODOCS_FILE: &str = "autodocs.json";
