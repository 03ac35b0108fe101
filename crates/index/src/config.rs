use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

/// File name of a per-library classification config.
pub const LIBRARY_CONFIG_FILE: &str = "config.json";

/// Per-library classification rules, loaded from that library's
/// `config.json`. Every field defaults to empty; a library without a config
/// falls back to structural defaults during classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LibraryConfig {
    pub methods: Vec<String>,
    pub properties: Vec<String>,
    pub docs: Vec<String>,
    pub doc_sequence: HashMap<String, i64>,
}

/// Mapping from library name to its classification config.
pub type ConfigMap = HashMap<String, LibraryConfig>;

/// Collects every `config.json` under `root` into a [`ConfigMap`], keyed by
/// the name of the directory holding the file.
///
/// A file that fails to read or parse is logged and dropped; one broken
/// config must never abort a whole build. A missing root yields an empty
/// map.
pub fn read_configs(root: &Path) -> Result<ConfigMap> {
    let mut configs = ConfigMap::new();
    if !root.exists() {
        return Ok(configs);
    }

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| IndexError::Walk {
            path: root.display().to_string(),
            source,
        })?;
        if !entry.file_type().is_file() || entry.file_name() != LIBRARY_CONFIG_FILE {
            continue;
        }
        let Some(lib) = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
        else {
            continue;
        };
        match load_config(entry.path()) {
            Ok(config) => {
                configs.insert(lib, config);
            }
            Err(err) => {
                log::warn!(
                    "ignoring unreadable config {}: {err}",
                    entry.path().display()
                );
            }
        }
    }

    Ok(configs)
}

fn load_config(path: &Path) -> Result<LibraryConfig> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_root_yields_empty_map() {
        let dir = TempDir::new().unwrap();
        let configs = read_configs(&dir.path().join("nope")).unwrap();
        assert!(configs.is_empty());
    }

    #[test]
    fn keys_configs_by_containing_directory() {
        let dir = TempDir::new().unwrap();
        let lib = dir.path().join("mylib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(
            lib.join("config.json"),
            r#"{"methods":["foo"],"docs":["guide"],"docSequence":{"guide":1}}"#,
        )
        .unwrap();

        let configs = read_configs(dir.path()).unwrap();
        let config = configs.get("mylib").unwrap();
        assert_eq!(config.methods, vec!["foo".to_string()]);
        assert_eq!(config.docs, vec!["guide".to_string()]);
        assert_eq!(config.doc_sequence.get("guide"), Some(&1));
        assert!(config.properties.is_empty());
    }

    #[test]
    fn broken_config_is_absorbed() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("badlib");
        let good = dir.path().join("goodlib");
        fs::create_dir_all(&bad).unwrap();
        fs::create_dir_all(&good).unwrap();
        fs::write(bad.join("config.json"), "{ not json").unwrap();
        fs::write(good.join("config.json"), r#"{"properties":["version"]}"#).unwrap();

        let configs = read_configs(dir.path()).unwrap();
        assert!(!configs.contains_key("badlib"));
        assert_eq!(
            configs.get("goodlib").unwrap().properties,
            vec!["version".to_string()]
        );
    }

    #[test]
    fn other_json_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        let lib = dir.path().join("mylib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("index.json"), "{}").unwrap();

        let configs = read_configs(dir.path()).unwrap();
        assert!(configs.is_empty());
    }
}
