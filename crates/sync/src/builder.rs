use crate::error::{Result, SyncError};
use crate::paths::{DocPaths, Location, LocationPaths};
use docdex_index::{
    apply_autodocs, apply_configs, apply_libs, build_tree, merge, read_configs, ConfigMap,
    IndexNode, SourceType,
};
use std::path::PathBuf;

/// The two location indexes one build produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltIndexes {
    /// Index of the published docs tree; wins reconciliation conflicts.
    pub static_index: IndexNode,
    /// Index of the in-progress docs tree.
    pub temp_index: IndexNode,
}

/// Builds both locations concurrently and joins before returning.
pub async fn build(paths: &DocPaths, registered_autodocs: &[String]) -> Result<BuiltIndexes> {
    let (static_index, temp_index) = tokio::try_join!(
        build_location(paths.location(Location::Static), Location::Static, registered_autodocs),
        build_location(paths.location(Location::Temp), Location::Temp, registered_autodocs),
    )?;
    Ok(BuiltIndexes {
        static_index,
        temp_index,
    })
}

/// Builds one location's index: the four walks (docs tree, docs configs,
/// autodocs tree, autodocs configs) run concurrently and are joined before
/// classification touches anything. Within a location the manual tree is
/// official and the auto tree is local.
pub async fn build_location(
    paths: &LocationPaths,
    location: Location,
    registered_autodocs: &[String],
) -> Result<IndexNode> {
    let (mut manual, manual_configs, mut auto, auto_configs) = tokio::try_join!(
        walk_tree(paths.docs.clone(), SourceType::Manual),
        walk_configs(paths.docs.clone()),
        walk_tree(paths.autodocs.clone(), SourceType::Auto),
        walk_configs(paths.autodocs.clone()),
    )?;

    apply_configs(&mut manual, &manual_configs);
    apply_configs(&mut auto, &auto_configs);
    apply_libs(&mut manual);
    apply_libs(&mut auto);
    if location == Location::Temp {
        // Placeholders only make sense where in-progress work happens; the
        // published tree either has a library or does not.
        apply_autodocs(&mut auto, registered_autodocs);
    }

    Ok(merge(&manual, &auto))
}

async fn walk_tree(root: PathBuf, source: SourceType) -> Result<IndexNode> {
    tokio::task::spawn_blocking(move || build_tree(&root, source))
        .await
        .map_err(|err| SyncError::Other(format!("tree walk task panicked: {err}")))?
        .map_err(SyncError::from)
}

async fn walk_configs(root: PathBuf) -> Result<ConfigMap> {
    tokio::task::spawn_blocking(move || read_configs(&root))
        .await
        .map_err(|err| SyncError::Other(format!("config walk task panicked: {err}")))?
        .map_err(SyncError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdex_index::NodeClass;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, bytes: usize) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![b'x'; bytes]).unwrap();
    }

    #[tokio::test]
    async fn location_merges_manual_over_auto() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "docs/mylib/intro.md", 50);
        write(dir.path(), "autodocs/mylib/intro.md", 99);
        write(dir.path(), "autodocs/genlib/api.md", 7);

        let paths = LocationPaths::new(dir.path());
        let index = build_location(&paths, Location::Static, &[]).await.unwrap();

        // Manual is official within a location.
        let mylib = index.child("mylib").unwrap();
        assert_eq!(mylib.class, Some(NodeClass::Lib));
        assert_eq!(mylib.child("intro").unwrap().basic, Some(50));
        assert_eq!(
            mylib.child("intro").unwrap().source,
            Some(SourceType::Manual)
        );

        let genlib = index.child("genlib").unwrap();
        assert_eq!(genlib.child("api").unwrap().source, Some(SourceType::Auto));
    }

    #[tokio::test]
    async fn temp_location_gets_unbuilt_placeholders() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "docs/mylib/intro.md", 5);

        let paths = LocationPaths::new(dir.path());
        let registered = vec!["mylib".to_string(), "remote-only".to_string()];
        let index = build_location(&paths, Location::Temp, &registered)
            .await
            .unwrap();

        assert_eq!(index.child("mylib").unwrap().class, Some(NodeClass::Lib));
        assert_eq!(
            index.child("remote-only").unwrap().class,
            Some(NodeClass::UnbuiltLib)
        );
    }

    #[tokio::test]
    async fn static_location_skips_placeholders() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "docs/mylib/intro.md", 5);

        let paths = LocationPaths::new(dir.path());
        let registered = vec!["remote-only".to_string()];
        let index = build_location(&paths, Location::Static, &registered)
            .await
            .unwrap();

        assert!(index.child("remote-only").is_none());
    }

    #[tokio::test]
    async fn empty_locations_build_empty_indexes() {
        let dir = TempDir::new().unwrap();
        let paths = DocPaths::new(
            dir.path().join("temp"),
            dir.path().join("static"),
            "https://example.test/config",
        );

        let built = build(&paths, &[]).await.unwrap();
        assert_eq!(built.static_index, IndexNode::new());
        assert_eq!(built.temp_index, IndexNode::new());
    }

    #[tokio::test]
    async fn configs_classify_each_source_tree() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "docs/mylib/foo.md", 10);
        fs::write(
            dir.path().join("docs/mylib/config.json"),
            r#"{"methods":["foo"]}"#,
        )
        .unwrap();

        let paths = LocationPaths::new(dir.path());
        let index = build_location(&paths, Location::Static, &[]).await.unwrap();
        assert_eq!(
            index.child("mylib").unwrap().child("foo").unwrap().class,
            Some(NodeClass::Method)
        );
    }
}
