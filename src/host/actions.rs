//! Staged build actions.
//!
//! Data artifacts of a cycle are written into a private staging directory
//! and routes are held in memory. Nothing becomes visible until
//! [`BuildActions::commit`]:
//!
//! ```text
//! <output>/.rawdocs/
//! ├── staging-<id>/        create_data writes here during the cycle
//! ├── retired-<id>/        previous data while a commit swaps it out
//! ├── data/<plugin>/       staging dir renamed here on commit
//! ├── routes.json
//! ├── globalData.json
//! └── webpack.json
//! ```
//!
//! A commit writes every table to a temp file first, then swaps the data
//! directory, then renames the tables into place with `routes.json` last.
//! A failure at any step leaves the previous data directory and route table
//! published. A `BuildActions` dropped without a commit removes its staging
//! directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use anyhow::{Context, Result, bail};
use parking_lot::Mutex;
use tokio::fs;

use crate::debug;
use crate::plugin::{Actions, ArtifactRef, RouteConfig};

/// Reference prefix the render runtime resolves to the data directory.
pub const GENERATED_ALIAS: &str = "@generated";

/// Published tables, in rename order. `routes.json` references data
/// artifacts and goes last.
const TABLES: [&str; 3] = ["webpack.json", "globalData.json", "routes.json"];

static NEXT_STAGING_ID: AtomicU64 = AtomicU64::new(0);

/// What a committed cycle left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub artifacts: usize,
    pub routes: usize,
}

/// [`Actions`] for one plugin and one load cycle.
pub struct BuildActions {
    plugin: String,
    generated_dir: PathBuf,
    staging_dir: PathBuf,
    retired_dir: PathBuf,
    routes: Mutex<Vec<RouteConfig>>,
    global_data: Mutex<Option<serde_json::Value>>,
    artifacts: Mutex<Vec<String>>,
    committed: AtomicBool,
}

impl BuildActions {
    /// Create a fresh staging directory under `generated_dir`.
    pub async fn new(generated_dir: &Path, plugin: &str) -> Result<Self> {
        let id = NEXT_STAGING_ID.fetch_add(1, Ordering::Relaxed);
        let suffix = format!("{}-{id}", std::process::id());
        let staging_dir = generated_dir.join(format!("staging-{suffix}"));
        fs::create_dir_all(&staging_dir).await.with_context(|| {
            format!("failed to create staging dir {}", staging_dir.display())
        })?;

        Ok(Self {
            plugin: plugin.to_string(),
            generated_dir: generated_dir.to_path_buf(),
            staging_dir,
            retired_dir: generated_dir.join(format!("retired-{suffix}")),
            routes: Mutex::new(Vec::new()),
            global_data: Mutex::new(None),
            artifacts: Mutex::new(Vec::new()),
            committed: AtomicBool::new(false),
        })
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Final location of this plugin's data artifacts.
    pub fn data_dir(&self) -> PathBuf {
        self.generated_dir.join("data").join(&self.plugin)
    }

    /// Routes emitted so far, in emission order.
    pub fn routes(&self) -> Vec<RouteConfig> {
        self.routes.lock().clone()
    }

    /// Publish the cycle: promote staged artifacts together with the route
    /// table, global data and the bundler patch.
    pub async fn commit(&self, webpack: Option<&serde_json::Value>) -> Result<CommitSummary> {
        let routes = self.routes();
        let mut global = serde_json::Map::new();
        global.insert(
            self.plugin.clone(),
            self.global_data.lock().clone().unwrap_or_default(),
        );
        let contents = [
            serde_json::to_string_pretty(&webpack)?,
            serde_json::to_string_pretty(&global)?,
            serde_json::to_string_pretty(&routes)?,
        ];

        let mut pending = Vec::with_capacity(TABLES.len());
        for (name, content) in TABLES.into_iter().zip(contents) {
            let target = self.generated_dir.join(name);
            let tmp = target.with_extension("json.tmp");
            if let Err(err) = fs::write(&tmp, content).await {
                discard(&pending).await;
                return Err(err).with_context(|| format!("failed to write {}", tmp.display()));
            }
            pending.push((tmp, target));
        }

        let retired = match self.swap_data_dir().await {
            Ok(retired) => retired,
            Err(err) => {
                discard(&pending).await;
                return Err(err);
            }
        };

        for (i, (tmp, target)) in pending.iter().enumerate() {
            if let Err(err) = fs::rename(tmp, target).await {
                self.restore_data_dir(retired).await;
                discard(&pending[i..]).await;
                return Err(err).with_context(|| format!("failed to write {}", target.display()));
            }
        }
        self.committed.store(true, Ordering::SeqCst);

        if retired && let Err(err) = fs::remove_dir_all(&self.retired_dir).await {
            debug!("build"; "failed to remove {}: {}", self.retired_dir.display(), err);
        }

        Ok(CommitSummary {
            artifacts: self.artifacts.lock().len(),
            routes: routes.iter().map(RouteConfig::count).sum(),
        })
    }

    /// Move the previous data dir aside and the staging dir into its place.
    ///
    /// Returns whether a previous data dir was retired.
    async fn swap_data_dir(&self) -> Result<bool> {
        let data_dir = self.data_dir();
        if let Some(parent) = data_dir.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let retired = fs::try_exists(&data_dir).await?;
        if retired {
            fs::rename(&data_dir, &self.retired_dir)
                .await
                .with_context(|| format!("failed to retire {}", data_dir.display()))?;
        }

        if let Err(err) = fs::rename(&self.staging_dir, &data_dir).await {
            if retired {
                let _ = fs::rename(&self.retired_dir, &data_dir).await;
            }
            return Err(err).with_context(|| {
                format!(
                    "failed to promote {} to {}",
                    self.staging_dir.display(),
                    data_dir.display()
                )
            });
        }
        Ok(retired)
    }

    /// Undo [`Self::swap_data_dir`]. The new data goes back to staging, where
    /// drop discards it.
    async fn restore_data_dir(&self, retired: bool) {
        let data_dir = self.data_dir();
        let _ = fs::rename(&data_dir, &self.staging_dir).await;
        if retired {
            let _ = fs::rename(&self.retired_dir, &data_dir).await;
        }
    }
}

impl Drop for BuildActions {
    fn drop(&mut self) {
        if !self.committed.load(Ordering::SeqCst) && self.staging_dir.exists() {
            let _ = std::fs::remove_dir_all(&self.staging_dir);
        }
    }
}

impl Actions for BuildActions {
    async fn create_data(&self, filename: &str, payload: &str) -> Result<ArtifactRef> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename == "."
            || filename == ".."
        {
            bail!("invalid data artifact name: {filename:?}");
        }

        let path = self.staging_dir.join(filename);
        fs::write(&path, payload)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        self.artifacts.lock().push(filename.to_string());

        Ok(ArtifactRef::new(format!(
            "{GENERATED_ALIAS}/{}/{filename}",
            self.plugin
        )))
    }

    fn add_route(&self, route: RouteConfig) {
        self.routes.lock().push(route);
    }

    fn set_global_data(&self, data: serde_json::Value) {
        *self.global_data.lock() = Some(data);
    }
}

/// Remove temp tables that will not be published.
async fn discard(pending: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in pending {
        let _ = fs::remove_file(tmp).await;
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_data_is_staged() {
        let tmp = TempDir::new().unwrap();
        let actions = BuildActions::new(tmp.path(), "docs").await.unwrap();

        let artifact = actions.create_data("a.json", "\"hi\"").await.unwrap();
        assert_eq!(artifact.as_str(), "@generated/docs/a.json");
        assert_eq!(
            fs::read_to_string(actions.staging_dir().join("a.json")).unwrap(),
            "\"hi\""
        );
        assert!(!actions.data_dir().exists());
    }

    #[tokio::test]
    async fn test_commit_promotes_and_writes_tables() {
        let tmp = TempDir::new().unwrap();
        let actions = BuildActions::new(tmp.path(), "docs").await.unwrap();
        actions.create_data("a.json", "1").await.unwrap();
        actions.add_route(
            RouteConfig::new("/docs", "DocPage")
                .with_routes(vec![RouteConfig::new("/docs/a", "DocItem")]),
        );
        actions.set_global_data(serde_json::json!({ "path": "/docs" }));

        let summary = actions
            .commit(Some(&serde_json::json!({ "resolve": {} })))
            .await
            .unwrap();
        assert_eq!(summary, CommitSummary { artifacts: 1, routes: 2 });

        let staging = actions.staging_dir().to_path_buf();
        drop(actions);
        assert!(!staging.exists());
        assert!(tmp.path().join("data/docs/a.json").exists());

        let routes: Vec<RouteConfig> =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("routes.json")).unwrap())
                .unwrap();
        assert_eq!(routes[0].routes[0].path, "/docs/a");

        let global: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(tmp.path().join("globalData.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(global["docs"]["path"], "/docs");
        assert!(tmp.path().join("webpack.json").exists());
    }

    #[tokio::test]
    async fn test_commit_replaces_previous_data() {
        let tmp = TempDir::new().unwrap();
        let first = BuildActions::new(tmp.path(), "docs").await.unwrap();
        first.create_data("old.json", "1").await.unwrap();
        first.commit(None).await.unwrap();

        let second = BuildActions::new(tmp.path(), "docs").await.unwrap();
        second.create_data("new.json", "2").await.unwrap();
        second.commit(None).await.unwrap();

        assert!(!tmp.path().join("data/docs/old.json").exists());
        assert!(tmp.path().join("data/docs/new.json").exists());
        assert_eq!(leftovers(tmp.path()), Vec::<String>::new());
    }

    /// Staging, retired and temp entries left in the generated dir.
    fn leftovers(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("staging-") || n.starts_with("retired-") || n.ends_with(".tmp"))
            .collect();
        names.sort();
        names
    }

    async fn commit_one(dir: &Path, artifact: &str) -> Result<CommitSummary> {
        let actions = BuildActions::new(dir, "docs").await?;
        let reference = actions.create_data(artifact, "1").await?;
        actions.add_route(
            RouteConfig::new("/docs", "DocPage").with_routes(vec![
                RouteConfig::new("/docs/a", "DocItem").with_module("rawContent", reference),
            ]),
        );
        actions.commit(None).await
    }

    #[tokio::test]
    async fn test_failed_table_write_keeps_previous_data() {
        let tmp = TempDir::new().unwrap();
        commit_one(tmp.path(), "old.json").await.unwrap();
        let before = fs::read_to_string(tmp.path().join("routes.json")).unwrap();

        // A directory where the temp table goes makes the write fail
        fs::create_dir(tmp.path().join("routes.json.tmp")).unwrap();
        assert!(commit_one(tmp.path(), "new.json").await.is_err());

        assert_eq!(fs::read_to_string(tmp.path().join("routes.json")).unwrap(), before);
        assert!(tmp.path().join("data/docs/old.json").exists());
        assert!(!tmp.path().join("data/docs/new.json").exists());

        fs::remove_dir(tmp.path().join("routes.json.tmp")).unwrap();
        assert_eq!(leftovers(tmp.path()), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_failed_table_rename_restores_data_dir() {
        let tmp = TempDir::new().unwrap();
        commit_one(tmp.path(), "old.json").await.unwrap();

        // A non-empty directory cannot be replaced by a file rename
        let routes = tmp.path().join("routes.json");
        fs::remove_file(&routes).unwrap();
        fs::create_dir(&routes).unwrap();
        fs::write(routes.join("keep"), "").unwrap();

        assert!(commit_one(tmp.path(), "new.json").await.is_err());

        assert!(tmp.path().join("data/docs/old.json").exists());
        assert!(!tmp.path().join("data/docs/new.json").exists());
        assert_eq!(leftovers(tmp.path()), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_drop_without_commit_discards() {
        let tmp = TempDir::new().unwrap();
        let actions = BuildActions::new(tmp.path(), "docs").await.unwrap();
        actions.create_data("a.json", "1").await.unwrap();
        let staging = actions.staging_dir().to_path_buf();

        drop(actions);
        assert!(!staging.exists());
        assert!(!tmp.path().join("data").exists());
        assert!(!tmp.path().join("routes.json").exists());
    }

    #[tokio::test]
    async fn test_rejects_nested_names() {
        let tmp = TempDir::new().unwrap();
        let actions = BuildActions::new(tmp.path(), "docs").await.unwrap();
        assert!(actions.create_data("../escape.json", "1").await.is_err());
        assert!(actions.create_data("", "1").await.is_err());
    }
}
