//! `rawdocs watch`: rebuild whenever watched sources change.
//!
//! ```text
//! notify ─> crossbeam channel ─> Debouncer ─> load cycle (sequential)
//! ctrlc  ─> shutdown channel  ─┘
//! ```
//!
//! The config file is watched too; an edit reloads it through the global
//! handle before the next cycle runs. Cycles never overlap: a burst that
//! arrives during a cycle is picked up by the following one.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use crossbeam::channel::{self, Receiver};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use tokio::runtime::Runtime;

use super::common::{describe, runtime, site_plugin};
use crate::config::{cfg, reload_config};
use crate::host::run_cycle;
use crate::logger::{status_error, status_success};
use crate::plugin::ContentPlugin;
use crate::utils::path::normalize_path;
use crate::utils::plural_count;
use crate::{debug, log};

/// How long to block when nothing is pending.
const IDLE_POLL: Duration = Duration::from_secs(3600);

/// Check if path is a temp/backup file (editor artifacts)
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Collects changed paths until the debounce window closes.
struct Debouncer {
    delay: Duration,
    changes: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    /// Paths under this dir are our own output
    ignore: PathBuf,
}

impl Debouncer {
    fn new(delay: Duration, ignore: PathBuf) -> Self {
        Self {
            delay,
            changes: FxHashSet::default(),
            last_event: None,
            ignore,
        }
    }

    fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => {}
            // Metadata-only changes would retrigger on our own reads
            EventKind::Modify(notify::event::ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => {}
            _ => return,
        }

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            let path = normalize_path(path);
            if path.starts_with(&self.ignore) {
                continue;
            }
            debug!("watch"; "{:?}: {}", event.kind, path.display());
            self.changes.insert(path);
            self.last_event = Some(Instant::now());
        }
    }

    fn is_ready(&self) -> bool {
        self.last_event
            .is_some_and(|last| last.elapsed() >= self.delay && !self.changes.is_empty())
    }

    fn take_if_ready(&mut self) -> Option<Vec<PathBuf>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        let mut paths: Vec<_> = std::mem::take(&mut self.changes).into_iter().collect();
        paths.sort();
        Some(paths)
    }

    /// Time left until the pending burst is ready.
    fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return IDLE_POLL;
        };
        self.delay
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}

/// Keeps the notify watcher pointed at the current plugin's paths.
struct WatchSet {
    watcher: RecommendedWatcher,
    watched: Vec<PathBuf>,
}

impl WatchSet {
    fn new(watcher: RecommendedWatcher) -> Self {
        Self {
            watcher,
            watched: Vec::new(),
        }
    }

    fn update(&mut self, mut paths: Vec<PathBuf>) -> Result<()> {
        paths.retain(|p| p.exists());
        paths.sort();
        paths.dedup();
        if paths == self.watched {
            return Ok(());
        }

        for path in &self.watched {
            let _ = self.watcher.unwatch(path);
        }
        for path in &paths {
            let mode = if path.is_dir() {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            self.watcher.watch(path, mode)?;
            debug!("watch"; "watching {}", path.display());
        }
        self.watched = paths;
        Ok(())
    }
}

/// Paths to watch for the current config.
fn watch_paths() -> Vec<PathBuf> {
    let config = cfg();
    let mut paths = site_plugin(&config).paths_to_watch();
    paths.push(config.config_path.clone());
    paths
}

/// Run one cycle with the current config and report it on the status line.
fn run_once(rt: &Runtime) {
    let config = cfg();
    let plugin = site_plugin(&config);
    match rt.block_on(run_cycle(&plugin, &config)) {
        Ok(report) => status_success(&describe(&report)),
        Err(err) => status_error("load cycle failed", &format!("{err:#}")),
    }
}

/// React to one debounced burst of changes.
fn on_changes(rt: &Runtime, paths: &[PathBuf], set: &mut WatchSet) {
    let config_path = normalize_path(&cfg().config_path);
    if paths.iter().any(|p| *p == config_path) {
        match reload_config() {
            Ok(true) => {
                log!("watch"; "config reloaded");
                if let Err(err) = set.update(watch_paths()) {
                    log!("warning"; "failed to update watched paths: {err}");
                }
            }
            Ok(false) => {}
            Err(err) => {
                status_error("config reload failed, keeping previous config", &format!("{err:#}"));
                return;
            }
        }
    }

    debug!("watch"; "{} changed", plural_count(paths.len(), "path"));
    run_once(rt);
}

/// Build once, then rebuild on every debounced change until Ctrl+C.
pub fn watch_site() -> Result<()> {
    let rt = runtime()?;

    let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| anyhow!("failed to set Ctrl+C handler: {}", e))?;

    // Watcher first so edits made during the initial cycle are not lost
    let (event_tx, event_rx) = channel::unbounded();
    let watcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })?;
    let mut set = WatchSet::new(watcher);
    set.update(watch_paths())?;

    run_once(&rt);
    log!("watch"; "watching for changes, press Ctrl+C to stop");

    let config = cfg();
    let delay = Duration::from_millis(config.watch.debounce_ms);
    let mut debouncer = Debouncer::new(delay, normalize_path(&config.generated_dir()));
    event_loop(&rt, &event_rx, &shutdown_rx, &mut debouncer, &mut set);

    log!("watch"; "stopped");
    Ok(())
}

fn event_loop(
    rt: &Runtime,
    events: &Receiver<notify::Result<notify::Event>>,
    shutdown: &Receiver<()>,
    debouncer: &mut Debouncer,
    set: &mut WatchSet,
) {
    loop {
        channel::select! {
            recv(shutdown) -> _ => break,
            recv(events) -> msg => match msg {
                Ok(Ok(event)) => debouncer.add_event(&event),
                Ok(Err(err)) => log!("watch"; "notify error: {}", err),
                Err(_) => break,
            },
            default(debouncer.sleep_duration()) => {
                if let Some(paths) = debouncer.take_if_ready() {
                    on_changes(rt, &paths, set);
                }
            }
        }
    }
}
