//! The haste map: builds the name index and keeps it current.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU8;
use std::sync::Arc;

use futures_util::future::try_join_all;
use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::build::{unix_now_secs, BuildProgress, BuildState, ProgressSnapshot};
use super::gates::ProcessingGates;
use super::index::HasteIndex;
use crate::config::HasteMapConfig;
use crate::error::Result;
use crate::helpers::Helpers;
use crate::module_cache::{Descriptor, ModuleCache};
use crate::types::{
    ChangeType, DescriptorKind, HasteMapChanged, ModuleEntry, PackageEntry, PACKAGE_JSON,
};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Everything a driver hands to [`HasteMap::new`].
pub struct HasteMapOptions {
    pub config: HasteMapConfig,
    pub files: Vec<PathBuf>,
    pub helpers: Arc<dyn Helpers>,
    pub module_cache: Arc<dyn ModuleCache>,
}

/// Maps declared module and package names to the files that declare them.
///
/// Per-file processing runs concurrently during [`build`](Self::build), but
/// each kind passes through its own single-slot gate before it touches the
/// index, so module bindings and package bindings are each applied one at a
/// time. Subscribers registered with [`subscribe`](Self::subscribe) are told
/// whenever an existing binding moves or disappears.
pub struct HasteMap {
    config: HasteMapConfig,
    files: Arc<[PathBuf]>,
    helpers: Arc<dyn Helpers>,
    module_cache: Arc<dyn ModuleCache>,
    index: RwLock<HasteIndex>,
    gates: ProcessingGates,
    changes: broadcast::Sender<HasteMapChanged>,
    state: AtomicU8,
    progress: BuildProgress,
}

impl HasteMap {
    pub fn new(options: HasteMapOptions) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            config: options.config,
            files: options.files.into(),
            helpers: options.helpers,
            module_cache: options.module_cache,
            index: RwLock::new(HasteIndex::new()),
            gates: ProcessingGates::new(),
            changes,
            state: AtomicU8::new(BuildState::Idle as u8),
            progress: BuildProgress::default(),
        }
    }

    pub fn state(&self) -> BuildState {
        BuildState::load(&self.state)
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HasteMapChanged> {
        self.changes.subscribe()
    }

    /// Rebuilds the index from the file set.
    ///
    /// On failure the index is left empty: a partially built index is never
    /// exposed.
    pub async fn build(&self) -> Result<HasteIndex> {
        BuildState::Building.store(&self.state);
        self.progress.reset_for_build(unix_now_secs());
        self.index.write().clear();
        log::info!("building haste map from {} files", self.files.len());

        let mut pending = Vec::new();
        for path in self.files.iter() {
            let Some(kind) = self.classify(path) else {
                continue;
            };
            self.progress.record_scheduled(kind);
            pending.push(self.process(kind, path, None));
        }

        match try_join_all(pending).await {
            Ok(_) => {
                self.progress.finish(unix_now_secs());
                BuildState::Ready.store(&self.state);
                let snapshot = self.snapshot();
                log::info!(
                    "haste map ready: {} modules, {} packages",
                    snapshot.module_count(),
                    snapshot.package_count()
                );
                Ok(snapshot)
            }
            Err(error) => {
                self.index.write().clear();
                self.progress.finish(unix_now_secs());
                BuildState::Error.store(&self.state);
                log::error!("haste map build failed: {error}");
                Err(error)
            }
        }
    }

    /// Applies a single filesystem change to the index.
    ///
    /// A failure only affects `path`; every other binding keeps its
    /// last-known-good value.
    pub async fn apply_change(&self, change: ChangeType, path: &Path) -> Result<()> {
        if self.state() == BuildState::Building {
            log::warn!(
                "{} change for {} applied while a build is in flight",
                change.as_str(),
                path.display()
            );
        }
        log::debug!("applying {} change for {}", change.as_str(), path.display());

        self.module_cache.invalidate(path);
        let previous = if change.invalidates_existing() {
            self.index.write().remove_path(path)
        } else {
            None
        };

        if change == ChangeType::Delete {
            if previous.is_some() {
                self.notify();
            }
            return Ok(());
        }

        let Some(kind) = self.classify_changed(path) else {
            if previous.is_some() {
                self.notify();
            }
            return Ok(());
        };

        let previous_name = previous.as_ref().map(|removed| removed.name.as_str());
        let result = self.process(kind, path, previous_name).await;
        // The old binding is gone and nothing replaced it.
        if previous.is_some() && !matches!(result, Ok(Some(_))) {
            self.notify();
        }
        result.map(|_| ())
    }

    /// Resolves `name` for `platform`, falling back to `native` (when
    /// preferred) and then to the generic variant.
    pub fn get_module(&self, name: &str, platform: Option<&str>) -> Option<ModuleEntry> {
        self.index
            .read()
            .resolve_module(name, platform, self.config.prefer_native_platform)
            .cloned()
    }

    pub fn get_package(&self, name: &str) -> Option<PackageEntry> {
        self.index.read().package(name).cloned()
    }

    /// The unfiltered file set supplied at construction.
    pub fn get_all_files(&self) -> &[PathBuf] {
        &self.files
    }

    /// A copy of the current index.
    pub fn snapshot(&self) -> HasteIndex {
        self.index.read().clone()
    }

    fn classify(&self, path: &Path) -> Option<DescriptorKind> {
        if self.helpers.is_node_modules_dir(path) {
            return None;
        }
        if is_package_json(path) {
            Some(DescriptorKind::Package)
        } else if self.config.has_extension(&self.helpers.extname(path)) {
            Some(DescriptorKind::Module)
        } else {
            None
        }
    }

    /// Changed files must carry a configured extension, so a `package.json`
    /// change is only picked up when `json` is configured.
    fn classify_changed(&self, path: &Path) -> Option<DescriptorKind> {
        if !self.config.has_extension(&self.helpers.extname(path)) {
            return None;
        }
        self.classify(path)
    }

    /// Resolves the declared name of `path` and binds it, inside the gate for
    /// `kind`. Returns the bound name, or `None` if the file declares none.
    async fn process(
        &self,
        kind: DescriptorKind,
        path: &Path,
        previous: Option<&str>,
    ) -> Result<Option<String>> {
        let _permit = self.gates.acquire(kind).await?;
        let descriptor = match kind {
            DescriptorKind::Module => self.module_cache.get_module(path),
            DescriptorKind::Package => self.module_cache.get_package(path),
        };

        let name = match declared_name(descriptor.as_ref()).await {
            Ok(Some(name)) => name,
            Ok(None) => return Ok(None),
            Err(error) if kind == DescriptorKind::Package && error.is_malformed_package() => {
                log::debug!("skipping malformed package {}: {error}", path.display());
                return Ok(None);
            }
            Err(error) => return Err(error),
        };

        self.index
            .write()
            .bind(kind, &name, descriptor.path(), &self.config.platforms)?;
        self.progress.record_indexed(kind);

        if let Some(previous) = previous.filter(|previous| *previous != name) {
            log::debug!("{} renamed from {previous} to {name}", path.display());
            self.notify();
        }
        Ok(Some(name))
    }

    fn notify(&self) {
        // No subscribers is fine.
        let _ = self.changes.send(HasteMapChanged);
    }
}

async fn declared_name(descriptor: &dyn Descriptor) -> Result<Option<String>> {
    if !descriptor.is_haste()? {
        return Ok(None);
    }
    descriptor.name().await.map(Some)
}

fn is_package_json(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == PACKAGE_JSON)
}
