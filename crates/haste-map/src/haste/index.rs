//! Name-to-file bindings for modules and packages.
//!
//! Modules are keyed by name and then by platform; packages only by name.
//! Both use `BTreeMap` so iteration order (and therefore the removal scan)
//! is deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{HasteError, Result};
use crate::platform::parse_platform_file_path;
use crate::types::{DescriptorKind, ModuleEntry, PackageEntry, GENERIC_PLATFORM, NATIVE_PLATFORM};

/// Platform variants of a single module name.
pub type ModuleVariants = BTreeMap<String, ModuleEntry>;

/// The module and package maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HasteIndex {
    modules: BTreeMap<String, ModuleVariants>,
    packages: BTreeMap<String, PackageEntry>,
}

/// A binding dropped by [`HasteIndex::remove_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedBinding {
    pub kind: DescriptorKind,
    pub name: String,
}

impl HasteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.modules.clear();
        self.packages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.packages.is_empty()
    }

    /// Number of bound (name, platform) module slots.
    pub fn module_count(&self) -> usize {
        self.modules.values().map(BTreeMap::len).sum()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn module_variants(&self, name: &str) -> Option<&ModuleVariants> {
        self.modules.get(name)
    }

    /// Resolves `name` for `platform`: the exact platform first, then
    /// `native` when `prefer_native` is set, then the generic variant.
    pub fn resolve_module(
        &self,
        name: &str,
        platform: Option<&str>,
        prefer_native: bool,
    ) -> Option<&ModuleEntry> {
        let variants = self.modules.get(name)?;
        platform
            .and_then(|platform| variants.get(platform))
            .or_else(|| {
                prefer_native
                    .then(|| variants.get(NATIVE_PLATFORM))
                    .flatten()
            })
            .or_else(|| variants.get(GENERIC_PLATFORM))
    }

    pub fn package(&self, name: &str) -> Option<&PackageEntry> {
        self.packages.get(name)
    }

    /// Binds `name` to `path` for the given kind.
    ///
    /// Modules take their platform from the file name. Binding a slot that
    /// already holds a different path is a collision and leaves the existing
    /// binding untouched; the same path overwrites in place.
    pub fn bind(
        &mut self,
        kind: DescriptorKind,
        name: &str,
        path: &Path,
        platforms: &BTreeSet<String>,
    ) -> Result<()> {
        match kind {
            DescriptorKind::Package => {
                check_collision(kind, name, path, self.packages.get(name).map(|e| &e.path))?;
                self.packages.insert(
                    name.to_string(),
                    PackageEntry {
                        path: path.to_path_buf(),
                    },
                );
            }
            DescriptorKind::Module => {
                let platform = parse_platform_file_path(path, platforms)
                    .platform
                    .unwrap_or_else(|| GENERIC_PLATFORM.to_string());
                let variants = self.modules.entry(name.to_string()).or_default();
                let existing = variants.get(&platform).map(|e| &e.path);
                if let Err(error) = check_collision(kind, name, path, existing) {
                    if variants.is_empty() {
                        self.modules.remove(name);
                    }
                    return Err(error);
                }
                variants.insert(
                    platform.clone(),
                    ModuleEntry {
                        path: path.to_path_buf(),
                        platform,
                    },
                );
            }
        }
        Ok(())
    }

    /// Removes the first binding whose path equals `path`.
    ///
    /// Only that slot is cleared; a module name keeps its other platform
    /// variants and disappears once none are left.
    pub fn remove_path(&mut self, path: &Path) -> Option<RemovedBinding> {
        let found = self.modules.iter().find_map(|(name, variants)| {
            variants
                .iter()
                .find(|(_, entry)| entry.path == path)
                .map(|(platform, _)| (name.clone(), platform.clone()))
        });
        if let Some((name, platform)) = found {
            if let Some(variants) = self.modules.get_mut(&name) {
                variants.remove(&platform);
                if variants.is_empty() {
                    self.modules.remove(&name);
                }
            }
            return Some(RemovedBinding {
                kind: DescriptorKind::Module,
                name,
            });
        }

        let name = self
            .packages
            .iter()
            .find(|(_, entry)| entry.path == path)
            .map(|(name, _)| name.clone())?;
        self.packages.remove(&name);
        Some(RemovedBinding {
            kind: DescriptorKind::Package,
            name,
        })
    }
}

fn check_collision(
    kind: DescriptorKind,
    name: &str,
    path: &Path,
    existing: Option<&PathBuf>,
) -> Result<()> {
    match existing {
        Some(existing) if existing != path => Err(HasteError::NamingCollision {
            kind,
            name: name.to_string(),
            path: path.to_path_buf(),
            existing: existing.clone(),
        }),
        _ => Ok(()),
    }
}
