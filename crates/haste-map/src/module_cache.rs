//! Descriptors for haste-eligible files and the cache that produces them.
//!
//! - `Descriptor` / `ModuleCache` - collaborator traits consumed by the index
//! - `FsModuleCache` - default implementation reading files from disk
//! - `docblock` - `@providesModule` extraction

pub mod docblock;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{HasteError, Result};
use crate::types::DescriptorKind;

/// A file's haste eligibility and declared name.
#[async_trait]
pub trait Descriptor: Send + Sync {
    fn kind(&self) -> DescriptorKind;

    fn path(&self) -> &Path;

    /// Whether the file declares a name at all.
    fn is_haste(&self) -> Result<bool>;

    /// The declared name. Only meaningful when `is_haste` returned true.
    async fn name(&self) -> Result<String>;
}

/// Turns paths into descriptors.
pub trait ModuleCache: Send + Sync {
    fn get_module(&self, path: &Path) -> Arc<dyn Descriptor>;

    fn get_package(&self, path: &Path) -> Arc<dyn Descriptor>;

    /// Drops anything cached for `path`. Called before a change is applied.
    fn invalidate(&self, _path: &Path) {}
}

/// Reads `@providesModule` docblocks and `package.json` names from disk.
#[derive(Debug, Default)]
pub struct FsModuleCache {
    modules: Mutex<HashMap<PathBuf, Arc<FileDescriptor>>>,
    packages: Mutex<HashMap<PathBuf, Arc<FileDescriptor>>>,
}

impl FsModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached descriptors across both kinds.
    pub fn len(&self) -> usize {
        self.modules.lock().len() + self.packages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn descriptor(
        cache: &Mutex<HashMap<PathBuf, Arc<FileDescriptor>>>,
        kind: DescriptorKind,
        path: &Path,
    ) -> Arc<dyn Descriptor> {
        let descriptor = cache
            .lock()
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(FileDescriptor::new(kind, path.to_path_buf())))
            .clone();
        descriptor
    }
}

impl ModuleCache for FsModuleCache {
    fn get_module(&self, path: &Path) -> Arc<dyn Descriptor> {
        Self::descriptor(&self.modules, DescriptorKind::Module, path)
    }

    fn get_package(&self, path: &Path) -> Arc<dyn Descriptor> {
        Self::descriptor(&self.packages, DescriptorKind::Package, path)
    }

    fn invalidate(&self, path: &Path) {
        self.modules.lock().remove(path);
        self.packages.lock().remove(path);
    }
}

/// A module or package file whose declared name is read lazily and memoized.
#[derive(Debug)]
pub struct FileDescriptor {
    kind: DescriptorKind,
    path: PathBuf,
    declared: Mutex<Option<Option<String>>>,
}

impl FileDescriptor {
    pub fn new(kind: DescriptorKind, path: PathBuf) -> Self {
        Self {
            kind,
            path,
            declared: Mutex::new(None),
        }
    }

    fn declared_name(&self, contents: &str) -> Result<Option<String>> {
        match self.kind {
            DescriptorKind::Module => Ok(docblock::provides_module(contents)),
            DescriptorKind::Package => package_name(&self.path, contents),
        }
    }

    fn memoize(&self, declared: Option<String>) -> Option<String> {
        *self.declared.lock() = Some(declared.clone());
        declared
    }

    fn cached(&self) -> Option<Option<String>> {
        self.declared.lock().clone()
    }

    /// Reads and parses the file once; later calls hit the memo.
    ///
    /// Blocking read: `is_haste` is synchronous and `name` reuses its result.
    fn load(&self) -> Result<Option<String>> {
        if let Some(declared) = self.cached() {
            return Ok(declared);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let declared = self.declared_name(&contents)?;
        Ok(self.memoize(declared))
    }
}

#[async_trait]
impl Descriptor for FileDescriptor {
    fn kind(&self) -> DescriptorKind {
        self.kind
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn is_haste(&self) -> Result<bool> {
        Ok(self.load()?.is_some())
    }

    async fn name(&self) -> Result<String> {
        let declared = self.load()?;
        declared.ok_or_else(|| {
            HasteError::Internal(format!(
                "{} does not declare a {} name",
                self.path.display(),
                self.kind
            ))
        })
    }
}

/// Reads the `name` field of a `package.json` body.
fn package_name(path: &Path, contents: &str) -> Result<Option<String>> {
    let json: serde_json::Value =
        serde_json::from_str(contents).map_err(|error| HasteError::MalformedPackage {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
    Ok(json
        .get("name")
        .and_then(serde_json::Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string))
}
