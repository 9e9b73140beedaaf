//! Core value types shared by the index, its collaborators and the watcher.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Platform key for files without a platform suffix.
pub const GENERIC_PLATFORM: &str = "generic";

/// Platform consulted when `prefer_native_platform` is set.
pub const NATIVE_PLATFORM: &str = "native";

/// File name of a package descriptor.
pub const PACKAGE_JSON: &str = "package.json";

/// Whether a descriptor declares a module or a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    Module,
    Package,
}

impl DescriptorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Package => "package",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete file backing a module name on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub path: PathBuf,
    pub platform: String,
}

impl ModuleEntry {
    pub fn is_generic(&self) -> bool {
        self.platform == GENERIC_PLATFORM
    }
}

/// The package descriptor file backing a package name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub path: PathBuf,
}

/// Kind of filesystem change reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Create,
    Modify,
    Delete,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Delete => "delete",
        }
    }

    /// Returns true if an existing binding for the path must be dropped first.
    pub fn invalidates_existing(self) -> bool {
        matches!(self, Self::Modify | Self::Delete)
    }
}

/// Payload-free notification: cached name resolutions are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HasteMapChanged;
