//! Haste module-name resolution index.
//!
//! This crate maps names declared inside files (`@providesModule` docblocks
//! and `package.json` names) to the files that declare them:
//! - Platform-specific variants (`Foo.ios.js`, `Foo.native.js`)
//! - Collision detection between files claiming the same name
//! - Incremental updates from filesystem changes with change notifications
//! - Default crawler, watcher and filesystem-backed module cache

pub mod config;
pub mod error;
pub mod haste;
pub mod helpers;
pub mod module_cache;
pub mod platform;
pub mod types;
pub mod watcher;

// Re-export main types
pub use config::{HasteMapConfig, CONFIG_FILENAME};
pub use error::{HasteError, Result};
pub use haste::{BuildState, HasteIndex, HasteMap, HasteMapOptions, ProgressSnapshot};
pub use helpers::{DependencyGraphHelpers, Helpers};
pub use module_cache::{Descriptor, FsModuleCache, ModuleCache};
pub use platform::{parse_platform_file_path, PlatformFilePath};
pub use types::{
    ChangeType, DescriptorKind, HasteMapChanged, ModuleEntry, PackageEntry, GENERIC_PLATFORM,
    NATIVE_PLATFORM,
};
pub use watcher::{crawl, CrawlData, FileChange};
