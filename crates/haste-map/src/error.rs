use std::path::PathBuf;

use crate::types::DescriptorKind;

#[derive(Debug, thiserror::Error)]
pub enum HasteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "naming collision: duplicate {kind} name `{name}`\n  Paths: {} collides with {}",
        path.display(),
        existing.display()
    )]
    NamingCollision {
        kind: DescriptorKind,
        name: String,
        path: PathBuf,
        existing: PathBuf,
    },

    #[error("Malformed package descriptor {}: {message}", path.display())]
    MalformedPackage { path: PathBuf, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Watcher error: {0}")]
    Watcher(String),

    #[error("Processing gate closed")]
    GateClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HasteError {
    /// Returns true for the one error class a build tolerates: a package
    /// descriptor whose contents cannot be parsed.
    pub fn is_malformed_package(&self) -> bool {
        matches!(self, Self::MalformedPackage { .. })
    }
}

pub type Result<T> = std::result::Result<T, HasteError>;
