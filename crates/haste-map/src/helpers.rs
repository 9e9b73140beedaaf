//! Filesystem predicates used while classifying paths.

use std::path::{Component, Path};

const NODE_MODULES: &str = "node_modules";

/// Path predicates consulted by the index.
pub trait Helpers: Send + Sync {
    /// Returns true if `path` lives beneath a dependency-manager directory
    /// and must not take part in the index.
    fn is_node_modules_dir(&self, path: &Path) -> bool;

    /// Extension of `path` without the leading dot, or an empty string.
    fn extname(&self, path: &Path) -> String {
        path.extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Default helpers: everything under `node_modules` is excluded except
/// packages listed in `provides_module_node_modules`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraphHelpers {
    provides_module_node_modules: Vec<String>,
}

impl DependencyGraphHelpers {
    pub fn new(provides_module_node_modules: Vec<String>) -> Self {
        Self {
            provides_module_node_modules,
        }
    }
}

impl Helpers for DependencyGraphHelpers {
    fn is_node_modules_dir(&self, path: &Path) -> bool {
        let components: Vec<&str> = path
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();

        // Only the segments after the innermost node_modules matter.
        let Some(index) = components.iter().rposition(|part| *part == NODE_MODULES) else {
            return false;
        };
        let rest = &components[index + 1..];
        if rest.is_empty() {
            return false;
        }

        !rest.iter().any(|part| {
            self.provides_module_node_modules
                .iter()
                .any(|allowed| allowed == part)
        })
    }
}
