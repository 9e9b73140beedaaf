//! Filesystem watching with notify.
//!
//! The watcher callback only translates events and sends them through a
//! channel. The consumer applies them to the haste map one at a time, in the
//! order they were reported.

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{HasteError, Result};
use crate::haste::HasteMap;
use crate::types::ChangeType;

/// A single change to feed into [`HasteMap::apply_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub change_type: ChangeType,
    pub path: PathBuf,
}

impl FileChange {
    pub fn new(change_type: ChangeType, path: impl Into<PathBuf>) -> Self {
        Self {
            change_type,
            path: path.into(),
        }
    }
}

/// Outcome of draining a change channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub failed: usize,
}

/// Translates a notify event into file changes.
///
/// Renames become a delete of the old path and a modify of the new one.
/// Anything appearing at a path is reported as a modify so a binding the
/// path already held (an atomic save over an existing file) is cleared
/// before the file is processed again. Events of unknown kind are resolved
/// by checking whether the path exists.
pub fn changes_from_event(event: &Event) -> Vec<FileChange> {
    let all = |change_type: ChangeType| -> Vec<FileChange> {
        event
            .paths
            .iter()
            .map(|path| FileChange::new(change_type, path.clone()))
            .collect()
    };

    match event.kind {
        EventKind::Access(_) => Vec::new(),
        EventKind::Create(_) => all(ChangeType::Modify),
        EventKind::Remove(_) => all(ChangeType::Delete),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => all(ChangeType::Delete),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => all(ChangeType::Modify),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => vec![
            FileChange::new(ChangeType::Delete, event.paths[0].clone()),
            FileChange::new(ChangeType::Modify, event.paths[1].clone()),
        ],
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Any | EventKind::Other => event
            .paths
            .iter()
            .map(|path| {
                let change_type = if path.exists() {
                    ChangeType::Modify
                } else {
                    ChangeType::Delete
                };
                FileChange::new(change_type, path.clone())
            })
            .collect(),
        EventKind::Modify(_) => all(ChangeType::Modify),
    }
}

/// Creates a recursive notify watcher over `roots`.
///
/// Changes are sent through `change_tx`; watcher errors are logged.
pub fn create_change_watcher(
    roots: &[PathBuf],
    change_tx: mpsc::UnboundedSender<FileChange>,
) -> Result<RecommendedWatcher> {
    let mut watcher =
        recommended_watcher(move |event_result: notify::Result<Event>| match event_result {
            Ok(event) => {
                for change in changes_from_event(&event) {
                    let _ = change_tx.send(change);
                }
            }
            Err(error) => {
                log::warn!("filesystem watcher error: {error}");
            }
        })
        .map_err(|error| {
            HasteError::Watcher(format!("failed to create filesystem watcher: {error}"))
        })?;

    for root in roots {
        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|error| {
                HasteError::Watcher(format!("failed to watch {}: {error}", root.display()))
            })?;
    }

    Ok(watcher)
}

/// Applies changes from `change_rx` until the channel closes.
///
/// A failed change is logged and does not stop the loop.
pub async fn apply_changes(
    haste_map: &HasteMap,
    change_rx: &mut mpsc::UnboundedReceiver<FileChange>,
) -> ApplySummary {
    let mut summary = ApplySummary::default();
    while let Some(change) = change_rx.recv().await {
        match haste_map
            .apply_change(change.change_type, &change.path)
            .await
        {
            Ok(()) => summary.applied += 1,
            Err(error) => {
                summary.failed += 1;
                log::warn!(
                    "failed to apply {} change for {}: {error}",
                    change.change_type.as_str(),
                    change.path.display()
                );
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind};
    use tempfile::TempDir;

    use crate::config::HasteMapConfig;
    use crate::haste::HasteMapOptions;
    use crate::helpers::DependencyGraphHelpers;
    use crate::module_cache::FsModuleCache;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |event, path| event.add_path(PathBuf::from(path)))
    }

    #[test]
    fn create_is_modify_and_remove_is_delete() {
        let changes = changes_from_event(&event(
            EventKind::Create(CreateKind::File),
            &["/app/a.js", "/app/b.js"],
        ));
        assert_eq!(
            changes,
            vec![
                FileChange::new(ChangeType::Modify, "/app/a.js"),
                FileChange::new(ChangeType::Modify, "/app/b.js"),
            ]
        );

        let changes = changes_from_event(&event(EventKind::Remove(RemoveKind::File), &["/app/a.js"]));
        assert_eq!(changes, vec![FileChange::new(ChangeType::Delete, "/app/a.js")]);
    }

    #[test]
    fn content_modification_is_modify() {
        let changes = changes_from_event(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/app/a.js"],
        ));
        assert_eq!(changes, vec![FileChange::new(ChangeType::Modify, "/app/a.js")]);
    }

    #[test]
    fn renames_split_into_delete_and_modify() {
        let changes = changes_from_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/app/old.js", "/app/new.js"],
        ));
        assert_eq!(
            changes,
            vec![
                FileChange::new(ChangeType::Delete, "/app/old.js"),
                FileChange::new(ChangeType::Modify, "/app/new.js"),
            ]
        );

        let changes = changes_from_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/app/new.js"],
        ));
        assert_eq!(changes, vec![FileChange::new(ChangeType::Modify, "/app/new.js")]);

        let changes = changes_from_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/app/old.js"],
        ));
        assert_eq!(changes, vec![FileChange::new(ChangeType::Delete, "/app/old.js")]);
    }

    #[test]
    fn access_is_ignored() {
        let changes = changes_from_event(&event(EventKind::Access(AccessKind::Any), &["/app/a.js"]));
        assert!(changes.is_empty());
    }

    #[test]
    fn unknown_kind_checks_existence() {
        let temp = TempDir::new().expect("tempdir");
        let existing = temp.path().join("a.js");
        std::fs::write(&existing, "").expect("write");
        let missing = temp.path().join("b.js");

        let event = Event::new(EventKind::Any)
            .add_path(existing.clone())
            .add_path(missing.clone());
        assert_eq!(
            changes_from_event(&event),
            vec![
                FileChange::new(ChangeType::Modify, existing),
                FileChange::new(ChangeType::Delete, missing),
            ]
        );
    }

    #[tokio::test]
    async fn atomic_save_over_bound_file_rebinds_new_name() {
        let temp = TempDir::new().expect("tempdir");
        let target = temp.path().join("Foo.js");
        let swap = temp.path().join(".Foo.js.swp");
        std::fs::write(&target, "/**\n * @providesModule Foo\n */\n").expect("write");

        let config = HasteMapConfig::default();
        let map = HasteMap::new(HasteMapOptions {
            helpers: Arc::new(DependencyGraphHelpers::new(
                config.provides_module_node_modules.clone(),
            )),
            config,
            files: vec![target.clone()],
            module_cache: Arc::new(FsModuleCache::new()),
        });
        map.build().await.expect("build");
        let mut rx = map.subscribe();

        std::fs::write(&swap, "/**\n * @providesModule Baz\n */\n").expect("write swap");
        std::fs::rename(&swap, &target).expect("rename");

        let (change_tx, mut change_rx) = mpsc::unbounded_channel();
        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(swap)
            .add_path(target.clone());
        for change in changes_from_event(&event) {
            change_tx.send(change).expect("send");
        }
        drop(change_tx);

        let summary = apply_changes(&map, &mut change_rx).await;
        assert_eq!(summary, ApplySummary { applied: 2, failed: 0 });
        assert!(map.get_module("Foo", None).is_none());
        assert_eq!(map.get_module("Baz", None).map(|entry| entry.path), Some(target));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
