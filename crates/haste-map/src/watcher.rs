//! Filesystem crawling and watching.
//!
//! This module feeds the haste map:
//! - Initial crawl of the project roots
//! - notify events translated into create/modify/delete changes

mod events;
mod walker;

pub use events::{
    apply_changes, changes_from_event, create_change_watcher, ApplySummary, FileChange,
};
pub use walker::{crawl, path_is_ignored, CrawlData};
