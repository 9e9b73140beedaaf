//! Initial file-set crawl.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

/// Counters and ignore list shared by the parallel crawl.
#[derive(Debug)]
pub struct CrawlData<'a> {
    /// Number of files found (atomic counter).
    pub num_files: AtomicUsize,
    /// Number of directories visited (atomic counter).
    pub num_dirs: AtomicUsize,
    /// Paths to skip entirely.
    pub ignore_directories: &'a [PathBuf],
}

impl<'a> CrawlData<'a> {
    pub fn new(ignore_directories: &'a [PathBuf]) -> Self {
        Self {
            num_files: AtomicUsize::new(0),
            num_dirs: AtomicUsize::new(0),
            ignore_directories,
        }
    }

    pub fn files(&self) -> usize {
        self.num_files.load(Ordering::Relaxed)
    }

    pub fn dirs(&self) -> usize {
        self.num_dirs.load(Ordering::Relaxed)
    }
}

/// Checks if a path should be ignored.
pub fn path_is_ignored(ignored_roots: &[PathBuf], candidate: &Path) -> bool {
    ignored_roots
        .iter()
        .any(|ignored| candidate == ignored || candidate.starts_with(ignored))
}

/// Lists every file beneath `roots`, sorted and deduplicated.
///
/// Unreadable entries are skipped. A root that is itself a file is listed
/// as-is.
pub fn crawl(roots: &[PathBuf], crawl_data: &CrawlData) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = roots
        .par_iter()
        .flat_map_iter(|root| walk(root, crawl_data))
        .collect();
    files.sort_unstable();
    files.dedup();
    log::debug!(
        "crawled {} files in {} directories",
        crawl_data.files(),
        crawl_data.dirs()
    );
    files
}

fn walk(path: &Path, crawl_data: &CrawlData) -> Vec<PathBuf> {
    if path_is_ignored(crawl_data.ignore_directories, path) {
        return Vec::new();
    }

    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Vec::new();
    };

    if !metadata.is_dir() {
        crawl_data.num_files.fetch_add(1, Ordering::Relaxed);
        return vec![path.to_path_buf()];
    }

    crawl_data.num_dirs.fetch_add(1, Ordering::Relaxed);
    let Ok(read_dir) = fs::read_dir(path) else {
        return Vec::new();
    };
    let entries: Vec<_> = read_dir.filter_map(Result::ok).collect();

    entries
        .into_par_iter()
        .flat_map_iter(|entry| {
            let child_path = entry.path();
            if path_is_ignored(crawl_data.ignore_directories, &child_path) {
                return Vec::new();
            }
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => walk(&child_path, crawl_data),
                Ok(_) => {
                    crawl_data.num_files.fetch_add(1, Ordering::Relaxed);
                    vec![child_path]
                }
                Err(_) => Vec::new(),
            }
        })
        .collect()
}
