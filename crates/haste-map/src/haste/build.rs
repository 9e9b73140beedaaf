//! Build state and progress tracking.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::DescriptorKind;

/// Lifecycle of the index.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum BuildState {
    Idle = 0,
    Building = 1,
    Ready = 2,
    Error = 3,
}

impl BuildState {
    /// Loads the state from an atomic.
    pub fn load(atomic: &AtomicU8) -> Self {
        match atomic.load(Ordering::Relaxed) {
            1 => Self::Building,
            2 => Self::Ready,
            3 => Self::Error,
            _ => Self::Idle,
        }
    }

    pub fn store(self, atomic: &AtomicU8) {
        atomic.store(self as u8, Ordering::Relaxed);
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Building => "building",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

/// Counters for the most recent build.
#[derive(Debug, Default)]
pub struct BuildProgress {
    pub scheduled_modules: AtomicUsize,
    pub scheduled_packages: AtomicUsize,
    pub indexed_modules: AtomicUsize,
    pub indexed_packages: AtomicUsize,
    pub started_at: AtomicU64,
    pub finished_at: AtomicU64,
}

impl BuildProgress {
    /// Resets progress for a new build.
    pub fn reset_for_build(&self, started_at: u64) {
        self.scheduled_modules.store(0, Ordering::Relaxed);
        self.scheduled_packages.store(0, Ordering::Relaxed);
        self.indexed_modules.store(0, Ordering::Relaxed);
        self.indexed_packages.store(0, Ordering::Relaxed);
        self.started_at.store(started_at, Ordering::Relaxed);
        self.finished_at.store(0, Ordering::Relaxed);
    }

    pub fn record_scheduled(&self, kind: DescriptorKind) {
        match kind {
            DescriptorKind::Module => self.scheduled_modules.fetch_add(1, Ordering::Relaxed),
            DescriptorKind::Package => self.scheduled_packages.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_indexed(&self, kind: DescriptorKind) {
        match kind {
            DescriptorKind::Module => self.indexed_modules.fetch_add(1, Ordering::Relaxed),
            DescriptorKind::Package => self.indexed_packages.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn finish(&self, finished_at: u64) {
        self.finished_at.store(finished_at, Ordering::Relaxed);
    }

    /// Takes a snapshot of the progress values.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            scheduled_modules: self.scheduled_modules.load(Ordering::Relaxed),
            scheduled_packages: self.scheduled_packages.load(Ordering::Relaxed),
            indexed_modules: self.indexed_modules.load(Ordering::Relaxed),
            indexed_packages: self.indexed_packages.load(Ordering::Relaxed),
            started_at: zero_to_none(self.started_at.load(Ordering::Relaxed)),
            finished_at: zero_to_none(self.finished_at.load(Ordering::Relaxed)),
        }
    }
}

/// A snapshot of build progress values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub scheduled_modules: usize,
    pub scheduled_packages: usize,
    pub indexed_modules: usize,
    pub indexed_packages: usize,
    pub started_at: Option<u64>,
    pub finished_at: Option<u64>,
}

/// Returns the current Unix timestamp in seconds.
pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

fn zero_to_none(value: u64) -> Option<u64> {
    if value == 0 {
        None
    } else {
        Some(value)
    }
}
