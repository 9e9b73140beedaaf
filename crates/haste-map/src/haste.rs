//! Haste name index.
//!
//! ## Module Structure
//!
//! - `build` - Build state and progress tracking
//! - `gates` - Per-kind single-slot processing gates
//! - `index` - Module and package bindings, collision detection
//! - `map` - Main API (HasteMap)

mod build;
mod gates;
mod index;
mod map;


pub use build::{unix_now_secs, BuildState, ProgressSnapshot};
pub use gates::ProcessingGates;
pub use index::{HasteIndex, ModuleVariants, RemovedBinding};
pub use map::{HasteMap, HasteMapOptions};
