//! Dual-mode virtual file registry for packbin.
//!
//! At build time the registry lazily captures file bytes from the real
//! filesystem; inside a packaged executable it is populated exactly once from
//! an embedded snapshot. Either way, all reads go through the same path
//! resolution and fallback rules, so calling code never needs to know which
//! side of the build/run boundary it is on.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod mode;
pub mod registry;
pub mod resolver;
pub mod snapshot;
pub mod types;

pub use mode::RunMode;
pub use registry::FileRegistry;
pub use snapshot::Snapshot;
pub use types::{FileEntry, Result, VfsError};
