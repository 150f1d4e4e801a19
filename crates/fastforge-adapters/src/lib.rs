//! Infrastructure adapters for FastForge.
//!
//! This crate implements the ports defined in `fastforge-core::application::ports`:
//! the local and in-memory filesystems, and the registry of built-in
//! template catalogs.

pub mod filesystem;
pub mod registry;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use registry::BuiltinRegistry;
