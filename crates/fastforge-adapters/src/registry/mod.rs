//! Template registries.

mod builtin;

pub use builtin::{BuiltinRegistry, sqlite_catalog};
