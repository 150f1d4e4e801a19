//! Application layer for FastForge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerateService, CatalogService, TreeEmitter)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CatalogService, EmissionReport, GenerateService, GenerationReport, PreparedProject,
    TreeEmitter,
    VariantInfo, // DTO for variant/catalog listing
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateRegistry};

pub use error::ApplicationError;
