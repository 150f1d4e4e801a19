//! FastForge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the FastForge
//! project generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          fastforge-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerateService, CatalogService,       │
//! │  TreeEmitter)                           │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: TemplateRegistry, Filesystem)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   fastforge-adapters (Infrastructure)   │
//! │ (BuiltinRegistry, LocalFilesystem, ...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProjectSpec, TemplateCatalog,          │
//! │  ConsistencyResolver, GenerationPlan)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fastforge_core::prelude::*;
//!
//! let service = GenerateService::new(registry, filesystem);
//! let report = service.generate("blog_api", DatabaseVariant::Sqlite, Path::new("."))?;
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, CatalogService, EmissionReport, GenerateService, GenerationReport,
        PreparedProject, TreeEmitter, VariantInfo,
        ports::{Filesystem, TemplateRegistry},
    };
    pub use crate::domain::{
        CatalogId, CatalogMetadata, DatabaseVariant, DomainError, FileRole, GenerationPlan,
        GenerationSettings, Placeholder, ProjectSpec, ScriptSyntax, SetupStep, TemplateCatalog,
        TemplateFile,
    };
    pub use crate::error::{ErrorCategory, ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
