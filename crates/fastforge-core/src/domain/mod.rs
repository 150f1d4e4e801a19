// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for FastForge.
//!
//! This module contains pure generation logic with no I/O. Filesystem
//! access and catalog storage are reached through ports defined in the
//! application layer.
//!
//! ## Pipeline
//!
//! ```text
//! raw name ─► ProjectSpec::derive ─► select_variant ─► TemplateCatalog
//!                                                        │
//!            GenerationPlan::build ◄─ ConsistencyResolver::resolve
//! ```
//!
//! - **No I/O**: every function here is deterministic apart from the plan id
//! - **No tracing**: observability belongs to the application layer
//! - **Immutable values**: a `ProjectSpec` is never mutated after derivation
//!
// Public API - what the world sees
pub mod capabilities;
pub mod entities;
pub mod error;
pub mod resolver;
pub mod scripts;
pub mod settings;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    plan::{GenerationPlan, PlanEntry, PlannedFile},
    project_spec::ProjectSpec,
    template::{
        CatalogId, CatalogMetadata, Placeholder, TemplateCatalog, TemplateCatalogBuilder,
        TemplateFile, scan_placeholders,
    },
};

pub use capabilities::{VARIANT_REGISTRY, VariantDef, select_variant, variant_def};
pub use error::{DomainError, ErrorCategory};
pub use resolver::{ConsistencyResolver, ResolutionContext, ResolvedFile};
pub use scripts::{ScriptSyntax, SetupStep, parse_steps, render_script};
pub use settings::{APP_PACKAGE, GenerationSettings, MIGRATIONS_DIR};
pub use value_objects::{DatabaseVariant, FileRole};

pub use entities::common::{Permissions, RelativePath};
pub use validation::DomainValidator;
