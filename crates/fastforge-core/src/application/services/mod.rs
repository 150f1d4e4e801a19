//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "list variants".

pub mod catalog_service;
pub mod emitter;
pub mod generate_service;

pub use catalog_service::{CatalogService, VariantInfo};
pub use emitter::{EmissionReport, TreeEmitter};
pub use generate_service::{GenerateService, GenerationReport, PreparedProject};
