pub mod common;
pub mod plan;
pub mod project_spec;
pub mod template;

pub use crate::domain::DomainError;
pub use plan::GenerationPlan;
pub use project_spec::ProjectSpec;
pub use template::{TemplateCatalog, TemplateFile};
