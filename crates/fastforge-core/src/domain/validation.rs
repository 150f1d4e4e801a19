use crate::domain::{
    entities::{GenerationPlan, TemplateCatalog},
    error::DomainError,
    settings::GenerationSettings,
};

/// Centralized domain validation.
///
/// Services call these before anything touches the filesystem.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_settings(settings: &GenerationSettings) -> Result<(), DomainError> {
        settings.validate()
    }

    pub fn validate_catalog(catalog: &TemplateCatalog) -> Result<(), DomainError> {
        catalog.validate()
    }

    pub fn validate_plan(plan: &GenerationPlan) -> Result<(), DomainError> {
        plan.validate()
    }
}
