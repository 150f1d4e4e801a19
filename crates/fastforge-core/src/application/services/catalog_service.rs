//! Catalog Service - variant and catalog discovery for `fastforge list`.

use serde::Serialize;
use tracing::instrument;

use crate::{
    application::ports::TemplateRegistry,
    domain::{DatabaseVariant, TemplateCatalog, VARIANT_REGISTRY},
    error::ForgeResult,
};

/// Display information for one database variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantInfo {
    pub variant: String,
    pub label: String,
    pub generator_supported: bool,
    pub catalog_id: Option<String>,
    pub catalog_name: Option<String>,
    pub description: Option<String>,
    pub file_count: Option<usize>,
    pub tags: Vec<String>,
    /// Follow-on steps for variants the generator does not emit.
    pub manual_steps: Vec<String>,
}

pub struct CatalogService {
    registry: Box<dyn TemplateRegistry>,
}

impl CatalogService {
    pub fn new(registry: Box<dyn TemplateRegistry>) -> Self {
        Self { registry }
    }

    /// Every known variant, in capability-table order, joined with its
    /// registered catalog when there is one.
    #[instrument(skip_all)]
    pub fn list_variants(&self) -> ForgeResult<Vec<VariantInfo>> {
        let catalogs = self.registry.list()?;

        Ok(VARIANT_REGISTRY
            .iter()
            .map(|def| {
                let catalog = catalogs.iter().find(|c| c.variant == def.variant);
                VariantInfo {
                    variant: def.variant.to_string(),
                    label: def.label.to_string(),
                    generator_supported: def.generator_supported,
                    catalog_id: catalog.map(|c| c.id.to_string()),
                    catalog_name: catalog.map(|c| c.metadata.name.clone()),
                    description: catalog.map(|c| c.metadata.description.clone()),
                    file_count: catalog.map(TemplateCatalog::len),
                    tags: catalog.map(|c| c.metadata.tags.clone()).unwrap_or_default(),
                    manual_steps: def.manual_steps.iter().map(|s| s.to_string()).collect(),
                }
            })
            .collect())
    }

    /// The catalog for one variant.
    pub fn catalog(&self, variant: DatabaseVariant) -> ForgeResult<TemplateCatalog> {
        self.registry.lookup(variant)
    }
}
