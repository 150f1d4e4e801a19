//! Generate Service - main application orchestrator.
//!
//! This service coordinates the whole generation workflow:
//! 1. Derive the `ProjectSpec` from the raw name
//! 2. Select the variant and look up its catalog
//! 3. Resolve placeholders with the cross-file consistency check
//! 4. Build the generation plan
//! 5. Emit the plan with rollback on failure
//!
//! Steps 1-4 are pure and run to completion before anything touches the
//! filesystem, so a naming or template error never leaves a partial tree.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ports::{Filesystem, TemplateRegistry},
        services::emitter::{EmissionReport, TreeEmitter},
    },
    domain::{
        CatalogId, ConsistencyResolver, DatabaseVariant, DomainValidator as validator,
        GenerationPlan, GenerationSettings, ProjectSpec, ResolutionContext, select_variant,
    },
    error::ForgeResult,
};

/// A fully resolved project that has not been written yet.
#[derive(Debug, Clone)]
pub struct PreparedProject {
    pub spec: ProjectSpec,
    pub catalog_id: CatalogId,
    pub plan: GenerationPlan,
}

impl PreparedProject {
    /// Where the project root lands beneath `output_dir`.
    pub fn root_in(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.spec.sanitized_name())
    }
}

/// Outcome of a successful generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub spec: ProjectSpec,
    pub catalog_id: CatalogId,
    pub plan_id: Uuid,
    pub emission: EmissionReport,
    /// Relative paths of every written file, in plan order.
    pub files: Vec<String>,
}

pub struct GenerateService {
    registry: Box<dyn TemplateRegistry>,
    filesystem: Box<dyn Filesystem>,
    settings: GenerationSettings,
}

impl GenerateService {
    /// Create a service with default generation settings.
    pub fn new(registry: Box<dyn TemplateRegistry>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            registry,
            filesystem,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Run every pure stage and return the plan. Touches no filesystem.
    #[instrument(skip_all, fields(name = %raw_name, variant = %variant))]
    pub fn prepare(&self, raw_name: &str, variant: DatabaseVariant) -> ForgeResult<PreparedProject> {
        validator::validate_settings(&self.settings)?;

        let spec = ProjectSpec::derive(raw_name, variant)?;
        debug!(
            sanitized = spec.sanitized_name(),
            package = spec.package_name(),
            "Identifiers derived"
        );

        let variant = select_variant(spec.database_variant())?;
        let catalog = self.registry.lookup(variant)?;
        validator::validate_catalog(&catalog)?;
        info!(catalog = %catalog.id, files = catalog.len(), "Catalog selected");

        let context = ResolutionContext::new(&spec, &self.settings)?;
        let resolved = ConsistencyResolver::resolve(&catalog, &context)?;
        debug!(files = resolved.len(), "Placeholders resolved consistently");

        let plan = GenerationPlan::build(resolved)?;
        validator::validate_plan(&plan)?;
        info!(
            plan_id = %plan.plan_id(),
            directories = plan.directory_count(),
            files = plan.file_count(),
            "Generation plan built"
        );

        Ok(PreparedProject {
            spec,
            catalog_id: catalog.id,
            plan,
        })
    }

    /// Write a prepared project beneath `output_dir`.
    #[instrument(skip_all, fields(project = %prepared.spec.sanitized_name()))]
    pub fn emit(
        &self,
        prepared: PreparedProject,
        output_dir: &Path,
    ) -> ForgeResult<GenerationReport> {
        let root = prepared.root_in(output_dir);
        let emission = TreeEmitter::new(self.filesystem.as_ref()).emit(&prepared.plan, &root)?;

        let files = prepared
            .plan
            .files()
            .map(|f| f.path.to_string())
            .collect();

        info!(root = %root.display(), "Generation completed successfully");
        Ok(GenerationReport {
            plan_id: prepared.plan.plan_id(),
            spec: prepared.spec,
            catalog_id: prepared.catalog_id,
            emission,
            files,
        })
    }

    /// Prepare and emit in one call.
    pub fn generate(
        &self,
        raw_name: &str,
        variant: DatabaseVariant,
        output_dir: &Path,
    ) -> ForgeResult<GenerationReport> {
        let prepared = self.prepare(raw_name, variant)?;
        self.emit(prepared, output_dir)
    }
}
