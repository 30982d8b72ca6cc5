//! Employee hierarchy service
//!
//! The single entry point of the core: validate a flat employee list, build
//! the hierarchy and optionally render it.

use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    self, DisplayMode, DomainError, EmployeeRecord, Hierarchy, HierarchyBuilder, RenderOptions,
    ValidationError,
};

/// Options controlling the service's rendering and echo behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyOptions {
    /// Markup rendering options
    pub render: RenderOptions,
    /// Log the text rendering of every hierarchy that is built
    pub echo_text: bool,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            echo_text: true,
        }
    }
}

/// Service turning flat employee lists into hierarchies.
///
/// Holds no per-call state; each call gets its own builder.
#[derive(Debug, Clone, Default)]
pub struct HierarchyService {
    options: HierarchyOptions,
}

impl HierarchyService {
    pub fn new(options: HierarchyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HierarchyOptions {
        &self.options
    }

    /// Validate the list and build its hierarchy.
    ///
    /// Fails with `InvalidInput` when any structural check fails; builder
    /// errors are propagated unchanged.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn get_hierarchy(&self, records: &[EmployeeRecord]) -> ApplicationResult<Hierarchy> {
        if let Err(e) = domain::validate(records) {
            debug!("get_hierarchy: rejected: {}", e);
            return Err(DomainError::InvalidInput(e).into());
        }

        let hierarchy = HierarchyBuilder::new().build(records)?;
        debug!(
            "get_hierarchy: {} employees, depth {}",
            hierarchy.len(),
            hierarchy.depth()
        );

        if self.options.echo_text {
            debug!("\nEmployeeHierarchy:\n{}", domain::render_text(&hierarchy));
        }
        Ok(hierarchy)
    }

    /// Build the hierarchy and render it in the given mode.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn get_rendered(
        &self,
        records: &[EmployeeRecord],
        mode: DisplayMode,
    ) -> ApplicationResult<String> {
        let hierarchy = self.get_hierarchy(records)?;
        Ok(domain::render(&hierarchy, mode, &self.options.render))
    }

    /// Every structural problem of the list, empty when valid.
    pub fn check(&self, records: &[EmployeeRecord]) -> Vec<ValidationError> {
        domain::violations(records)
    }
}
