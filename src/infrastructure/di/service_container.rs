//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::HierarchyService;
use crate::config::Settings;
use crate::infrastructure::records::RecordReader;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Employee list decoding
    pub records: RecordReader,

    /// Validation, building and rendering
    pub hierarchy: HierarchyService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let hierarchy = HierarchyService::new(settings.hierarchy_options());
        let records = RecordReader::new(Arc::clone(&fs));
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            records,
            hierarchy,
        }
    }
}
