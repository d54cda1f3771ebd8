//! Catalog registry with an explicit initialize/refresh lifecycle.
//!
//! The registry is an owned context object handed to whoever needs the target
//! catalog; there is no global instance.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::TargetCatalog;
use crate::error::Result;

/// Where a target catalog comes from.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<TargetCatalog>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// A catalog held in memory.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    catalog: TargetCatalog,
}

impl StaticCatalog {
    pub fn new(catalog: TargetCatalog) -> Self {
        Self { catalog }
    }

    pub fn products() -> Self {
        Self::new(TargetCatalog::products())
    }
}

impl CatalogSource for StaticCatalog {
    fn load(&self) -> Result<TargetCatalog> {
        Ok(self.catalog.clone())
    }

    fn describe(&self) -> String {
        format!("built-in catalog '{}'", self.catalog.name())
    }
}

/// A catalog read from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load(&self) -> Result<TargetCatalog> {
        TargetCatalog::from_json_file(&self.path)
    }

    fn describe(&self) -> String {
        format!("catalog file {}", self.path.display())
    }
}

/// Holds the current catalog loaded from a [`CatalogSource`].
pub struct CatalogRegistry {
    source: Box<dyn CatalogSource>,
    current: Option<Arc<TargetCatalog>>,
}

impl fmt::Debug for CatalogRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogRegistry")
            .field("source", &self.source.describe())
            .field("loaded", &self.current.is_some())
            .finish()
    }
}

impl CatalogRegistry {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            current: None,
        }
    }

    /// Loads the catalog on first use; later calls return the loaded one.
    pub fn initialize(&mut self) -> Result<Arc<TargetCatalog>> {
        if let Some(current) = &self.current {
            return Ok(Arc::clone(current));
        }
        self.refresh()
    }

    /// Reloads from the source. On failure the previous catalog is kept.
    pub fn refresh(&mut self) -> Result<Arc<TargetCatalog>> {
        let catalog = Arc::new(self.source.load()?);
        self.current = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    pub fn current(&self) -> Option<Arc<TargetCatalog>> {
        self.current.clone()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}
