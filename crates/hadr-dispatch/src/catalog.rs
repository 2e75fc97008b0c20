use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use hadr_core::errors::{ErrorInfo, HadrError};
use hadr_core::ParticleId;

use crate::model::{AbsorptionModel, FinalStateGenerator};
use crate::provider::CrossSectionProvider;

/// Builds a fresh generator for `(instance name, particle)`.
pub type GeneratorFactory =
    Arc<dyn Fn(&str, ParticleId) -> Box<dyn FinalStateGenerator> + Send + Sync>;

/// Named generator kinds and cross-section providers available to physics lists.
///
/// Every call to [`ModelCatalog::instantiate`] yields a new generator, so each
/// binding owns its generator exclusively. Cross-section providers are shared.
#[derive(Clone, Default)]
pub struct ModelCatalog {
    kinds: BTreeMap<String, GeneratorFactory>,
    cross_sections: BTreeMap<String, Arc<dyn CrossSectionProvider>>,
}

impl ModelCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the `absorption` kind.
    pub fn with_builtin_kinds() -> Self {
        let mut catalog = Self::new();
        catalog.register_kind("absorption", |name, _particle| {
            Box::new(AbsorptionModel::new(name))
        });
        catalog
    }

    /// Registers a generator kind, replacing any previous one with that name.
    pub fn register_kind<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&str, ParticleId) -> Box<dyn FinalStateGenerator> + Send + Sync + 'static,
    {
        self.kinds.insert(kind.into(), Arc::new(factory));
        self
    }

    /// Registers a named cross-section provider.
    pub fn register_cross_section(&mut self, provider: Arc<dyn CrossSectionProvider>) -> &mut Self {
        self.cross_sections.insert(provider.name().to_string(), provider);
        self
    }

    /// Creates generator `name` of `kind` for `particle`.
    pub fn instantiate(
        &self,
        kind: &str,
        name: &str,
        particle: ParticleId,
    ) -> Result<Box<dyn FinalStateGenerator>, HadrError> {
        let factory = self.kinds.get(kind).ok_or_else(|| {
            HadrError::Config(
                ErrorInfo::new("catalog_unknown_kind", "no generator factory registered for kind")
                    .with_context("kind", kind)
                    .with_context("model", name)
                    .with_hint(format!("known kinds: {}", self.kind_names().join(", "))),
            )
        })?;
        Ok(factory(name, particle))
    }

    /// Looks up a cross-section provider by name.
    pub fn cross_section(&self, name: &str) -> Result<Arc<dyn CrossSectionProvider>, HadrError> {
        self.cross_sections.get(name).cloned().ok_or_else(|| {
            HadrError::Config(
                ErrorInfo::new(
                    "catalog_unknown_cross_section",
                    "no cross section registered under name",
                )
                .with_context("cross_section", name),
            )
        })
    }

    /// Registered kind names, sorted.
    pub fn kind_names(&self) -> Vec<&str> {
        self.kinds.keys().map(String::as_str).collect()
    }

    /// Registered cross-section names, sorted.
    pub fn cross_section_names(&self) -> Vec<&str> {
        self.cross_sections.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for ModelCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCatalog")
            .field("kinds", &self.kind_names())
            .field("cross_sections", &self.cross_section_names())
            .finish()
    }
}
