#![deny(missing_docs)]
#![doc = "Energy-domain dispatch of hadronic inelastic interaction models."]

/// Energy domains and model bindings.
pub mod binding;
/// Named generator factories and cross-section providers.
pub mod catalog;
pub mod config;
/// Per-particle binding tables and resolution.
pub mod dispatcher;
/// Final states and the generator interface.
pub mod model;
pub mod physics_list;
/// Cross-section providers and tabulated cross sections.
pub mod provider;

pub use binding::{EnergyDomain, ModelBinding, ModelRole};
pub use catalog::{GeneratorFactory, ModelCatalog};
pub use config::{
    load_physics_list, BindingSpec, CoverageSpec, CrossoverSpec, ModelSpec, ParticleSpec,
    PhysicsListConfig, TransitionSpec,
};
pub use dispatcher::{
    BindingSummary, CoverageWindow, DispatchTable, DispatcherBuilder, InteractionDispatcher,
    ParticleDispatch,
};
pub use model::{AbsorptionModel, FinalState, FinalStateGenerator, Secondary};
pub use physics_list::assemble;
pub use provider::{
    CrossSectionProvider, Element, IsotopeFraction, Projectile, TabulatedCrossSection,
    TargetNucleus, XsTable,
};
