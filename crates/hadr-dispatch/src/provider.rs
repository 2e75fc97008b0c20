use std::collections::BTreeMap;

use hadr_core::errors::{ErrorInfo, HadrError};
use hadr_core::ParticleId;
use serde::{Deserialize, Serialize};

/// Projectile entering an inelastic interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Identity of the projectile.
    pub particle: ParticleId,
    /// Kinetic energy in MeV.
    pub kinetic_energy: f64,
}

impl Projectile {
    /// Creates a projectile.
    pub fn new(particle: ParticleId, kinetic_energy: f64) -> Self {
        Self {
            particle,
            kinetic_energy,
        }
    }
}

/// Isotope share of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsotopeFraction {
    /// Mass number.
    pub a: u32,
    /// Relative abundance; the fractions of an element sum to one.
    pub abundance: f64,
}

/// Target element with its isotopic composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Atomic number.
    pub z: u32,
    /// Isotopic composition used when the provider only works per isotope.
    #[serde(default)]
    pub isotopes: Vec<IsotopeFraction>,
}

/// Nucleus hit by the projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetNucleus {
    /// Atomic number.
    pub z: u32,
    /// Mass number.
    pub a: u32,
}

/// Source of inelastic cross sections, in barn.
///
/// Providers answer at the element level when [`is_element_applicable`] says
/// so; otherwise the element cross section is the abundance-weighted sum over
/// the applicable isotopes.
///
/// [`is_element_applicable`]: CrossSectionProvider::is_element_applicable
pub trait CrossSectionProvider: Send + Sync {
    /// Name used in reports and configuration.
    fn name(&self) -> &str;

    /// Whether the element-level cross section can be used for `z`.
    fn is_element_applicable(&self, _projectile: &Projectile, _z: u32) -> bool {
        true
    }

    /// Whether the isotope-level cross section can be used for `(z, a)`.
    fn is_isotope_applicable(&self, _projectile: &Projectile, _z: u32, _a: u32) -> bool {
        true
    }

    /// Element-level cross section.
    fn element_cross_section(&self, projectile: &Projectile, z: u32) -> f64;

    /// Isotope-level cross section.
    fn isotope_cross_section(&self, projectile: &Projectile, z: u32, _a: u32) -> f64 {
        self.element_cross_section(projectile, z)
    }

    /// Cross section of `element`, taking the isotope path when required.
    fn cross_section(&self, projectile: &Projectile, element: &Element) -> f64 {
        if self.is_element_applicable(projectile, element.z) {
            return self.element_cross_section(projectile, element.z);
        }
        element
            .isotopes
            .iter()
            .filter(|iso| self.is_isotope_applicable(projectile, element.z, iso.a))
            .map(|iso| iso.abundance * self.isotope_cross_section(projectile, element.z, iso.a))
            .sum()
    }
}

/// Piecewise-linear table of cross section against kinetic energy.
///
/// Only valid tables exist: [`XsTable::new`] and deserialization both run
/// [`XsTable::validate`], so the grid is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawXsTable")]
pub struct XsTable {
    energies: Vec<f64>,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawXsTable {
    energies: Vec<f64>,
    values: Vec<f64>,
}

impl TryFrom<RawXsTable> for XsTable {
    type Error = HadrError;

    fn try_from(raw: RawXsTable) -> Result<Self, Self::Error> {
        XsTable::new(raw.energies, raw.values)
    }
}

impl XsTable {
    /// Validates and wraps a table.
    pub fn new(energies: Vec<f64>, values: Vec<f64>) -> Result<Self, HadrError> {
        let table = Self { energies, values };
        table.validate()?;
        Ok(table)
    }

    /// Strictly increasing energy grid in MeV.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Cross sections at the grid points, in barn.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Checks grid ordering and lengths.
    pub fn validate(&self) -> Result<(), HadrError> {
        if self.energies.is_empty() || self.energies.len() != self.values.len() {
            return Err(HadrError::Config(
                ErrorInfo::new(
                    "xs_table_shape",
                    "energy grid and values must be non-empty and equally long",
                )
                .with_context("energies", self.energies.len().to_string())
                .with_context("values", self.values.len().to_string()),
            ));
        }
        if self.energies.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(HadrError::Config(ErrorInfo::new(
                "xs_table_order",
                "energy grid must be strictly increasing",
            )));
        }
        if self.values.iter().any(|v| v.is_nan() || *v < 0.0) {
            return Err(HadrError::Config(ErrorInfo::new(
                "xs_table_values",
                "cross sections must be non-negative",
            )));
        }
        Ok(())
    }

    /// Interpolates linearly, holding the end values outside the grid.
    pub fn evaluate(&self, energy: f64) -> f64 {
        let upper = self.energies.partition_point(|grid| *grid <= energy);
        if upper == 0 {
            return self.values.first().copied().unwrap_or(0.0);
        }
        if upper >= self.energies.len() {
            return self.values.last().copied().unwrap_or(0.0);
        }
        let (e0, e1) = (self.energies[upper - 1], self.energies[upper]);
        let (v0, v1) = (self.values[upper - 1], self.values[upper]);
        v0 + (v1 - v0) * (energy - e0) / (e1 - e0)
    }
}

/// Cross sections interpolated from per-element and per-isotope tables.
///
/// With `isotope_only` set, elements are never answered directly so the
/// element's own isotopic composition always drives the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabulatedCrossSection {
    /// Provider name.
    pub name: String,
    /// Disable the element-level path.
    #[serde(default)]
    pub isotope_only: bool,
    /// Tables keyed by atomic number.
    #[serde(default)]
    pub elements: BTreeMap<u32, XsTable>,
    /// Tables keyed by `"Z-A"`.
    #[serde(default)]
    pub isotopes: BTreeMap<String, XsTable>,
}

impl TabulatedCrossSection {
    /// Creates an empty provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            isotope_only: false,
            elements: BTreeMap::new(),
            isotopes: BTreeMap::new(),
        }
    }

    /// Adds an element table.
    pub fn with_element(mut self, z: u32, table: XsTable) -> Self {
        self.elements.insert(z, table);
        self
    }

    /// Adds an isotope table.
    pub fn with_isotope(mut self, z: u32, a: u32, table: XsTable) -> Self {
        self.isotopes.insert(isotope_key(z, a), table);
        self
    }

    /// Forces the isotope path.
    pub fn isotope_only(mut self) -> Self {
        self.isotope_only = true;
        self
    }

    /// Validates every table.
    pub fn validate(&self) -> Result<(), HadrError> {
        for table in self.elements.values().chain(self.isotopes.values()) {
            table.validate().map_err(|err| {
                let info = err.info().clone().with_context("provider", self.name.clone());
                HadrError::Config(info)
            })?;
        }
        Ok(())
    }

    fn isotope_table(&self, z: u32, a: u32) -> Option<&XsTable> {
        self.isotopes
            .get(&isotope_key(z, a))
            .or_else(|| self.elements.get(&z))
    }
}

fn isotope_key(z: u32, a: u32) -> String {
    format!("{z}-{a}")
}

impl CrossSectionProvider for TabulatedCrossSection {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_element_applicable(&self, _projectile: &Projectile, z: u32) -> bool {
        !self.isotope_only && self.elements.contains_key(&z)
    }

    fn is_isotope_applicable(&self, _projectile: &Projectile, z: u32, a: u32) -> bool {
        self.isotope_table(z, a).is_some()
    }

    fn element_cross_section(&self, projectile: &Projectile, z: u32) -> f64 {
        self.elements
            .get(&z)
            .map(|table| table.evaluate(projectile.kinetic_energy))
            .unwrap_or(0.0)
    }

    fn isotope_cross_section(&self, projectile: &Projectile, z: u32, a: u32) -> f64 {
        self.isotope_table(z, a)
            .map(|table| table.evaluate(projectile.kinetic_energy))
            .unwrap_or(0.0)
    }
}
