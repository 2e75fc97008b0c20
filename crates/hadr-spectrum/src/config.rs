//! YAML configuration of the boundary scoring.

use std::fs;
use std::path::Path;

use hadr_core::errors::{ErrorInfo, HadrError};
use hadr_core::serde::from_yaml_slice;
use serde::{Deserialize, Serialize};

use crate::scorer::ScorerKind;

/// Scorer and boundary definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SpectrumConfig {
    /// Scored quantity; unrecognized names fall back to total energy.
    #[serde(default)]
    pub scorer: ScorerKind,
    /// Region names used by the step observer.
    #[serde(default)]
    pub boundary: BoundaryConfig,
}

/// Region names that define leakage and deposit collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundaryConfig {
    /// Region whose outgoing tracks are scored.
    #[serde(default = "BoundaryConfig::default_contained")]
    pub contained_region: String,
    /// Region the scored tracks enter.
    #[serde(default = "BoundaryConfig::default_outer")]
    pub outer_region: String,
    /// Regions whose deposits are not collected.
    #[serde(default = "BoundaryConfig::default_exclusions")]
    pub deposit_exclusions: Vec<String>,
}

impl BoundaryConfig {
    fn default_contained() -> String {
        "ironboxPV".to_string()
    }

    fn default_outer() -> String {
        "all_PV".to_string()
    }

    fn default_exclusions() -> Vec<String> {
        vec!["CALO::CALO".to_string(), "Barrel".to_string()]
    }

    /// Rejects empty names and identical boundary regions.
    pub fn validate(&self) -> Result<(), HadrError> {
        let mut names = [&self.contained_region, &self.outer_region]
            .into_iter()
            .chain(self.deposit_exclusions.iter());
        if names.any(|name| name.trim().is_empty()) {
            return Err(HadrError::Config(ErrorInfo::new(
                "boundary_empty_region",
                "region names must not be empty",
            )));
        }
        if self.contained_region == self.outer_region {
            return Err(HadrError::Config(
                ErrorInfo::new(
                    "boundary_same_region",
                    "contained and outer regions must differ",
                )
                .with_context("region", self.contained_region.clone()),
            ));
        }
        Ok(())
    }
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            contained_region: Self::default_contained(),
            outer_region: Self::default_outer(),
            deposit_exclusions: Self::default_exclusions(),
        }
    }
}

impl SpectrumConfig {
    /// Parses and validates a YAML spectrum configuration.
    pub fn from_yaml_slice(bytes: &[u8]) -> Result<Self, HadrError> {
        let config: SpectrumConfig = from_yaml_slice(bytes)?;
        config.boundary.validate()?;
        Ok(config)
    }
}

/// Reads and validates a spectrum configuration from disk.
pub fn load_spectrum_config<P: AsRef<Path>>(path: P) -> Result<SpectrumConfig, HadrError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        HadrError::Serde(
            ErrorInfo::new("spectrum_config_read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    SpectrumConfig::from_yaml_slice(&bytes)
}
