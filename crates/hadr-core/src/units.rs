//! Energy units and the configuration-facing [`Energy`] value.
//!
//! Internally every energy is a plain `f64` in MeV. [`Energy`] is only used at the
//! configuration boundary where users write values such as `"6.1 GeV"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ErrorInfo, HadrError};

/// One electronvolt expressed in MeV.
pub const EV: f64 = 1.0e-6;
/// One kiloelectronvolt expressed in MeV.
pub const KEV: f64 = 1.0e-3;
/// Base energy unit.
pub const MEV: f64 = 1.0;
/// One gigaelectronvolt expressed in MeV.
pub const GEV: f64 = 1.0e3;
/// One teraelectronvolt expressed in MeV.
pub const TEV: f64 = 1.0e6;
/// One petaelectronvolt expressed in MeV.
pub const PEV: f64 = 1.0e9;

const UNITS: [(&str, f64); 6] = [
    ("eV", EV),
    ("keV", KEV),
    ("MeV", MEV),
    ("GeV", GEV),
    ("TeV", TEV),
    ("PeV", PEV),
];

/// Non-negative kinetic energy in MeV, possibly infinite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Energy(f64);

impl Energy {
    /// Zero energy.
    pub const ZERO: Energy = Energy(0.0);
    /// Open upper end of an energy axis.
    pub const INFINITY: Energy = Energy(f64::INFINITY);

    /// Creates an energy from a value in MeV.
    pub fn from_mev(value: f64) -> Result<Self, HadrError> {
        if value.is_nan() || value < 0.0 {
            return Err(HadrError::Config(
                ErrorInfo::new("energy_negative", "energies must be non-negative")
                    .with_context("value", value.to_string()),
            ));
        }
        Ok(Self(value))
    }

    /// Energy in GeV for literal defaults; negative or NaN input yields zero.
    pub fn from_gev(value: f64) -> Self {
        Self(value.max(0.0) * GEV)
    }

    /// Energy in TeV for literal defaults; negative or NaN input yields zero.
    pub fn from_tev(value: f64) -> Self {
        Self(value.max(0.0) * TEV)
    }

    /// Returns the energy in MeV.
    pub fn mev(self) -> f64 {
        self.0
    }

    /// Returns true for the open-ended upper bound.
    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }

    /// Parses `"<number> [unit]"`; a bare number is taken as MeV.
    pub fn parse(text: &str) -> Result<Self, HadrError> {
        let trimmed = text.trim();
        if matches!(
            trimmed.to_ascii_lowercase().as_str(),
            "inf" | "infinity" | "+inf"
        ) {
            return Ok(Self::INFINITY);
        }
        // "eV" is a suffix of every other unit, so it is tried last.
        let (number, scale) = UNITS
            .iter()
            .rev()
            .find_map(|(name, scale)| {
                trimmed
                    .strip_suffix(name)
                    .map(|number| (number.trim(), *scale))
            })
            .unwrap_or((trimmed, MEV));
        let value: f64 = number.parse().map_err(|_| {
            HadrError::Config(
                ErrorInfo::new("energy_parse", "energy value is not a number")
                    .with_context("value", trimmed)
                    .with_hint("write `<number> <unit>` with one of eV, keV, MeV, GeV, TeV, PeV"),
            )
        })?;
        Self::from_mev(value * scale)
    }
}

impl FromStr for Energy {
    type Err = HadrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Energy::parse(s)
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_infinite() {
            return write!(f, "inf");
        }
        let (name, scale) = UNITS
            .iter()
            .rev()
            .find(|(_, scale)| self.0 >= *scale)
            .copied()
            .unwrap_or(("MeV", MEV));
        write!(f, "{} {}", self.0 / scale, name)
    }
}

impl Serialize for Energy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_str("inf")
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnergyValue {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Energy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match EnergyValue::deserialize(deserializer)? {
            EnergyValue::Number(value) => Energy::from_mev(value),
            EnergyValue::Text(text) => Energy::parse(&text),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
