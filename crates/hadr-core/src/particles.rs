//! Particle identities and the name/code lookup table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HadrError};

/// Stable numeric particle identity (PDG encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleId(i32);

impl ParticleId {
    /// Neutron.
    pub const NEUTRON: ParticleId = ParticleId(2112);
    /// Anti-neutron.
    pub const ANTI_NEUTRON: ParticleId = ParticleId(-2112);
    /// Proton.
    pub const PROTON: ParticleId = ParticleId(2212);
    /// Anti-proton.
    pub const ANTI_PROTON: ParticleId = ParticleId(-2212);
    /// Positive pion.
    pub const PION_PLUS: ParticleId = ParticleId(211);
    /// Negative pion.
    pub const PION_MINUS: ParticleId = ParticleId(-211);
    /// Electron.
    pub const ELECTRON: ParticleId = ParticleId(11);
    /// Positron.
    pub const POSITRON: ParticleId = ParticleId(-11);
    /// Photon.
    pub const GAMMA: ParticleId = ParticleId(22);

    /// Creates an identifier from its raw PDG encoding.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw PDG encoding.
    pub fn as_raw(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Families of particles that share one model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticleGroup {
    /// Charged and neutral kaons.
    Kaons,
    /// Lambda, sigma, xi and omega baryons.
    Hyperons,
    /// Anti-particles of [`ParticleGroup::Hyperons`].
    AntiHyperons,
    /// Anti-deuteron, anti-triton, anti-helium-3 and anti-alpha.
    LightAntiIons,
    /// Charmed and bottom hadrons with their anti-particles.
    BcHadrons,
}

const KAONS: [ParticleId; 4] = [
    ParticleId(321),
    ParticleId(-321),
    ParticleId(130),
    ParticleId(310),
];
const HYPERONS: [ParticleId; 7] = [
    ParticleId(3122),
    ParticleId(3222),
    ParticleId(3212),
    ParticleId(3112),
    ParticleId(3322),
    ParticleId(3312),
    ParticleId(3334),
];
const ANTI_HYPERONS: [ParticleId; 7] = [
    ParticleId(-3122),
    ParticleId(-3222),
    ParticleId(-3212),
    ParticleId(-3112),
    ParticleId(-3322),
    ParticleId(-3312),
    ParticleId(-3334),
];
const LIGHT_ANTI_IONS: [ParticleId; 4] = [
    ParticleId(-1000010020),
    ParticleId(-1000010030),
    ParticleId(-1000020030),
    ParticleId(-1000020040),
];

const BC_HADRONS: [ParticleId; 18] = [
    ParticleId(411),
    ParticleId(-411),
    ParticleId(421),
    ParticleId(-421),
    ParticleId(431),
    ParticleId(-431),
    ParticleId(521),
    ParticleId(-521),
    ParticleId(511),
    ParticleId(-511),
    ParticleId(531),
    ParticleId(-531),
    ParticleId(541),
    ParticleId(-541),
    ParticleId(4122),
    ParticleId(-4122),
    ParticleId(5122),
    ParticleId(-5122),
];

impl ParticleGroup {
    /// Returns the identities belonging to the group.
    pub fn members(self) -> &'static [ParticleId] {
        match self {
            ParticleGroup::Kaons => &KAONS,
            ParticleGroup::Hyperons => &HYPERONS,
            ParticleGroup::AntiHyperons => &ANTI_HYPERONS,
            ParticleGroup::LightAntiIons => &LIGHT_ANTI_IONS,
            ParticleGroup::BcHadrons => &BC_HADRONS,
        }
    }
}

/// One row of the identity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleEntry {
    /// Canonical particle name (`"neutron"`, `"pi+"`, ...).
    pub name: String,
    /// PDG encoding.
    pub id: ParticleId,
    /// Rest mass in MeV.
    pub mass: f64,
}

/// Immutable name/code lookup table owned by the transport engine.
///
/// Name lookups are comparatively expensive; consumers resolve the names they
/// need once and keep the codes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleTable {
    entries: BTreeMap<String, ParticleEntry>,
    by_id: BTreeMap<ParticleId, String>,
}

const STANDARD_ENTRIES: [(&str, i32, f64); 52] = [
    ("neutron", 2112, 939.565_42),
    ("anti_neutron", -2112, 939.565_42),
    ("proton", 2212, 938.272_09),
    ("anti_proton", -2212, 938.272_09),
    ("pi+", 211, 139.570_39),
    ("pi-", -211, 139.570_39),
    ("pi0", 111, 134.976_8),
    ("e-", 11, 0.510_998_95),
    ("e+", -11, 0.510_998_95),
    ("gamma", 22, 0.0),
    ("mu-", 13, 105.658_37),
    ("mu+", -13, 105.658_37),
    ("kaon+", 321, 493.677),
    ("kaon-", -321, 493.677),
    ("kaon0L", 130, 497.611),
    ("kaon0S", 310, 497.611),
    ("lambda", 3122, 1115.683),
    ("sigma+", 3222, 1189.37),
    ("sigma0", 3212, 1192.642),
    ("sigma-", 3112, 1197.449),
    ("xi0", 3322, 1314.86),
    ("xi-", 3312, 1321.71),
    ("omega-", 3334, 1672.45),
    ("anti_lambda", -3122, 1115.683),
    ("anti_sigma+", -3222, 1189.37),
    ("anti_sigma0", -3212, 1192.642),
    ("anti_sigma-", -3112, 1197.449),
    ("anti_xi0", -3322, 1314.86),
    ("anti_xi-", -3312, 1321.71),
    ("anti_omega-", -3334, 1672.45),
    ("anti_deuteron", -1000010020, 1875.613),
    ("anti_triton", -1000010030, 2808.921),
    ("anti_He3", -1000020030, 2808.391),
    ("anti_alpha", -1000020040, 3727.379),
    ("D+", 411, 1869.66),
    ("D-", -411, 1869.66),
    ("D0", 421, 1864.84),
    ("anti_D0", -421, 1864.84),
    ("Ds+", 431, 1968.35),
    ("Ds-", -431, 1968.35),
    ("B+", 521, 5279.34),
    ("B-", -521, 5279.34),
    ("B0", 511, 5279.65),
    ("anti_B0", -511, 5279.65),
    ("Bs0", 531, 5366.88),
    ("anti_Bs0", -531, 5366.88),
    ("Bc+", 541, 6274.47),
    ("Bc-", -541, 6274.47),
    ("lambda_c+", 4122, 2286.46),
    ("anti_lambda_c+", -4122, 2286.46),
    ("lambda_b", 5122, 5619.6),
    ("anti_lambda_b", -5122, 5619.6),
];

impl ParticleTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the particles a hadronic test-beam simulation needs.
    pub fn standard() -> Self {
        let mut table = Self::new();
        for (name, code, mass) in STANDARD_ENTRIES {
            table.insert(name, ParticleId(code), mass);
        }
        table
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, name: impl Into<String>, id: ParticleId, mass: f64) {
        let name = name.into();
        if let Some(previous) = self.entries.get(&name) {
            self.by_id.remove(&previous.id);
        }
        self.by_id.insert(id, name.clone());
        self.entries.insert(
            name.clone(),
            ParticleEntry {
                name,
                id,
                mass,
            },
        );
    }

    /// Looks a particle up by name.
    pub fn find(&self, name: &str) -> Option<&ParticleEntry> {
        self.entries.get(name)
    }

    /// Looks a particle up by identity code.
    pub fn entry(&self, id: ParticleId) -> Option<&ParticleEntry> {
        self.by_id.get(&id).and_then(|name| self.entries.get(name))
    }

    /// Returns the name registered for `id`, if any.
    pub fn name_of(&self, id: ParticleId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Resolves either a particle name or a raw numeric code.
    pub fn resolve(&self, name_or_code: &str) -> Result<ParticleId, HadrError> {
        if let Some(entry) = self.find(name_or_code) {
            return Ok(entry.id);
        }
        name_or_code
            .trim()
            .parse::<i32>()
            .map(ParticleId)
            .map_err(|_| {
                HadrError::Config(
                    ErrorInfo::new("particle_unknown", "particle name not in identity table")
                        .with_context("particle", name_or_code),
                )
            })
    }

    /// Iterates over all entries ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &ParticleEntry> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
