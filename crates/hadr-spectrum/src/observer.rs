use std::collections::BTreeSet;

use hadr_core::{RegionId, RegionTable, StepSnapshot};
use serde::{Deserialize, Serialize};

use crate::accumulator::SpectrumAccumulator;
use crate::config::BoundaryConfig;

/// Receives energies routed out of the step observer.
pub trait EnergySink {
    /// Adds one contribution.
    fn add(&mut self, energy: f64);
}

/// Running sum and entry count of one energy channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyTally {
    sum: f64,
    entries: u64,
}

impl EnergyTally {
    /// Empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Summed energy.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of contributions.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Returns the tally and clears it for the next event.
    pub fn take(&mut self) -> EnergyTally {
        std::mem::take(self)
    }
}

impl EnergySink for EnergyTally {
    fn add(&mut self, energy: f64) {
        self.sum += energy;
        self.entries += 1;
    }
}

/// Boundary regions resolved to handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryRegions {
    contained: RegionId,
    outer: RegionId,
    excluded: BTreeSet<RegionId>,
}

impl BoundaryRegions {
    /// Interns the configured names into `regions`.
    pub fn resolve(config: &BoundaryConfig, regions: &mut RegionTable) -> Self {
        let contained = regions.intern(&config.contained_region);
        let outer = regions.intern(&config.outer_region);
        let excluded = config
            .deposit_exclusions
            .iter()
            .map(|name| regions.intern(name))
            .collect();
        Self {
            contained,
            outer,
            excluded,
        }
    }

    /// Region the leaking tracks come from.
    pub fn contained(&self) -> RegionId {
        self.contained
    }

    /// Region the leaking tracks enter.
    pub fn outer(&self) -> RegionId {
        self.outer
    }

    /// True when the step leaves the contained region into the outer one.
    pub fn is_leaving(&self, step: &StepSnapshot) -> bool {
        step.pre_region == Some(self.contained) && step.post_region == Some(self.outer)
    }

    /// True when deposits in `region` are collected.
    pub fn collects_deposit(&self, region: Option<RegionId>) -> bool {
        region.is_some_and(|region| !self.excluded.contains(&region))
    }
}

/// Which channels a step was routed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRouting {
    /// The step crossed the boundary and was scored.
    pub leaked: bool,
    /// The step's deposit was forwarded.
    pub deposited: bool,
}

/// Routes steps to the spectrum accumulator and the energy channels.
///
/// Both conditions are checked independently for every step; the deposit
/// condition looks at the region the step started in.
pub struct BoundaryStepObserver<'a> {
    regions: &'a BoundaryRegions,
    accumulator: &'a mut SpectrumAccumulator,
    leakage: &'a mut dyn EnergySink,
    deposit: &'a mut dyn EnergySink,
}

impl<'a> BoundaryStepObserver<'a> {
    /// Borrows the targets for the duration of an event.
    pub fn new(
        regions: &'a BoundaryRegions,
        accumulator: &'a mut SpectrumAccumulator,
        leakage: &'a mut dyn EnergySink,
        deposit: &'a mut dyn EnergySink,
    ) -> Self {
        Self {
            regions,
            accumulator,
            leakage,
            deposit,
        }
    }

    /// Handles one step.
    pub fn on_step(&mut self, step: &StepSnapshot) -> StepRouting {
        let mut routing = StepRouting::default();
        if self.regions.is_leaving(step) {
            self.leakage.add(step.kinetic_energy);
            self.accumulator.accumulate(step);
            routing.leaked = true;
        }
        if self.regions.collects_deposit(step.pre_region) {
            self.deposit.add(step.energy_deposit);
            routing.deposited = true;
        }
        log::trace!(
            "step {} ke={} -> leaked={} deposited={}",
            step.particle,
            step.kinetic_energy,
            routing.leaked,
            routing.deposited
        );
        routing
    }

    /// The borrowed accumulator.
    pub fn accumulator(&self) -> &SpectrumAccumulator {
        self.accumulator
    }
}
