use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hadr_core::Energy;
use hadr_dispatch::BindingSummary;
use serde::Serialize;

use super::{load_physics, print_json};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// YAML physics list.
    #[arg(long, default_value = "configs/physics_list.yaml")]
    pub physics_list: PathBuf,
    /// Particle name (`pi+`, `neutron`, ...) or identity code.
    #[arg(long)]
    pub particle: String,
    /// Kinetic energy, e.g. `6.2 GeV`; bare numbers are MeV.
    #[arg(long)]
    pub energy: Energy,
}

#[derive(Debug, Serialize)]
struct ResolveReport {
    config_hash: String,
    particle: String,
    code: i32,
    energy_mev: f64,
    binding: BindingSummary,
    cross_section: String,
}

pub fn run(args: &ResolveArgs) -> Result<(), Box<dyn Error>> {
    let physics = load_physics(&args.physics_list)?;
    let particle = physics.table.resolve(&args.particle)?;
    let energy = args.energy.mev();
    let binding = physics.dispatcher.resolve(particle, energy)?;
    let provider = physics.dispatcher.cross_section_provider(particle, energy)?;
    let report = ResolveReport {
        config_hash: physics.config_hash.clone(),
        particle: args.particle.clone(),
        code: particle.as_raw(),
        energy_mev: energy,
        binding: BindingSummary::of(binding),
        cross_section: provider.name().to_string(),
    };
    print_json(&report)
}
