pub mod demo;
pub mod replay;
pub mod resolve;
pub mod table;
pub mod version;

use std::error::Error;
use std::fs;
use std::path::Path;

use hadr_core::serde::to_canonical_json_bytes;
use hadr_core::ParticleTable;
use hadr_dispatch::{
    assemble, load_physics_list, InteractionDispatcher, ModelCatalog, PhysicsListConfig,
};
use serde::Serialize;

/// Physics list with its assembled dispatcher.
pub struct LoadedPhysics {
    pub config: PhysicsListConfig,
    pub config_hash: String,
    pub table: ParticleTable,
    pub dispatcher: InteractionDispatcher,
}

pub fn load_physics(path: &Path) -> Result<LoadedPhysics, Box<dyn Error>> {
    let config = load_physics_list(path)?;
    let config_hash = config.config_hash()?;
    let table = ParticleTable::standard();
    let dispatcher = assemble(&config, &ModelCatalog::with_builtin_kinds(), &table)?;
    log::info!(
        "physics list {} assembled ({} particles, hash {})",
        path.display(),
        dispatcher.particles().count(),
        &config_hash[..12.min(config_hash.len())]
    );
    Ok(LoadedPhysics {
        config,
        config_hash,
        table,
        dispatcher,
    })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    let json = to_canonical_json_bytes(value)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let json = to_canonical_json_bytes(value)?;
    fs::write(path, json)?;
    Ok(())
}
