//! # LATTICE Counter Demo
//!
//! Reference embedder for the core runtime. Builds a world with three
//! component kinds and three systems, seeds a handful of counter entities,
//! and drives the fixed-order update loop for a configured number of
//! frames. One line of output per frame (the display system runs last).

mod config;
mod systems;

use std::path::Path;
use std::process::ExitCode;

use lattice_core::World;

use crate::config::DemoConfig;
use crate::systems::{Counter, DecSys, DecTag, DisplaySys, IncSys, IncTag};

/// Default config path; first CLI argument overrides it.
const CONFIG_PATH: &str = "lattice.toml";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_owned());
    let config = match DemoConfig::load(Path::new(&path)) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("lattice: {error}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?config, "demo configured");

    let world = World::builder()
        .component::<Counter>()
        .component::<IncTag>()
        .component::<DecTag>()
        .system(IncSys::new(config.ceiling))
        .system(DecSys::new(config.floor))
        .system(DisplaySys::default())
        .build();
    let mut world = match world {
        Ok(world) => world,
        Err(error) => {
            eprintln!("lattice: invalid world configuration: {error}");
            return ExitCode::FAILURE;
        }
    };

    // Seed entities: one climbing from zero, one falling from the middle,
    // one starting below the floor and climbing from there.
    world.create_entity((Counter(0), IncTag));
    world.create_entity((Counter(5), DecTag));
    let third = world.create_entity(Counter(config.floor + 2));
    world.add(third, IncTag);

    for frame in 0..config.frames {
        if config.narrow_display_after == Some(frame) {
            // Synchronous: narrows the display starting with this frame.
            world.message::<DisplaySys, i32>(1);
        }
        world.update();
    }

    tracing::debug!(entities = world.len(), frames = config.frames, "demo finished");
    ExitCode::SUCCESS
}
