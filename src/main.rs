//! isoengine demo entry point.
//!
//! Runs the isometric tile core headless:
//! - **bevy_ecs** for the entity-component-system architecture
//! - **glam** for the tile/screen projection
//! - **configparser** for `config.ini`
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing)
//! 2. Build the ECS world, resources and observers
//! 3. Spawn the demo ground and hero
//! 4. Advance time by a fixed delta and run the schedule once per frame
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --ticks 240 --dt 0.016
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use isoengine::components::screenposition::ScreenPosition;
use isoengine::components::tileactor::TileActor;
use isoengine::game;
use isoengine::resources::gameconfig::GameConfig;
use isoengine::systems::time::update_world_time;

/// Isometric tile engine demo
#[derive(Parser)]
#[command(version, about = "Runs the isometric tile engine core headless for a number of frames.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    ticks: u32,

    /// Frame delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Write the effective configuration back to the config file and exit.
    #[arg(long)]
    save_config: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }

    if cli.save_config {
        return match config.save_to_file() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let mut world = match game::build_world(&config) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Cannot build world: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let hero = game::spawn_demo(&mut world);
    let mut update = game::build_schedule();

    log::info!("Running {} frames of {:.4}s", cli.ticks, cli.dt);
    for _ in 0..cli.ticks {
        update_world_time(&mut world, cli.dt);
        update.run(&mut world);
        world.clear_trackers();
    }

    if let (Some(actor), Some(screen)) = (
        world.get::<TileActor>(hero),
        world.get::<ScreenPosition>(hero),
    ) {
        log::info!(
            "Hero at tile {:?} ({}), screen ({:.1}, {:.1})",
            actor.tile_index,
            actor.tile_position,
            screen.x(),
            screen.y()
        );
    }
    ExitCode::SUCCESS
}
