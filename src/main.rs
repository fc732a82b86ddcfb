use std::process::ExitCode;

use dotenv::dotenv;
use gridnav::config::env_var_or;
use gridnav::infra::DefaultObserver;
use gridnav::sim::{GridWorld, SimConfig, SimHandle};
use gridnav::{NavigatorConfig, Navigator, Position};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridnav=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let nav_config = NavigatorConfig::from_env()?;
    let sim_config = SimConfig::from_env()?;
    let target = Position::new(
        env_var_or("GRIDNAV_TARGET_X", 14)?,
        env_var_or("GRIDNAV_TARGET_Y", 54)?,
    );

    tracing::info!(
        "World {}x{}, start {}, {} obstacles (seed {})",
        sim_config.width,
        sim_config.height,
        sim_config.start,
        sim_config.obstacles,
        sim_config.seed
    );

    let world = SimHandle::new(GridWorld::generate(&sim_config));
    let mut navigator =
        Navigator::new(world.clone(), world.clone(), nav_config).with_observer(DefaultObserver);

    tracing::info!(
        "Navigating to {} (settle delay {:?})",
        target,
        navigator.config().settle_delay
    );
    let outcome = navigator.move_to_target(target);

    let (map, moves) = world.with_world(|w| (w.draw_ascii_map(Some(target)), w.moves()));
    println!("{}", map);
    println!("Agent moved {} cells", moves);

    match outcome {
        Ok(report) => {
            println!(
                "Arrived at {} after {} steps ({} recoveries)",
                report.target, report.executed_steps, report.recoveries
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("Navigation failed: {}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}
