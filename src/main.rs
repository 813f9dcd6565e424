use log::{error, info};
use spring_toy::{RunError, SimConfig, Simulation};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::default();
    info!(
        "Starting {} nodes, {} springs on a {}x{} area",
        config.node_count, config.spring_count, config.width, config.height
    );

    let result = Simulation::new(config)
        .map_err(RunError::from)
        .and_then(Simulation::run);

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
