// Main CLI entry point for Templar
// Uses clap for argument parsing and tracing for logs

use templar::config::{build_cli, Config};
use templar::pipeline::prepare_templates;
use templar::store::JsonlStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging; RUST_LOG wins over --log-level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let matches = build_cli().get_matches();
    let cfg = Config::from_matches(&matches);
    init_logging(&cfg.log_level);

    let output = cfg.output.clone().unwrap_or_else(JsonlStore::default_path);
    let mut store = match JsonlStore::create(&output) {
        Ok(store) => store,
        Err(e) => {
            error!("Could not create templates file {}: {}", output.display(), e);
            std::process::exit(1);
        }
    };

    match prepare_templates(&mut store, cfg) {
        Ok(count) => {
            info!("Stored {} template(s) in {}", count, store.path().display());
            println!("{}", store.path().display());
        }
        Err(e) => {
            error!("Could not prepare templates: {}", e);
            std::process::exit(1);
        }
    }
}
