use clap::Parser;
use tracing_subscriber::EnvFilter;

use tilt_tank_runtime::config::Settings;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let settings = Settings::parse();
    if let Err(e) = tilt_tank_runtime::runtime::run(settings).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
