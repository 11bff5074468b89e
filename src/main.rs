use clap::Parser;
use mazepath::{app, config::Config, logging};

fn main() -> std::io::Result<()> {
    let config = Config::parse();
    // Keep the guard alive until the end so buffered log lines are flushed
    let _log_guard = logging::init_logging(&config);
    tracing::info!("[main] starting with {:?}", config);

    app::run(&config)
}
