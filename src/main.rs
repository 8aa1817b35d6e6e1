use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod geo;
mod handler;
mod http;
mod logger;
mod server;

const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path).map_err(config::ConfigError::from)?;

    if let Err(errors) = cfg.validate() {
        for error in &errors {
            eprintln!("[CONFIG] {error}");
        }
        return Err(format!("{} configuration error(s) in '{config_path}'", errors.len()).into());
    }

    // Logging must outlive the runtime so late shutdown events are flushed
    let _log_guard = logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg);
    let state = Arc::new(config::AppState::new(cfg)?);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    server::start_server_loop(listener, state, shutdown).await?;
    tracing::info!("server stopped");
    Ok(())
}
