use {
    server::{AppState, DockerCli, ServerConfig},
    std::sync::Arc,
    store::{DocumentStore, MemoryStore},
    video::VideoOpener,
};

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("server: cannot listen for Ctrl-C: {}", error);
        std::future::pending::<()>().await;
    }
    log::info!("server: shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();
    match config.log_dir() {
        Some(dir) => base::init_file_logger(dir, config.log_level())?,
        None => base::init_stdout_logger(config.log_level()),
    }
    for warning in config.warnings() {
        log::warn!("config: {}", warning);
    }

    let store: Arc<dyn DocumentStore> = match config.data_file() {
        Some(path) => Arc::new(MemoryStore::load(path)?),
        None => {
            log::warn!("config: DATA_FILE not set, starting with an empty store");
            Arc::new(MemoryStore::new())
        }
    };
    let state = AppState::new(
        &config,
        store,
        server::default_registry(&config),
        Arc::new(VideoOpener),
        Arc::new(DockerCli::default()),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    log::info!(
        "server: {} listening on http://{}",
        config.app_name(),
        config.bind_addr()
    );
    axum::serve(listener, server::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("server: stopped");
    Ok(())
}
