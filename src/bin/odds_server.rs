use std::net::SocketAddr;

use oddsgrid::{
    init_logging, log_app_bind, log_app_start, log_store_seeded, logging_config_from_env,
    odds_router, MutationConfig, MutationJob, OddsStore, SeedConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_cfg = logging_config_from_env();
    init_logging(&logging_cfg)?;
    log_app_start(&logging_cfg);

    let addr: SocketAddr = std::env::var("ODDSGRID_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()?;

    let seed_cfg = seed_config_from_env();
    let store = OddsStore::seeded(seed_cfg, &mut rand::thread_rng());
    log_store_seeded(seed_cfg.runners, seed_cfg.bookkeepers, store.len());

    let mutation = MutationJob::spawn(store.clone(), MutationConfig::default());

    let app = odds_router(store);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    log_app_bind(bound_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    mutation.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn seed_config_from_env() -> SeedConfig {
    let mut cfg = SeedConfig::default();
    if let Some(runners) = env_usize("ODDSGRID_RUNNERS") {
        cfg.runners = runners;
    }
    if let Some(bookkeepers) = env_usize("ODDSGRID_BOOKKEEPERS") {
        cfg.bookkeepers = bookkeepers;
    }
    cfg
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}
