use anyhow::{Context, Result};
use rune_config::RuneConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

fn main() -> Result<()> {
    // First argument overrides the default rune.toml lookup
    let mut config = match std::env::args().nth(1) {
        Some(path) => RuneConfig::load_from_file(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => RuneConfig::load_or_default(),
    };
    config.merge_with_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        transitions = config.transitions.enabled,
        width = config.layout.width,
        height = config.layout.height,
        "starting variant transition demo"
    );
    demo::run(&config)
}
