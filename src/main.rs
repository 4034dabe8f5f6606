use std::path::PathBuf;

use anyhow::Result;
use griffin::{GriffinConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config file path, otherwise the per-user default
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = GriffinConfig::load_from_path(config_path)?;
    logging::init(&config.logging)?;

    web::run(config).await
}
