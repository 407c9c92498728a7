//! CLI command implementations.

pub mod stacks;
pub mod variants;

use anyhow::{Context, Result};
use rosdistro_config::ManifestSource;
use rosdistro_core::Distribution;
use tracing::debug;

pub async fn load(location: &str) -> Result<Distribution> {
    let source = ManifestSource::parse(location)?;
    debug!(source = %source, "Loading distro");
    let distro = source
        .load()
        .await
        .with_context(|| format!("failed to load distro from {}", source))?;
    Ok(distro)
}

pub async fn validate(location: &str) -> Result<()> {
    match load(location).await {
        Ok(distro) => {
            println!(
                "Distro is valid: {} (version {}, {} stacks, {} variants)",
                distro.release_name(),
                distro.version(),
                distro.stacks().len(),
                distro.variants().len()
            );
            Ok(())
        }
        Err(e) => {
            println!("Distro error: {:#}", e);
            std::process::exit(1);
        }
    }
}
