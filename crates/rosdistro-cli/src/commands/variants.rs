//! Variant commands.

use anyhow::{Result, anyhow};

use super::load;

pub async fn list(location: &str) -> Result<()> {
    let distro = load(location).await?;
    for name in distro.variant_names() {
        println!("{}", name);
    }
    Ok(())
}

pub async fn show(location: &str, name: &str, json: bool) -> Result<()> {
    let distro = load(location).await?;
    let variant = distro
        .variant(name)
        .ok_or_else(|| anyhow!("variant '{}' not found in {}", name, distro.release_name()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(variant)?);
        return Ok(());
    }

    println!("{}", variant.name);
    if !variant.parents.is_empty() {
        println!("  extends: {}", variant.parents.join(", "));
    }
    println!("  stacks:");
    for stack in &variant.stack_names {
        let marker = if distro.stack(stack).is_some_and(|s| s.is_released()) {
            ""
        } else {
            " (unreleased)"
        };
        println!("    {}{}", stack, marker);
    }
    Ok(())
}
