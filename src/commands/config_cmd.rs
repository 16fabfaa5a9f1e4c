use anyhow::{Context, Result};

use crate::config::Config;

pub async fn show_config() -> Result<()> {
    let config = Config::load()?;

    let mut display = config.clone();
    if !display.auth.token.is_empty() {
        display.auth.token = "<redacted>".to_string();
    }
    if !display.auth.refresh_token.is_empty() {
        display.auth.refresh_token = "<redacted>".to_string();
    }

    let contents = toml::to_string_pretty(&display).context("Failed to serialize config")?;

    println!("Configuration file: {}", Config::config_file()?.display());
    println!();
    println!("{}", contents);

    Ok(())
}

pub async fn init_config(force: bool) -> Result<()> {
    let config_file = Config::config_file()?;

    if config_file.exists() && !force {
        println!("Config file already exists: {}", config_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    Config::default().save()?;

    println!("✓ Wrote default configuration to {}", config_file.display());

    Ok(())
}
