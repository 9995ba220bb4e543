//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up wh3db CLI defaults.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::config::Config;

/// Handle the configure command
pub fn handle(
    rpfm_path: Option<PathBuf>,
    game_data: Option<PathBuf>,
    schema: Option<PathBuf>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if rpfm_path.is_none() && game_data.is_none() && schema.is_none() {
        show_usage();
        return Ok(());
    }

    if let Some(path) = rpfm_path {
        ensure_exists(&path)?;
        println!("RPFM path configured: {}", path.display());
        config.rpfm_path = Some(path);
    }
    if let Some(path) = game_data {
        ensure_exists(&path)?;
        println!("Game data directory configured: {}", path.display());
        config.game_data_dir = Some(path);
    }
    if let Some(path) = schema {
        ensure_exists(&path)?;
        println!("Schema path configured: {}", path.display());
        config.schema_path = Some(path);
    }

    config.save()?;
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Not found: {}", path.display());
    }
    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    match config.get_rpfm_path() {
        Some(path) => println!("RPFM path:      {}", path.display()),
        None => println!("RPFM path:      (not set)"),
    }
    match config.get_game_data_dir() {
        Some(path) => println!("Game data dir:  {}", path.display()),
        None => println!("Game data dir:  (auto-detected)"),
    }
    match config.get_schema_path() {
        Some(path) => println!("Schema:         {}", path.display()),
        None => println!("Schema:         (RPFM config location)"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file:    {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: wh3db configure --rpfm-path <dir>");
    println!("   or: wh3db configure --game-data <dir> --schema <file>");
    println!("   or: wh3db configure --show");
    println!();
    println!("Note: extraction needs the RPFM CLI and the game's data.pack.");
    println!("      Values set here fill in whenever the matching flag is omitted.");
}
