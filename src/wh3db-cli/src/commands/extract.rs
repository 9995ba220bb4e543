//! Extract command handler
//!
//! Runs RPFM and leaves the exported TSV files in the destination.

use std::path::Path;

use anyhow::Result;

use crate::config::Config;
use crate::rpfm::{self, RpfmTools};

/// Handle the extract command
pub fn handle(
    tables: &[String],
    rpfm_dir: Option<&Path>,
    dest: &Path,
    game_data: Option<&Path>,
    schema: Option<&Path>,
) -> Result<()> {
    let config = Config::load()?;
    let tools = RpfmTools::resolve(rpfm_dir, game_data, schema, &config)?;

    println!("Tables to extract (normalized):");
    for table in tables {
        println!("  {}", table);
    }

    let files = rpfm::extract_tables(&tools, tables, dest)?;
    if files.is_empty() {
        eprintln!("Warning: rpfm_cli produced no TSV files (unknown table names?)");
        return Ok(());
    }

    println!("Extracted {} tables to {}", files.len(), dest.display());
    Ok(())
}
