//! Export command handler
//!
//! The full pipeline: extract the requested tables into a scratch
//! directory, then convert each export into the destination.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use wh3db::convert::convert_file;
use wh3db::{LuaOptions, Schema};

use crate::config::Config;
use crate::rpfm::{self, RpfmTools};

/// Handle the export command
pub fn handle(
    tables: &[String],
    rpfm_dir: Option<&Path>,
    dest: &Path,
    game_data: Option<&Path>,
    schema_path: Option<&Path>,
    options: &LuaOptions,
) -> Result<()> {
    let config = Config::load()?;
    let tools = RpfmTools::resolve(rpfm_dir, game_data, schema_path, &config)?;

    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create destination directory {}", dest.display()))?;

    println!("=== Extraction ===\n");
    println!("Tables to extract (normalized):");
    for table in tables {
        println!("  {}", table);
    }
    println!();

    let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;
    let files = rpfm::extract_tables(&tools, tables, scratch.path())?;
    if files.is_empty() {
        bail!("rpfm_cli produced no TSV files (unknown table names?)");
    }
    println!("Extracted {} tables", files.len());

    println!("\n=== Conversion ===\n");

    // The schema was already resolved for extraction; reuse it for
    // value typing.
    let schema = match Schema::load(&tools.schema) {
        Ok(schema) => Some(schema),
        Err(e) => {
            eprintln!("Warning: failed to load schema: {}; using heuristic value typing", e);
            None
        }
    };

    let mut converted = 0;
    for file in &files {
        match convert_file(file, Some(dest), schema.as_ref(), options) {
            Ok(outcome) => {
                if schema.is_some() && !outcome.schema_typed {
                    eprintln!(
                        "  Warning: no schema match for {}, using heuristic value typing",
                        file.display()
                    );
                }
                let name = outcome
                    .output
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                println!("  {} ({} rows)", name, outcome.rows);
                converted += 1;
            }
            Err(e) => {
                eprintln!("  Warning: failed to convert {}: {}", file.display(), e);
            }
        }
    }

    if converted == 0 {
        bail!("No tables were converted");
    }
    println!("\nDone: {} Lua files written to {}", converted, dest.display());

    Ok(())
}
