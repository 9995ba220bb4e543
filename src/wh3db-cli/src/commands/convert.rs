//! Convert command handler
//!
//! Converts RPFM TSV exports into Lua table files. A failing file is
//! reported and skipped; the batch only fails when nothing converts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use wh3db::convert::convert_file;
use wh3db::{LuaOptions, Schema};

use crate::config::Config;
use crate::file_utils;

/// Handle the convert command
pub fn handle(
    files: &[PathBuf],
    directory: Option<&Path>,
    dest: Option<&Path>,
    replace: bool,
    schema_path: Option<&Path>,
    options: &LuaOptions,
) -> Result<()> {
    let files = gather_inputs(files, directory)?;
    if files.is_empty() {
        bail!("No .tsv files to convert");
    }

    if let Some(dest) = dest {
        fs::create_dir_all(dest)
            .with_context(|| format!("Failed to create destination directory {}", dest.display()))?;
    }

    let schema = load_schema(schema_path);

    println!("Files to convert:");
    for file in &files {
        println!("  {}", file.display());
    }

    let mut converted = 0;
    for file in &files {
        match convert_file(file, dest, schema.as_ref(), options) {
            Ok(outcome) => {
                if schema.is_some() && !outcome.schema_typed {
                    eprintln!(
                        "  Warning: no schema match for {}, using heuristic value typing",
                        file.display()
                    );
                }
                println!("  {} -> {} ({} rows)", file.display(), outcome.output.display(), outcome.rows);

                if replace {
                    fs::remove_file(file)
                        .with_context(|| format!("Failed to remove source {}", file.display()))?;
                }
                converted += 1;
            }
            Err(e) => {
                eprintln!("  Warning: failed to convert {}: {}", file.display(), e);
            }
        }
    }

    if converted == 0 {
        bail!("No files were converted");
    }
    println!("Converted {}/{} files", converted, files.len());

    Ok(())
}

/// Resolve the input list: explicit files are validated, a directory is
/// walked recursively.
fn gather_inputs(files: &[PathBuf], directory: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        for file in files {
            let is_tsv = file
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("tsv"))
                .unwrap_or(false);
            if !is_tsv {
                bail!("Not a .tsv file: {}", file.display());
            }
            if !file.exists() {
                bail!("Not found: {}", file.display());
            }
        }
        return Ok(files.to_vec());
    }

    let directory = directory.context("Either --file or --directory is required")?;
    if !directory.is_dir() {
        bail!("Not a directory: {}", directory.display());
    }

    file_utils::collect_tsv_files(directory)
}

/// Load the schema used for value typing, if one can be found.
///
/// Resolution order: explicit flag, configured default, RPFM's config
/// location. Any failure degrades to heuristic typing with a notice.
fn load_schema(explicit: Option<&Path>) -> Option<Schema> {
    let configured = Config::load().ok().and_then(|c| c.schema_path);

    let path = match explicit
        .map(Path::to_path_buf)
        .or(configured)
        .or_else(Schema::default_path)
    {
        Some(path) => path,
        None => {
            eprintln!("Warning: could not determine the schema location; using heuristic value typing");
            return None;
        }
    };

    if !path.exists() {
        eprintln!(
            "Warning: no schema at {}; using heuristic value typing (may be inaccurate)",
            path.display()
        );
        return None;
    }

    match Schema::load(&path) {
        Ok(schema) => Some(schema),
        Err(e) => {
            eprintln!("Warning: failed to load schema: {}; using heuristic value typing", e);
            None
        }
    }
}
