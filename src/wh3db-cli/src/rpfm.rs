//! RPFM CLI invocation and dependency discovery.
//!
//! Extraction shells out to `rpfm_cli` from the RPFM installation
//! directory. The pack path, schema path, and CLI binary are resolved
//! up front so a missing piece fails before anything runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::config::Config;

#[cfg(windows)]
const RPFM_CLI_EXE: &str = "rpfm_cli.exe";
#[cfg(not(windows))]
const RPFM_CLI_EXE: &str = "rpfm_cli";

/// Resolved paths the extraction stage depends on.
#[derive(Debug)]
pub struct RpfmTools {
    /// The `rpfm_cli` executable.
    pub cli: PathBuf,
    /// RPFM's `schema_wh3.ron`, passed via `--tables-as-tsv`.
    pub schema: PathBuf,
    /// The game's `data.pack`.
    pub pack: PathBuf,
}

impl RpfmTools {
    /// Resolve all external dependencies, preferring explicit flags over
    /// stored configuration over platform defaults.
    pub fn resolve(
        rpfm_dir: Option<&Path>,
        game_data: Option<&Path>,
        schema: Option<&Path>,
        config: &Config,
    ) -> Result<Self> {
        let rpfm_dir = rpfm_dir
            .or_else(|| config.get_rpfm_path())
            .context("No RPFM path given; pass --rpfm or run `wh3db configure --rpfm-path <dir>`")?;

        let cli = rpfm_dir.join(RPFM_CLI_EXE);
        if !cli.exists() {
            bail!(
                "Failed to find {}. Expected it here: {}",
                RPFM_CLI_EXE,
                cli.display()
            );
        }

        let data_dir = match game_data.or_else(|| config.get_game_data_dir()) {
            Some(dir) => dir.to_path_buf(),
            None => default_game_data_dir().context(
                "Failed to locate the WH3 data directory; pass --game-data or run \
                 `wh3db configure --game-data <dir>`",
            )?,
        };
        let pack = data_dir.join("data.pack");
        if !pack.exists() {
            bail!(
                "Failed to find data.pack inside the game data directory: {}",
                pack.display()
            );
        }

        let schema = match schema.or_else(|| config.get_schema_path()) {
            Some(path) => path.to_path_buf(),
            None => wh3db::Schema::default_path()
                .context("Could not determine config directory")?,
        };
        if !schema.exists() {
            bail!(
                "Failed to find the WH3 schema. Expected it here: {}\n\
                 Run RPFM once to download schemas, or pass --schema",
                schema.display()
            );
        }

        Ok(RpfmTools { cli, schema, pack })
    }
}

/// Locate the game data directory.
///
/// Checks the `WH3_DATA_DIR` environment variable first, then falls
/// back to platform-specific default Steam installation paths.
pub fn default_game_data_dir() -> Option<PathBuf> {
    // Check environment variable first
    if let Ok(dir) = std::env::var("WH3_DATA_DIR") {
        let path = PathBuf::from(dir);
        if path.exists() {
            return Some(path);
        }
    }

    // Platform-specific defaults
    #[cfg(target_os = "windows")]
    let default = PathBuf::from(
        r"C:\Program Files (x86)\Steam\steamapps\common\Total War WARHAMMER III\data",
    );

    #[cfg(target_os = "linux")]
    let default = dirs::home_dir()
        .map(|h| h.join(".local/share/Steam/steamapps/common/Total War WARHAMMER III/data"))
        .unwrap_or_default();

    #[cfg(target_os = "macos")]
    let default = dirs::home_dir()
        .map(|h| {
            h.join("Library/Application Support/Steam/steamapps/common/Total War WARHAMMER III/data")
        })
        .unwrap_or_default();

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    let default = PathBuf::new();

    if default.exists() {
        Some(default)
    } else {
        None
    }
}

/// Strip the decorations users copy along with table names: `db/`
/// prefixes and `_tables` / `data__` suffixes.
pub fn normalize_table_name(value: &str) -> Result<String, String> {
    let mut name = value;
    name = name.strip_prefix("db").unwrap_or(name);
    name = name.strip_prefix('/').unwrap_or(name);
    name = name.strip_suffix("data__").unwrap_or(name);
    name = name.strip_suffix('/').unwrap_or(name);
    name = name.strip_suffix("_tables").unwrap_or(name);

    if name.is_empty() {
        return Err(format!("cannot normalize table name: \"{}\"", value));
    }

    Ok(name.to_string())
}

/// Run `rpfm_cli pack extract` for the given tables and collect the
/// exported TSV files into `dest` as `<table>.tsv`.
///
/// RPFM writes each table as `db/<table>_tables/data__.tsv` under the
/// target directory, so extraction goes through a scratch directory and
/// the harvest pass flattens the tree.
pub fn extract_tables(tools: &RpfmTools, tables: &[String], dest: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create destination directory {}", dest.display()))?;

    let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;

    let mut cmd = Command::new(&tools.cli);
    cmd.args(["--game", "warhammer_3", "pack", "extract"])
        .arg("--pack-path")
        .arg(&tools.pack)
        .arg("--tables-as-tsv")
        .arg(&tools.schema);
    for table in tables {
        cmd.arg("--file-path")
            .arg(format!("db/{}_tables/data__;{}", table, scratch.path().display()));
    }

    let status = cmd
        .status()
        .with_context(|| format!("Failed to run {}", tools.cli.display()))?;
    if !status.success() {
        bail!("rpfm_cli exited with status: {}", status);
    }

    harvest_tsv_files(scratch.path(), dest)
}

/// Move every `.tsv` under `scratch` into `dest`, renaming
/// `<table>_tables/data__.tsv` to `<table>.tsv`.
fn harvest_tsv_files(scratch: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(scratch)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);
        if !is_tsv {
            continue;
        }

        let table_dir = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .with_context(|| format!("Unexpected export layout for {}", path.display()))?;
        let table = table_dir.strip_suffix("_tables").unwrap_or(table_dir);

        let target = dest.join(format!("{}.tsv", table));
        // Plain copy: the scratch directory may live on another
        // filesystem, where a rename would fail.
        fs::copy(path, &target)
            .with_context(|| format!("Failed to move {} to {}", path.display(), target.display()))?;
        files.push(target);
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_table_name() {
        assert_eq!(normalize_table_name("land_units").unwrap(), "land_units");
        assert_eq!(normalize_table_name("land_units_tables").unwrap(), "land_units");
        assert_eq!(
            normalize_table_name("db/land_units_tables/data__").unwrap(),
            "land_units"
        );
        assert_eq!(normalize_table_name("db/land_units_tables/").unwrap(), "land_units");
    }

    #[test]
    fn test_normalize_table_name_rejects_empty() {
        assert!(normalize_table_name("db/_tables").is_err());
        assert!(normalize_table_name("").is_err());
    }

    #[test]
    fn test_resolve_requires_rpfm_dir() {
        let err = RpfmTools::resolve(None, None, None, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("--rpfm"));
    }

    #[test]
    fn test_resolve_missing_cli_binary() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            RpfmTools::resolve(Some(dir.path()), None, None, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("rpfm_cli"));
    }

    #[test]
    fn test_resolve_missing_pack() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(RPFM_CLI_EXE), "").unwrap();
        let game_data = dir.path().join("data");
        fs::create_dir(&game_data).unwrap();

        let err = RpfmTools::resolve(
            Some(dir.path()),
            Some(&game_data),
            None,
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("data.pack"));
    }

    #[test]
    fn test_harvest_flattens_and_renames() {
        let scratch = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let table_dir = scratch.path().join("db/land_units_tables");
        fs::create_dir_all(&table_dir).unwrap();
        fs::write(table_dir.join("data__.tsv"), "key\n#land_units_tables;1;\n").unwrap();
        fs::write(table_dir.join("notes.txt"), "ignored").unwrap();

        let files = harvest_tsv_files(scratch.path(), dest.path()).unwrap();
        assert_eq!(files, vec![dest.path().join("land_units.tsv")]);
        assert!(files[0].exists());
    }
}
