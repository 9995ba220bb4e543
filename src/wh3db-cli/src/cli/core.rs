//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::rpfm::normalize_table_name;

#[derive(Parser)]
#[command(name = "wh3db")]
#[command(about = "WARHAMMER 3 database table exporter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract tables with RPFM and convert them to Lua in one pass
    #[command(visible_alias = "e")]
    Export {
        /// Table to export (can be given multiple times)
        #[arg(short, long = "table", value_name = "TABLE", required = true, value_parser = normalize_table_name)]
        tables: Vec<String>,

        /// Path to the RPFM installation directory (uses configured default if not provided)
        #[arg(short, long, env = "WH3_RPFM_DIR")]
        rpfm: Option<PathBuf>,

        /// Destination directory for the Lua files
        #[arg(short, long)]
        dest: PathBuf,

        /// Game data directory containing data.pack (auto-detected if not provided)
        #[arg(long)]
        game_data: Option<PathBuf>,

        /// Path to RPFM's schema_wh3.ron (uses RPFM's config location if not provided)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Key rows by column name instead of 1-based position
        #[arg(long)]
        map_columns: bool,

        /// Add a `return` statement so the files can be `require`d
        #[arg(long)]
        add_return: bool,

        /// Wrap rows in a checksum envelope (changes the output structure)
        #[arg(long)]
        checksum: bool,
    },

    /// Extract tables with RPFM, leaving the TSV files in place
    #[command(visible_alias = "x")]
    Extract {
        /// Table to extract (can be given multiple times)
        #[arg(short, long = "table", value_name = "TABLE", required = true, value_parser = normalize_table_name)]
        tables: Vec<String>,

        /// Path to the RPFM installation directory (uses configured default if not provided)
        #[arg(short, long, env = "WH3_RPFM_DIR")]
        rpfm: Option<PathBuf>,

        /// Destination directory for the TSV files
        #[arg(short, long)]
        dest: PathBuf,

        /// Game data directory containing data.pack (auto-detected if not provided)
        #[arg(long)]
        game_data: Option<PathBuf>,

        /// Path to RPFM's schema_wh3.ron (uses RPFM's config location if not provided)
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// Convert existing RPFM TSV files to Lua
    #[command(visible_alias = "c")]
    Convert {
        /// Path to a .tsv file to convert (can be given multiple times)
        #[arg(short, long = "file", value_name = "PATH")]
        files: Vec<PathBuf>,

        /// Convert every .tsv file under a directory (recursive)
        #[arg(
            short = 'D',
            long,
            value_name = "PATH",
            conflicts_with = "files",
            required_unless_present = "files"
        )]
        directory: Option<PathBuf>,

        /// Write the Lua files somewhere else (default: next to the sources)
        #[arg(long, value_name = "PATH", conflicts_with = "replace")]
        dest: Option<PathBuf>,

        /// Delete each source .tsv after a successful conversion
        #[arg(long)]
        replace: bool,

        /// Path to RPFM's schema_wh3.ron (uses RPFM's config location if not provided)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Key rows by column name instead of 1-based position
        #[arg(long)]
        map_columns: bool,

        /// Add a `return` statement so the files can be `require`d
        #[arg(long)]
        add_return: bool,

        /// Wrap rows in a checksum envelope (changes the output structure)
        #[arg(long)]
        checksum: bool,
    },

    /// Configure default settings
    Configure {
        /// Set the default RPFM installation directory
        #[arg(long, value_name = "PATH")]
        rpfm_path: Option<PathBuf>,

        /// Set the default game data directory
        #[arg(long, value_name = "PATH")]
        game_data: Option<PathBuf>,

        /// Set the default schema file
        #[arg(long, value_name = "PATH")]
        schema: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
