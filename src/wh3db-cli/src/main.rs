mod cli;
mod commands;
mod config;
mod file_utils;
mod rpfm;

use anyhow::Result;
use clap::Parser;

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            tables,
            rpfm,
            dest,
            game_data,
            schema,
            map_columns,
            add_return,
            checksum,
        } => {
            let options = wh3db::LuaOptions {
                map_columns,
                add_return,
                checksum,
            };
            commands::export::handle(
                &tables,
                rpfm.as_deref(),
                &dest,
                game_data.as_deref(),
                schema.as_deref(),
                &options,
            )?;
        }

        Commands::Extract {
            tables,
            rpfm,
            dest,
            game_data,
            schema,
        } => {
            commands::extract::handle(
                &tables,
                rpfm.as_deref(),
                &dest,
                game_data.as_deref(),
                schema.as_deref(),
            )?;
        }

        Commands::Convert {
            files,
            directory,
            dest,
            replace,
            schema,
            map_columns,
            add_return,
            checksum,
        } => {
            let options = wh3db::LuaOptions {
                map_columns,
                add_return,
                checksum,
            };
            commands::convert::handle(
                &files,
                directory.as_deref(),
                dest.as_deref(),
                replace,
                schema.as_deref(),
                &options,
            )?;
        }

        Commands::Configure {
            rpfm_path,
            game_data,
            schema,
            show,
        } => {
            commands::configure::handle(rpfm_path, game_data, schema, show)?;
        }
    }

    Ok(())
}
