//! Per-file conversion driver: RPFM TSV in, Lua source out.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::lua::{emit_table, LuaOptions};
use crate::schema::Schema;
use crate::tsv::{TableExport, TsvError};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Tsv(#[from] TsvError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a single file conversion produced.
#[derive(Debug)]
pub struct ConvertOutcome {
    /// Path of the written `.lua` file.
    pub output: PathBuf,
    /// Number of data rows emitted.
    pub rows: usize,
    /// Whether schema-driven typing was applied. `false` means the
    /// heuristic fallback formatted the values.
    pub schema_typed: bool,
}

/// Convert one TSV file into a Lua file.
///
/// The output lands next to the source, or in `dest_dir` when given,
/// named after the source with a `.lua` extension.
pub fn convert_file(
    path: &Path,
    dest_dir: Option<&Path>,
    schema: Option<&Schema>,
    options: &LuaOptions,
) -> Result<ConvertOutcome, ConvertError> {
    let export = TableExport::from_file(path)?;

    let kinds = schema
        .and_then(|s| s.column_kinds(&export.table_name, export.version, &export.columns));

    let lua = emit_table(&export, kinds.as_deref(), options);

    let output = output_path(path, dest_dir);
    fs::write(&output, lua).map_err(|source| ConvertError::Write {
        path: output.clone(),
        source,
    })?;

    Ok(ConvertOutcome {
        output,
        rows: export.rows.len(),
        schema_typed: kinds.is_some(),
    })
}

fn output_path(source: &Path, dest_dir: Option<&Path>) -> PathBuf {
    let dir = match dest_dir {
        Some(dir) => dir.to_path_buf(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let mut output = dir.join(source.file_name().unwrap_or_default());
    output.set_extension("lua");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "key\tcount\n#units_tables;2;\nspearmen\t120\n";

    #[test]
    fn test_convert_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("units.tsv");
        fs::write(&source, SAMPLE).unwrap();

        let outcome = convert_file(&source, None, None, &LuaOptions::default()).unwrap();
        assert_eq!(outcome.output, dir.path().join("units.lua"));
        assert_eq!(outcome.rows, 1);
        assert!(!outcome.schema_typed);

        let lua = fs::read_to_string(&outcome.output).unwrap();
        assert!(lua.contains("[=[spearmen]=]"));
    }

    #[test]
    fn test_convert_into_dest_dir() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        let source = dir.path().join("units.tsv");
        fs::write(&source, SAMPLE).unwrap();

        let options = LuaOptions {
            add_return: true,
            ..Default::default()
        };
        let outcome = convert_file(&source, Some(&dest), None, &options).unwrap();
        assert_eq!(outcome.output, dest.join("units.lua"));

        let lua = fs::read_to_string(&outcome.output).unwrap();
        assert!(lua.starts_with("return {"));
    }

    #[test]
    fn test_convert_with_schema_typing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("units.tsv");
        fs::write(&source, SAMPLE).unwrap();

        let schema: Schema = ron::from_str(
            r#"(
    definitions: {
        "units_tables": [
            (
                version: 2,
                fields: [
                    ( name: "key", field_type: StringU8 ),
                    ( name: "count", field_type: I32 ),
                ],
            ),
        ],
    },
)"#,
        )
        .unwrap();

        let outcome =
            convert_file(&source, None, Some(&schema), &LuaOptions::default()).unwrap();
        assert!(outcome.schema_typed);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.tsv");
        fs::write(&source, "key\tcount\n#units_tables;2;\nonly_one_cell\n").unwrap();

        let err = convert_file(&source, None, None, &LuaOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Tsv(_)));
    }
}
