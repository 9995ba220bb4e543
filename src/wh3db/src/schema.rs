//! RPFM schema loading and per-column value typing.
//!
//! RPFM ships a RON schema per game (`schema_wh3.ron`) describing every
//! known DB table: a map of table name to versioned definitions, each
//! listing the table's fields and their storage types. The schema tells
//! the converter which columns are safe to emit as bare Lua numbers and
//! booleans; everything else stays a string.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// How a column's cells are written into the Lua literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Bare `true` / `false`.
    Boolean,
    /// Bare number, shortest representation.
    Number,
    /// Long-bracket string.
    Text,
}

/// Storage types RPFM assigns to DB table fields.
///
/// Sequence variants nest a full definition; they carry no Lua mapping
/// and force heuristic typing for the whole table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum FieldType {
    Boolean,
    ColourRGB,
    F32,
    F64,
    I16,
    I32,
    I64,
    OptionalI16,
    OptionalI32,
    OptionalI64,
    OptionalStringU8,
    OptionalStringU16,
    StringU8,
    StringU16,
    SequenceU16(Box<Definition>),
    SequenceU32(Box<Definition>),
}

impl FieldType {
    /// Lua emission for this field type, or `None` when the type has no
    /// defined mapping.
    ///
    /// 64-bit values would lose precision as Lua numbers, so they are
    /// kept textual.
    fn value_kind(&self) -> Option<ValueKind> {
        match self {
            FieldType::Boolean => Some(ValueKind::Boolean),
            FieldType::F32 | FieldType::I32 => Some(ValueKind::Number),
            FieldType::F64 | FieldType::I64 => Some(ValueKind::Text),
            FieldType::ColourRGB
            | FieldType::StringU8
            | FieldType::StringU16
            | FieldType::OptionalStringU8 => Some(ValueKind::Text),
            _ => None,
        }
    }
}

/// One versioned table definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Definition {
    pub version: u32,
    pub fields: Vec<Field>,
}

/// A single field of a table definition. The schema carries many more
/// attributes per field (key flags, references, descriptions); only the
/// ones the converter needs are modeled, the rest are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
}

/// An RPFM game schema: table name to known definitions.
#[derive(Debug, Deserialize)]
pub struct Schema {
    definitions: BTreeMap<String, Vec<Definition>>,
}

impl Schema {
    /// Load a schema from a RON file.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(ron::from_str(&contents)?)
    }

    /// Default location of the WH3 schema inside RPFM's config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rpfm/config/schemas/schema_wh3.ron"))
    }

    /// Resolve the per-column value kinds for one exported table,
    /// aligned with `columns`.
    ///
    /// Returns `None` when schema typing is unavailable for this file:
    /// unknown table, missing version, a field type without a Lua
    /// mapping, or an exported column the definition does not name. The
    /// caller then falls back to heuristic typing.
    pub fn column_kinds(
        &self,
        table_name: &str,
        version: u32,
        columns: &[String],
    ) -> Option<Vec<ValueKind>> {
        let definition = self
            .definitions
            .get(table_name)?
            .iter()
            .find(|def| def.version == version)?;

        let mut by_name: BTreeMap<&str, ValueKind> = BTreeMap::new();
        for field in &definition.fields {
            by_name.insert(field.name.as_str(), field.field_type.value_kind()?);
        }

        columns
            .iter()
            .map(|column| by_name.get(column.as_str()).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SCHEMA: &str = r#"(
    version: 4,
    definitions: {
        "units_tables": [
            (
                version: 2,
                fields: [
                    ( name: "key", field_type: StringU8, is_key: true, description: "" ),
                    ( name: "count", field_type: I32, is_key: false ),
                    ( name: "enabled", field_type: Boolean ),
                ],
                localised_fields: [],
            ),
        ],
        "costs_tables": [
            (
                version: 1,
                fields: [
                    ( name: "key", field_type: StringU8 ),
                    ( name: "modifier", field_type: OptionalI32 ),
                ],
            ),
        ],
    },
)"#;

    fn sample() -> Schema {
        ron::from_str(SAMPLE_SCHEMA).unwrap()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_parse_ignores_unknown_attributes() {
        let schema = sample();
        assert_eq!(schema.definitions.len(), 2);
        assert_eq!(schema.definitions["units_tables"][0].fields.len(), 3);
    }

    #[test]
    fn test_column_kinds_matches_definition() {
        let kinds = sample()
            .column_kinds("units_tables", 2, &cols(&["key", "count", "enabled"]))
            .unwrap();
        assert_eq!(
            kinds,
            vec![ValueKind::Text, ValueKind::Number, ValueKind::Boolean]
        );
    }

    #[test]
    fn test_column_kinds_follows_export_order() {
        let kinds = sample()
            .column_kinds("units_tables", 2, &cols(&["count", "key"]))
            .unwrap();
        assert_eq!(kinds, vec![ValueKind::Number, ValueKind::Text]);
    }

    #[test]
    fn test_unknown_table_falls_back() {
        assert!(sample().column_kinds("missing_tables", 1, &cols(&["key"])).is_none());
    }

    #[test]
    fn test_version_mismatch_falls_back() {
        assert!(sample()
            .column_kinds("units_tables", 9, &cols(&["key", "count", "enabled"]))
            .is_none());
    }

    #[test]
    fn test_unmapped_field_type_falls_back() {
        // OptionalI32 has no Lua mapping, so the whole table drops to
        // heuristic typing.
        assert!(sample()
            .column_kinds("costs_tables", 1, &cols(&["key", "modifier"]))
            .is_none());
    }

    #[test]
    fn test_unknown_column_falls_back() {
        assert!(sample()
            .column_kinds("units_tables", 2, &cols(&["key", "renamed"]))
            .is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Schema::load(Path::new("/nonexistent/schema_wh3.ron")).unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }

    #[test]
    fn test_sequence_field_type_parses() {
        let schema: Schema = ron::from_str(
            r#"(
    definitions: {
        "nested_tables": [
            (
                version: 0,
                fields: [
                    ( name: "seq", field_type: SequenceU32((version: 0, fields: [])) ),
                ],
            ),
        ],
    },
)"#,
        )
        .unwrap();

        assert!(schema
            .column_kinds("nested_tables", 0, &cols(&["seq"]))
            .is_none());
    }
}
