//! # wh3db
//!
//! Total War: WARHAMMER 3 database export library.
//!
//! This library provides functionality to:
//! - Parse DB table exports in RPFM's TSV format
//! - Load RPFM's RON schema for per-column value typing
//! - Emit tables as Lua table literals, ready for `require`
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use wh3db::{convert_file, LuaOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = LuaOptions {
//!     map_columns: true,
//!     add_return: true,
//!     ..Default::default()
//! };
//!
//! let outcome = convert_file(Path::new("land_units.tsv"), None, None, &options)?;
//! println!("{} rows -> {}", outcome.rows, outcome.output.display());
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod lua;
pub mod schema;
pub mod tsv;

// Re-export commonly used items
#[doc(inline)]
pub use convert::{convert_file, ConvertError, ConvertOutcome};
#[doc(inline)]
pub use lua::{emit_table, LuaOptions};
#[doc(inline)]
pub use schema::{Schema, SchemaError, ValueKind};
#[doc(inline)]
pub use tsv::{TableExport, TsvError};
