//! File system helpers for TSV discovery

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Collect every `.tsv` file under a directory tree, sorted for a
/// stable conversion order.
pub fn collect_tsv_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_path = entry.path();

        let matches = file_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);

        if matches {
            files.push(file_path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_tsv_files_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("db/units");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("a.tsv"), "").unwrap();
        fs::write(nested.join("b.TSV"), "").unwrap();
        fs::write(nested.join("c.lua"), "").unwrap();

        let files = collect_tsv_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.tsv"), nested.join("b.TSV")]
        );
    }

    #[test]
    fn test_collect_tsv_files_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_tsv_files(dir.path()).unwrap().is_empty());
    }
}
