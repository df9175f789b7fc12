use colplot_common::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Parquet,
    Csv,
    /// Tab-separated text, read like CSV with a tab delimiter.
    Tsv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("parquet") | Some("pq") => Some(Self::Parquet),
            Some("csv") => Some(Self::Csv),
            Some("tsv") => Some(Self::Tsv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePath {
    pub path: PathBuf,
    pub format: SourceFormat,
}

impl SourcePath {
    fn from_path(path: PathBuf) -> Option<Self> {
        let format = SourceFormat::from_path(&path)?;
        Some(Self { path, format })
    }
}

pub fn scan_directory(base: &Path) -> Result<Vec<SourcePath>> {
    let mut results = Vec::new();
    scan_recursive(base, &mut results)?;
    results.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(results)
}

fn scan_recursive(dir: &Path, out: &mut Vec<SourcePath>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_recursive(&path, out)?;
        } else if let Some(sp) = SourcePath::from_path(path) {
            out.push(sp);
        }
    }
    Ok(())
}

/// resolve a path string: single file, directory (recursive), or glob pattern
pub fn resolve_paths(input: &str) -> Result<Vec<SourcePath>> {
    let path = Path::new(input);
    if path.is_file() {
        return Ok(SourcePath::from_path(path.to_path_buf()).into_iter().collect());
    }
    if path.is_dir() {
        return scan_directory(path);
    }
    let mut results = Vec::new();
    if let Ok(entries) = glob::glob(input) {
        for entry in entries.flatten() {
            if entry.is_file() {
                results.extend(SourcePath::from_path(entry));
            }
        }
    }
    Ok(results)
}
