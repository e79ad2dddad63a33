//! Document source: loads a directory of plain-text files into a corpus.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Corpus;

const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Load every `.txt`/`.md` file directly under `dir` into a corpus keyed by
/// file name. Files are visited in sorted order; the corpus map preserves
/// that order on iteration.
pub fn load_text_files(dir: &Path) -> Result<Corpus> {
    let mut docs = Corpus::new();
    for path in list_text_files(dir) {
        let content = std::fs::read_to_string(&path)
            .or_else(|_| std::fs::read(&path).map(|b| String::from_utf8_lossy(&b).to_string()))
            .map_err(|e| Error::NotFound(format!("{}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        docs.insert(name, content);
    }
    if docs.is_empty() {
        return Err(Error::NotFound(format!(
            "No .txt/.md files found in folder: {}",
            dir.display()
        )));
    }
    Ok(docs)
}

fn list_text_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        if TEXT_EXTENSIONS.contains(&ext) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}
