//! Joins ordered sources into one artifact and writes it to disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use preconcat_core::{ErrorCode, Node, SourceFile};

/// Concatenate the content of `order` with `separator` between files.
///
/// Nodes whose file is absent from `sources` contribute nothing; that only
/// happens when `sources` is not the set the graph was built from.
pub fn join(order: &[&Node], sources: &[SourceFile], separator: &str) -> String {
    let content: HashMap<&str, &str> = sources
        .iter()
        .map(|file| (file.path.as_str(), file.content.as_str()))
        .collect();

    order
        .iter()
        .filter_map(|node| content.get(node.file_path.as_str()).copied())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Write `content` to `dest`, creating parent directories.
///
/// # Errors
///
/// Fails with [`ErrorCode::ArtifactWriteFailed`] if a directory or the file
/// cannot be written.
pub fn write_artifact(dest: &Path, content: &str) -> Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))
            .context(ErrorCode::ArtifactWriteFailed)?;
    }
    fs::write(dest, content)
        .with_context(|| format!("failed to write {}", dest.display()))
        .context(ErrorCode::ArtifactWriteFailed)
}
