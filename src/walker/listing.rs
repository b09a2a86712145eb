//! Directory enumeration
//!
//! Immediate children only, in whatever order the filesystem yields them.
//! A directory that fails to enumerate is logged and listed as empty.

use std::path::Path;

use tokio::fs;

use crate::logger;

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    /// Byte length; always 0 for directories
    pub size: u64,
}

/// List the immediate children of `dir`
pub async fn list_directory(dir: &Path) -> Vec<DirEntry> {
    match read_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {}",
                dir.display(),
                e
            ));
            Vec::new()
        }
    }
}

async fn read_entries(dir: &Path) -> std::io::Result<Vec<DirEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();

        // Follow symlinks so a link to a directory lists as a directory.
        // A dangling link lists as an empty file.
        let (is_dir, size) = match fs::metadata(entry.path()).await {
            Ok(m) if m.is_dir() => (true, 0),
            Ok(m) => (false, m.len()),
            Err(_) => (false, 0),
        };

        entries.push(DirEntry { name, is_dir, size });
    }

    Ok(entries)
}
