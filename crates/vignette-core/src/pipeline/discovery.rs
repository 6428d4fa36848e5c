//! File discovery for finding photos in a directory tree.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::ProcessingConfig;

/// Discovers JPEG files under a root, skipping generated thumbnail folders.
pub struct FileDiscovery {
    config: ProcessingConfig,
    skip_dir: String,
}

/// Information about a discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// First file yielded from its directory
    pub new_directory: bool,
}

impl FileDiscovery {
    /// Create a discovery instance that never descends into `skip_dir`.
    pub fn new(config: ProcessingConfig, skip_dir: impl Into<String>) -> Self {
        Self {
            config,
            skip_dir: skip_dir.into(),
        }
    }

    /// Discover all supported files at a path.
    ///
    /// If path is a file, returns it if supported. If path is a directory,
    /// walks it recursively; files of a directory come before its
    /// subdirectories and everything is ordered by name, so each directory's
    /// files form one contiguous run.
    pub fn discover(&self, path: &Path) -> Vec<DiscoveredFile> {
        let Ok(root) = path.canonicalize() else {
            tracing::warn!("Cannot resolve {:?}", path);
            return vec![];
        };

        if root.is_file() {
            if self.is_supported(&root) {
                if let Ok(meta) = std::fs::metadata(&root) {
                    return vec![DiscoveredFile {
                        path: root,
                        size: meta.len(),
                        new_directory: true,
                    }];
                }
            }
            return vec![];
        }

        let mut files = Vec::new();
        let mut current_dir: Option<PathBuf> = None;

        let walker = WalkDir::new(&root)
            .follow_links(true)
            .sort_by(files_first_by_name)
            .into_iter()
            .filter_entry(|e| !self.is_skipped_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let entry_path = entry.path();
            if !entry.file_type().is_file() || !self.is_supported(entry_path) {
                continue;
            }
            let Ok(meta) = entry.metadata() else {
                continue;
            };

            let parent = entry_path.parent().map(Path::to_path_buf);
            let new_directory = parent != current_dir;
            if new_directory {
                current_dir = parent;
            }

            files.push(DiscoveredFile {
                path: entry_path.to_path_buf(),
                size: meta.len(),
                new_directory,
            });
        }

        files
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Generated thumbnail folders anywhere below the root are not scanned.
    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry.file_name() == self.skip_dir.as_str()
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}

fn files_first_by_name(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
