//! Local filesystem backend for the [`Gateway`] trait.
//!
//! Browsing walks the directory on a blocking worker, applying the stored
//! exclusion rules; line counting and content fetches decode lossily so a
//! stray non-UTF-8 file cannot fail a whole bundle. Custom instructions and
//! exclusion rules persist as small JSON stores under the data directory.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::BoxFuture;
use crate::gateway::types::{
    BrowseResponse, ContextFile, ContextResponse, ExclusionRules, FileEntry, InstructionsResponse,
    LineCountResponse, SavedResponse,
};
use crate::gateway::{Gateway, GatewayError};
use crate::tree::build_tree;

const INSTRUCTIONS_STORE: &str = "custom_instructions.json";
const EXCLUSIONS_STORE: &str = "exclusions.json";

/// Gateway backed by the local filesystem.
pub struct LocalGateway {
    data_dir: PathBuf,
    follow_symlinks: bool,
}

impl LocalGateway {
    /// A gateway persisting its stores under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            follow_symlinks: false,
        }
    }

    /// Whether browse walks follow symbolic links (off by default).
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    fn instructions_path(&self) -> PathBuf {
        self.data_dir.join(INSTRUCTIONS_STORE)
    }

    fn exclusions_path(&self) -> PathBuf {
        self.data_dir.join(EXCLUSIONS_STORE)
    }

    async fn read_store<T: DeserializeOwned + Default>(path: PathBuf) -> Result<T, GatewayError> {
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| GatewayError::Store {
                path,
                reason: err.to_string(),
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(T::default()),
            Err(source) => Err(GatewayError::Io { path, source }),
        }
    }

    async fn write_store<T: Serialize>(&self, path: PathBuf, value: &T) -> Result<(), GatewayError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| GatewayError::Io {
                path: self.data_dir.clone(),
                source,
            })?;
        let json = serde_json::to_vec_pretty(value).map_err(|err| GatewayError::Store {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| GatewayError::Io { path, source })
    }
}

impl Gateway for LocalGateway {
    fn browse_directory(
        &self,
        directory: PathBuf,
    ) -> BoxFuture<'_, Result<BrowseResponse, GatewayError>> {
        Box::pin(async move {
            match tokio::fs::metadata(&directory).await {
                Ok(metadata) if metadata.is_dir() => {}
                _ => return Err(GatewayError::MissingDirectory(directory)),
            }

            let rules: ExclusionRules = Self::read_store(self.exclusions_path()).await?;
            let filter = ExclusionFilter::new(&rules);
            let follow = self.follow_symlinks;
            let root = directory.clone();
            let files =
                tokio::task::spawn_blocking(move || walk_directory(&root, &filter, follow))
                    .await
                    .map_err(|err| GatewayError::Task(err.to_string()))?;

            let tree = build_tree(&files);
            info!(
                directory = %directory.display(),
                files = files.len(),
                "browsed directory"
            );
            Ok(BrowseResponse { files, tree })
        })
    }

    fn line_count(
        &self,
        file: PathBuf,
        directory: PathBuf,
    ) -> BoxFuture<'_, Result<LineCountResponse, GatewayError>> {
        Box::pin(async move {
            let root = tokio::fs::canonicalize(&directory)
                .await
                .map_err(|_| GatewayError::MissingDirectory(directory))?;
            let canonical = tokio::fs::canonicalize(&file)
                .await
                .map_err(|_| GatewayError::MissingFile(file.clone()))?;
            if !canonical.starts_with(&root) {
                return Err(GatewayError::OutsideRoot(file));
            }

            let bytes = tokio::fs::read(&canonical)
                .await
                .map_err(|source| GatewayError::Io { path: file, source })?;
            let line_count = String::from_utf8_lossy(&bytes).lines().count() as u64;
            Ok(LineCountResponse { line_count })
        })
    }

    fn context(
        &self,
        files: Vec<PathBuf>,
        directory: PathBuf,
    ) -> BoxFuture<'_, Result<ContextResponse, GatewayError>> {
        Box::pin(async move {
            let mut collected = Vec::new();
            let mut skipped = 0usize;
            for path in &files {
                let display = display_path(path, &directory);
                match tokio::fs::read(path).await {
                    Ok(bytes) => collected.push(ContextFile {
                        path: display,
                        content: String::from_utf8_lossy(&bytes).into_owned(),
                    }),
                    Err(err) if err.kind() == ErrorKind::NotFound => {
                        debug!(path = %path.display(), "skipping missing file");
                        skipped += 1;
                    }
                    Err(err) => collected.push(ContextFile {
                        content: format!("Error: Could not read file {display}: {err}"),
                        path: display,
                    }),
                }
            }
            let error = (skipped > 0).then(|| format!("{skipped} file(s) could not be found"));
            Ok(ContextResponse {
                files: collected,
                error,
            })
        })
    }

    fn custom_instructions(&self) -> BoxFuture<'_, Result<InstructionsResponse, GatewayError>> {
        Box::pin(async move { Self::read_store(self.instructions_path()).await })
    }

    fn save_custom_instructions(
        &self,
        text: String,
    ) -> BoxFuture<'_, Result<SavedResponse, GatewayError>> {
        Box::pin(async move {
            let store = InstructionsResponse { instructions: text };
            self.write_store(self.instructions_path(), &store).await?;
            Ok(SavedResponse {
                message: "Custom instructions saved successfully!".to_string(),
            })
        })
    }

    fn exclusions(&self) -> BoxFuture<'_, Result<ExclusionRules, GatewayError>> {
        Box::pin(async move { Self::read_store(self.exclusions_path()).await })
    }

    fn save_exclusions(
        &self,
        rules: ExclusionRules,
    ) -> BoxFuture<'_, Result<SavedResponse, GatewayError>> {
        Box::pin(async move {
            self.write_store(self.exclusions_path(), &rules).await?;
            Ok(SavedResponse {
                message: "Exclusions updated successfully.".to_string(),
            })
        })
    }
}

/// Compiled exclusion rules.
///
/// Directory names prune whole subtrees, file names match exactly, and
/// patterns are globs matched against file names. Unparseable patterns are
/// skipped with a warning rather than failing the browse.
pub struct ExclusionFilter {
    dirs: HashSet<String>,
    files: HashSet<String>,
    patterns: GlobSet,
}

impl ExclusionFilter {
    pub fn new(rules: &ExclusionRules) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in &rules.exclude_patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => warn!(%pattern, %err, "skipping unparseable exclusion pattern"),
            }
        }
        let patterns = builder.build().unwrap_or_else(|err| {
            warn!(%err, "exclusion patterns failed to compile, ignoring them");
            GlobSet::empty()
        });
        Self {
            dirs: rules.exclude_dirs.iter().cloned().collect(),
            files: rules.exclude_files.iter().cloned().collect(),
            patterns,
        }
    }

    pub fn skip_dir(&self, name: &str) -> bool {
        self.dirs.contains(name)
    }

    pub fn skip_file(&self, name: &str) -> bool {
        self.files.contains(name) || self.patterns.is_match(name)
    }
}

fn walk_directory(root: &Path, filter: &ExclusionFilter, follow_symlinks: bool) -> Vec<FileEntry> {
    let walker = WalkDir::new(root)
        .follow_links(follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            !filter.skip_dir(&entry.file_name().to_string_lossy())
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(%err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if filter.skip_file(&name) {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                debug!(path = %entry.path().display(), %err, "skipping unstatable file");
                continue;
            }
        };
        let relative_path = match entry.path().strip_prefix(root) {
            Ok(relative) => join_forward_slashes(relative),
            Err(_) => continue,
        };
        files.push(FileEntry {
            name,
            path: entry.path().to_path_buf(),
            relative_path,
            size_bytes: metadata.len(),
        });
    }
    files.sort_by_key(|file| file.relative_path.to_lowercase());
    files
}

/// Display path for a context entry: relative to the root where possible,
/// otherwise just the base name.
fn display_path(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => join_forward_slashes(relative),
        Err(_) => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    }
}

fn join_forward_slashes(path: &Path) -> String {
    path.iter()
        .map(|component| component.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
