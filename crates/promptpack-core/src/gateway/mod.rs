//! Gateway to the browsed project.
//!
//! Every piece of data the frontends consume (the file listing, per-file
//! line counts, file contents, the custom-instructions text, and the
//! exclusion rules) arrives through the [`Gateway`] trait. The trait is
//! object-safe so the TUI and CLI can hold an `Arc<dyn Gateway>` and tests
//! can swap in a scripted stub.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐                       ┌───────────────┐
//! │   CLI    │     Arc<dyn Gateway>  │  LocalGateway │
//! │   TUI    │──────────────────────▶│  (filesystem  │
//! └──────────┘   browse / counts /   │   + JSON      │
//!                content / stores    │   stores)     │
//!                                    └───────────────┘
//! ```

pub mod local;
pub mod types;

pub use local::LocalGateway;
pub use types::*;

use std::path::PathBuf;

use crate::BoxFuture;

/// Errors returned by gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("file does not exist: {0}")]
    MissingFile(PathBuf),

    #[error("file is outside the selected directory: {0}")]
    OutsideRoot(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed store file {path}: {reason}")]
    Store { path: PathBuf, reason: String },

    #[error("background task failed: {0}")]
    Task(String),
}

/// Backend operations for browsing a project and persisting workbench state.
///
/// All methods take owned arguments so implementations can move them into
/// spawned tasks without borrowing from the caller.
pub trait Gateway: Send + Sync {
    /// Walk `directory` applying the stored exclusion rules; returns the flat
    /// file list and the hierarchical tree.
    fn browse_directory(
        &self,
        directory: PathBuf,
    ) -> BoxFuture<'_, Result<BrowseResponse, GatewayError>>;

    /// Count the text lines of one file. The file must live inside
    /// `directory`.
    fn line_count(
        &self,
        file: PathBuf,
        directory: PathBuf,
    ) -> BoxFuture<'_, Result<LineCountResponse, GatewayError>>;

    /// Fetch the contents of an ordered list of files, best effort: missing
    /// files are skipped, unreadable files yield an error line as content,
    /// and the response preserves request order.
    fn context(
        &self,
        files: Vec<PathBuf>,
        directory: PathBuf,
    ) -> BoxFuture<'_, Result<ContextResponse, GatewayError>>;

    /// The stored custom-instructions text; an absent store reads as empty.
    fn custom_instructions(&self) -> BoxFuture<'_, Result<InstructionsResponse, GatewayError>>;

    /// Replace the stored custom-instructions text.
    fn save_custom_instructions(
        &self,
        text: String,
    ) -> BoxFuture<'_, Result<SavedResponse, GatewayError>>;

    /// The stored exclusion rules; an absent store reads as all-empty rules.
    fn exclusions(&self) -> BoxFuture<'_, Result<ExclusionRules, GatewayError>>;

    /// Replace the stored exclusion rules.
    fn save_exclusions(
        &self,
        rules: ExclusionRules,
    ) -> BoxFuture<'_, Result<SavedResponse, GatewayError>>;
}
