//! Scriptable gateway stub.
//!
//! [`StubGateway`] implements the core [`Gateway`] trait entirely in memory.
//! Tests script its responses with `with_*` builders and assert on call
//! counters and captured writes afterwards. Errors are stored as strings and
//! surfaced as [`GatewayError::Task`] so the stub stays trivially cloneable
//! to configure.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use promptpack_core::BoxFuture;
use promptpack_core::gateway::{
    BrowseResponse, ContextFile, ContextResponse, ExclusionRules, FileEntry, Gateway,
    GatewayError, InstructionsResponse, LineCountResponse, SavedResponse,
};
use promptpack_core::tree::build_tree;

#[derive(Default)]
struct CallCounts {
    browse: usize,
    line_count: usize,
    context: usize,
    instructions: usize,
}

#[derive(Default)]
struct CapturedWrites {
    instructions: Vec<String>,
    exclusions: Vec<ExclusionRules>,
}

/// In-memory [`Gateway`] with scripted responses.
///
/// Defaults: browsing any directory succeeds with no files, line counts are
/// unknown (missing file), context fetches return no files, and the
/// instruction and exclusion stores are empty.
pub struct StubGateway {
    line_counts: HashMap<PathBuf, u64>,
    browse: Result<Vec<FileEntry>, String>,
    context: Result<ContextResponse, String>,
    instructions: Result<String, String>,
    exclusions: ExclusionRules,
    calls: Mutex<CallCounts>,
    writes: Mutex<CapturedWrites>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            line_counts: HashMap::new(),
            browse: Ok(Vec::new()),
            context: Ok(ContextResponse {
                files: Vec::new(),
                error: None,
            }),
            instructions: Ok(String::new()),
            exclusions: ExclusionRules::default(),
            calls: Mutex::new(CallCounts::default()),
            writes: Mutex::new(CapturedWrites::default()),
        }
    }

    // ── Scripting ────────────────────────────────────────────────────

    /// Make `line_count` return `count` for `path`.
    pub fn with_line_count(mut self, path: impl Into<PathBuf>, count: u64) -> Self {
        self.line_counts.insert(path.into(), count);
        self
    }

    /// Make `browse_directory` list these files (the tree is derived).
    pub fn with_browse(mut self, files: Vec<FileEntry>) -> Self {
        self.browse = Ok(files);
        self
    }

    pub fn with_browse_error(mut self, message: impl Into<String>) -> Self {
        self.browse = Err(message.into());
        self
    }

    /// Make `context` return these files, optionally with an error note.
    pub fn with_context(mut self, files: Vec<ContextFile>, error: Option<String>) -> Self {
        self.context = Ok(ContextResponse { files, error });
        self
    }

    pub fn with_context_error(mut self, message: impl Into<String>) -> Self {
        self.context = Err(message.into());
        self
    }

    pub fn with_instructions(mut self, text: impl Into<String>) -> Self {
        self.instructions = Ok(text.into());
        self
    }

    pub fn with_instructions_error(mut self, message: impl Into<String>) -> Self {
        self.instructions = Err(message.into());
        self
    }

    pub fn with_exclusions(mut self, rules: ExclusionRules) -> Self {
        self.exclusions = rules;
        self
    }

    // ── Assertions ───────────────────────────────────────────────────

    pub fn browse_calls(&self) -> usize {
        self.calls.lock().expect("stub lock poisoned").browse
    }

    pub fn line_count_calls(&self) -> usize {
        self.calls.lock().expect("stub lock poisoned").line_count
    }

    pub fn context_calls(&self) -> usize {
        self.calls.lock().expect("stub lock poisoned").context
    }

    pub fn instructions_calls(&self) -> usize {
        self.calls.lock().expect("stub lock poisoned").instructions
    }

    /// Every instruction text passed to `save_custom_instructions`, oldest
    /// first.
    pub fn saved_instructions(&self) -> Vec<String> {
        self.writes
            .lock()
            .expect("stub lock poisoned")
            .instructions
            .clone()
    }

    /// Every rule set passed to `save_exclusions`, oldest first.
    pub fn saved_exclusions(&self) -> Vec<ExclusionRules> {
        self.writes
            .lock()
            .expect("stub lock poisoned")
            .exclusions
            .clone()
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway for StubGateway {
    fn browse_directory(
        &self,
        _directory: PathBuf,
    ) -> BoxFuture<'_, Result<BrowseResponse, GatewayError>> {
        self.calls.lock().expect("stub lock poisoned").browse += 1;
        let result = match &self.browse {
            Ok(files) => Ok(BrowseResponse {
                tree: build_tree(files),
                files: files.clone(),
            }),
            Err(message) => Err(GatewayError::Task(message.clone())),
        };
        Box::pin(async move { result })
    }

    fn line_count(
        &self,
        file: PathBuf,
        _directory: PathBuf,
    ) -> BoxFuture<'_, Result<LineCountResponse, GatewayError>> {
        self.calls.lock().expect("stub lock poisoned").line_count += 1;
        let result = match self.line_counts.get(&file) {
            Some(&line_count) => Ok(LineCountResponse { line_count }),
            None => Err(GatewayError::MissingFile(file)),
        };
        Box::pin(async move { result })
    }

    fn context(
        &self,
        _files: Vec<PathBuf>,
        _directory: PathBuf,
    ) -> BoxFuture<'_, Result<ContextResponse, GatewayError>> {
        self.calls.lock().expect("stub lock poisoned").context += 1;
        let result = match &self.context {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(GatewayError::Task(message.clone())),
        };
        Box::pin(async move { result })
    }

    fn custom_instructions(&self) -> BoxFuture<'_, Result<InstructionsResponse, GatewayError>> {
        self.calls.lock().expect("stub lock poisoned").instructions += 1;
        let result = match &self.instructions {
            Ok(text) => Ok(InstructionsResponse {
                instructions: text.clone(),
            }),
            Err(message) => Err(GatewayError::Task(message.clone())),
        };
        Box::pin(async move { result })
    }

    fn save_custom_instructions(
        &self,
        text: String,
    ) -> BoxFuture<'_, Result<SavedResponse, GatewayError>> {
        self.writes
            .lock()
            .expect("stub lock poisoned")
            .instructions
            .push(text);
        Box::pin(async move {
            Ok(SavedResponse {
                message: "Custom instructions saved successfully!".to_string(),
            })
        })
    }

    fn exclusions(&self) -> BoxFuture<'_, Result<ExclusionRules, GatewayError>> {
        let rules = self.exclusions.clone();
        Box::pin(async move { Ok(rules) })
    }

    fn save_exclusions(
        &self,
        rules: ExclusionRules,
    ) -> BoxFuture<'_, Result<SavedResponse, GatewayError>> {
        self.writes
            .lock()
            .expect("stub lock poisoned")
            .exclusions
            .push(rules);
        Box::pin(async move {
            Ok(SavedResponse {
                message: "Exclusions updated successfully.".to_string(),
            })
        })
    }
}
