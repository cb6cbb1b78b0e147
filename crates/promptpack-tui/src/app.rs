//! Application state and event absorption.
//!
//! All state lives here and is mutated only on the main loop: key events
//! arrive through [`handle_key`](App::handle_key), background results
//! through [`absorb`](App::absorb). The background tasks themselves never
//! touch the state; they report [`TaskOutcome`]s over the event channel.
//!
//! ## Session identity
//!
//! Every browse gets a fresh [`SessionId`]. Browse and recount outcomes
//! carry the id they were started under and are discarded when it no longer
//! matches, so switching directories mid-flight cannot bleed one project's
//! listing or counts into another's view.
//!
//! ## Recount coalescing
//!
//! Selection mutations mark a flag on [`SelectionState`]; after every key
//! or task event the app drains it and starts at most one recount. The
//! line-count cache travels into the recount task (moved, not shared) and
//! is reinstalled only if the session still matches when it returns.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use promptpack_config::AppConfig;
use promptpack_core::gateway::{BrowseResponse, ExclusionRules, Gateway, GatewayError};
use promptpack_core::{
    AssembleError, ContextBundle, DirectorySession, LineCountCache, LogReader, RowId,
    SelectionState, SessionAllocator, SessionId, SizeTier,
};

use crate::clipboard::Clipboard;
use crate::event::AppEvent;
use crate::keymap::{Action, KeyMapper};
use crate::panels::{
    DirPrompt, EditorEvent, ExclusionsEditor, ExclusionsEvent, FilePicker, InstructionsEditor,
    LogsPanel, PanelState, PickerOutcome, PreviewPane, PromptEvent,
};
use crate::tasks::{self, AssemblyFor, TaskOutcome};

/// Which surface owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Rows,
    DirPrompt,
    Picker,
    Preview,
    Instructions,
    Exclusions,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient status message shown in the footer until it expires.
#[derive(Debug)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// TUI application state.
pub struct App {
    /// Whether the application should quit.
    pub should_quit: bool,

    /// Which surface owns the keyboard (and which overlay is drawn).
    pub mode: Mode,

    pub config: AppConfig,

    /// The ordered selection rows.
    pub selection: SelectionState,

    /// Cursor over the selection rows.
    pub cursor: usize,

    /// The installed directory session, if a browse has succeeded.
    pub session: Option<DirectorySession>,

    /// Total selected lines from the last applied recount.
    pub total_lines: u64,

    /// Size tier derived from `total_lines`.
    pub tier: SizeTier,

    /// Session id of the browse currently in flight, if any.
    pub browse_in_flight: Option<SessionId>,

    // Overlay panels.
    pub dir_prompt: DirPrompt,
    pub picker: FilePicker,
    /// The row the picker is editing while it is open.
    pub picker_row: Option<RowId>,
    pub preview: PreviewPane,
    pub instructions: InstructionsEditor,
    pub exclusions: ExclusionsEditor,
    pub logs: LogsPanel,

    pub toast: Option<Toast>,

    gateway: Arc<dyn Gateway>,
    clipboard: Box<dyn Clipboard>,
    events_tx: UnboundedSender<AppEvent>,
    sessions: SessionAllocator,
    /// Line-count cache; `None` exactly while a recount task holds it.
    cache: Option<LineCountCache>,
    recount_in_flight: bool,
    keymap: KeyMapper,
}

impl App {
    pub fn new(
        config: AppConfig,
        gateway: Arc<dyn Gateway>,
        clipboard: Box<dyn Clipboard>,
        log_reader: LogReader,
        events_tx: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            mode: Mode::Rows,
            config,
            selection: SelectionState::new(),
            cursor: 0,
            session: None,
            total_lines: 0,
            tier: SizeTier::Green,
            browse_in_flight: None,
            dir_prompt: DirPrompt::new(),
            picker: FilePicker::new(),
            picker_row: None,
            preview: PreviewPane::new(),
            instructions: InstructionsEditor::new(),
            exclusions: ExclusionsEditor::new(),
            logs: LogsPanel::new(log_reader),
            toast: None,
            gateway,
            clipboard,
            events_tx,
            sessions: SessionAllocator::new(),
            cache: Some(LineCountCache::new()),
            recount_in_flight: false,
            keymap: KeyMapper::new(),
        }
    }

    /// Route a key press to the active surface.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::DirPrompt => match self.dir_prompt.handle_key(key) {
                PromptEvent::Submit(path) => self.start_browse(path),
                PromptEvent::Cancel => self.mode = Mode::Rows,
                PromptEvent::None => {}
            },
            Mode::Instructions => match self.instructions.handle_key(key) {
                EditorEvent::Save(text) => {
                    tasks::spawn_instructions_save(
                        self.gateway.clone(),
                        self.events_tx.clone(),
                        text,
                    );
                }
                EditorEvent::Close => self.mode = Mode::Rows,
                EditorEvent::None => {}
            },
            Mode::Exclusions => match self.exclusions.handle_key(key) {
                ExclusionsEvent::Save(rules) => {
                    tasks::spawn_exclusions_save(
                        self.gateway.clone(),
                        self.events_tx.clone(),
                        rules,
                    );
                }
                ExclusionsEvent::Close => self.mode = Mode::Rows,
                ExclusionsEvent::None => {}
            },
            Mode::Rows | Mode::Picker | Mode::Preview | Mode::Logs => {
                let action = self.keymap.resolve(self.mode, key);
                self.dispatch(action);
            }
        }
        self.maybe_start_recount();
    }

    /// Begin browsing `path` under a fresh session id.
    pub fn start_browse(&mut self, path: String) {
        let id = self.sessions.allocate();
        self.browse_in_flight = Some(id);
        self.mode = Mode::Rows;
        info!(%id, directory = %path, "starting browse");
        tasks::spawn_browse(
            self.gateway.clone(),
            self.events_tx.clone(),
            id,
            PathBuf::from(path),
        );
    }

    /// Process a resolved action for the current mode.
    pub fn dispatch(&mut self, action: Action) {
        if action == Action::Quit {
            self.should_quit = true;
            return;
        }
        match self.mode {
            Mode::Rows => self.dispatch_rows(action),
            Mode::Picker => self.dispatch_picker(action),
            Mode::Preview => self.dispatch_preview(action),
            Mode::Logs => self.dispatch_logs(action),
            Mode::DirPrompt | Mode::Instructions | Mode::Exclusions => {}
        }
    }

    fn dispatch_rows(&mut self, action: Action) {
        match action {
            Action::CursorDown => {
                self.cursor = (self.cursor + 1).min(self.selection.len().saturating_sub(1));
            }
            Action::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Action::CursorTop => self.cursor = 0,
            Action::CursorBottom => self.cursor = self.selection.len().saturating_sub(1),
            Action::AddRow => {
                self.selection.add_row();
                self.cursor = self.selection.len() - 1;
            }
            Action::RemoveRow => {
                if let Some(id) = self.cursor_row_id() {
                    self.selection.remove_row(id);
                    self.clamp_cursor();
                }
            }
            Action::ToggleRow => {
                if let Some(id) = self.cursor_row_id() {
                    self.selection.toggle_row(id);
                }
            }
            Action::ClearRows => {
                self.selection.clear_all();
                self.cursor = 0;
                self.preview.clear();
            }
            Action::Activate => self.open_picker(),
            Action::OpenDirPrompt => {
                let prefill = self
                    .session
                    .as_ref()
                    .map(|session| session.root.display().to_string())
                    .unwrap_or_default();
                self.dir_prompt.open(&prefill);
                self.mode = Mode::DirPrompt;
            }
            Action::CopyBundle => self.request_bundle(AssemblyFor::Copy),
            Action::OpenPreview => self.request_bundle(AssemblyFor::Preview),
            Action::OpenInstructions => {
                self.instructions.begin_loading();
                tasks::spawn_instructions_load(self.gateway.clone(), self.events_tx.clone());
                self.mode = Mode::Instructions;
            }
            Action::OpenExclusions => {
                self.exclusions.begin_loading();
                tasks::spawn_exclusions_load(self.gateway.clone(), self.events_tx.clone());
                self.mode = Mode::Exclusions;
            }
            Action::OpenLogs => {
                self.logs.refresh();
                self.mode = Mode::Logs;
            }
            _ => {}
        }
    }

    fn dispatch_picker(&mut self, action: Action) {
        match action {
            Action::Close => self.close_picker(),
            Action::CursorDown => self.picker.move_down(1),
            Action::CursorUp => self.picker.move_up(1),
            Action::CursorTop => self.picker.move_top(),
            Action::CursorBottom => self.picker.move_bottom(),
            Action::Activate => match self.picker.activate() {
                PickerOutcome::Picked { path, label } => {
                    if let Some(id) = self.picker_row {
                        debug!(row = id, %label, "row file set");
                        self.selection.set_row_file(id, Some(path));
                    }
                    self.close_picker();
                }
                PickerOutcome::Toggled | PickerOutcome::Nothing => {}
            },
            Action::ClearValue => {
                if self.picker.clear() {
                    if let Some(id) = self.picker_row {
                        self.selection.set_row_file(id, None);
                    }
                }
                self.close_picker();
            }
            _ => {}
        }
    }

    fn dispatch_preview(&mut self, action: Action) {
        match action {
            Action::Close => self.mode = Mode::Rows,
            Action::CursorDown => self.preview.scroll_down(1),
            Action::CursorUp => self.preview.scroll_up(1),
            Action::HalfPageDown => self.preview.scroll_down(10),
            Action::HalfPageUp => self.preview.scroll_up(10),
            Action::CursorTop => self.preview.scroll_to_top(),
            Action::CursorBottom => self.preview.scroll_to_bottom(),
            _ => {}
        }
    }

    fn dispatch_logs(&mut self, action: Action) {
        match action {
            Action::Close => self.mode = Mode::Rows,
            Action::CursorDown => self.logs.scroll_down(1),
            Action::CursorUp => self.logs.scroll_up(1),
            Action::HalfPageDown => self.logs.scroll_down(10),
            Action::HalfPageUp => self.logs.scroll_up(10),
            Action::CursorTop => self.logs.scroll_to_top(),
            Action::CursorBottom => self.logs.scroll_to_bottom(),
            _ => {}
        }
    }

    fn open_picker(&mut self) {
        let Some(session) = &self.session else {
            self.show_toast("Please select a project directory first.", ToastKind::Error);
            return;
        };
        let Some(row) = self.selection.rows().get(self.cursor) else {
            return;
        };
        let row_id = row.id;
        let current = row.path.clone();
        self.picker.load(&session.tree);
        if let Some(path) = current {
            // Prefill only: the row already holds this path.
            self.picker.set_value(&path);
        }
        self.picker_row = Some(row_id);
        self.mode = Mode::Picker;
    }

    fn close_picker(&mut self) {
        self.picker_row = None;
        self.mode = Mode::Rows;
    }

    fn request_bundle(&mut self, purpose: AssemblyFor) {
        let selected = self.selection.selected_files();
        let directory = self
            .session
            .as_ref()
            .map(|session| session.root.clone())
            .unwrap_or_default();
        tasks::spawn_assemble(
            self.gateway.clone(),
            self.events_tx.clone(),
            purpose,
            selected,
            directory,
        );
    }

    /// Apply a finished background task to the state.
    pub fn absorb(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Browsed {
                session,
                directory,
                result,
            } => self.absorb_browse(session, directory, result),
            TaskOutcome::Recounted {
                session,
                cache,
                total,
            } => self.absorb_recount(session, cache, total),
            TaskOutcome::Assembled { purpose, result } => self.absorb_bundle(purpose, result),
            TaskOutcome::InstructionsLoaded { result } => match result {
                Ok(resp) => self.instructions.install(resp.instructions),
                Err(err) => {
                    warn!(%err, "failed to load custom instructions");
                    self.instructions.install(String::new());
                    self.show_toast("Failed to load custom instructions.", ToastKind::Error);
                }
            },
            TaskOutcome::InstructionsSaved { result } => match result {
                Ok(resp) => {
                    self.instructions.mark_saved();
                    self.show_toast(&resp.message, ToastKind::Success);
                    if self.mode == Mode::Instructions {
                        self.mode = Mode::Rows;
                    }
                }
                Err(err) => {
                    warn!(%err, "failed to save custom instructions");
                    self.show_toast("Failed to save custom instructions.", ToastKind::Error);
                }
            },
            TaskOutcome::ExclusionsLoaded { result } => match result {
                Ok(rules) => self.exclusions.install(rules),
                Err(err) => {
                    warn!(%err, "failed to load exclusions");
                    self.exclusions.install(ExclusionRules::default());
                    self.show_toast("Failed to load exclusions.", ToastKind::Error);
                }
            },
            TaskOutcome::ExclusionsSaved { result } => match result {
                Ok(resp) => {
                    self.exclusions.mark_saved();
                    self.show_toast(&resp.message, ToastKind::Success);
                    if self.mode == Mode::Exclusions {
                        self.mode = Mode::Rows;
                    }
                }
                Err(err) => {
                    warn!(%err, "failed to save exclusions");
                    self.show_toast("Failed to save exclusions.", ToastKind::Error);
                }
            },
        }
        self.maybe_start_recount();
    }

    fn absorb_browse(
        &mut self,
        session: SessionId,
        directory: PathBuf,
        result: Result<BrowseResponse, GatewayError>,
    ) {
        if self.browse_in_flight != Some(session) {
            debug!(%session, "discarding stale browse result");
            return;
        }
        self.browse_in_flight = None;

        match result {
            Ok(resp) => {
                let cleared = self.selection.reconcile(&resp.files);
                if cleared > 0 {
                    info!(cleared, "cleared rows pointing outside the new listing");
                }
                info!(
                    %session,
                    directory = %directory.display(),
                    files = resp.files.len(),
                    "browsed directory"
                );
                self.session = Some(DirectorySession {
                    id: session,
                    root: directory,
                    files: resp.files,
                    tree: resp.tree,
                });
                self.cache = Some(LineCountCache::new());
                self.total_lines = 0;
                self.tier = SizeTier::Green;
                // Surviving rows need counting against the new directory.
                self.selection.mark_recount();
                self.show_toast("Directory loaded successfully!", ToastKind::Success);
            }
            Err(err) => {
                warn!(%err, "browse failed");
                self.show_toast(&err.to_string(), ToastKind::Error);
            }
        }
    }

    fn absorb_recount(&mut self, session: SessionId, cache: LineCountCache, total: u64) {
        self.recount_in_flight = false;
        let current = self.session.as_ref().map(|session| session.id);
        if current == Some(session) {
            self.cache = Some(cache);
            self.total_lines = total;
            self.tier = SizeTier::for_total(total);
            debug!(total, "recount applied");
        } else {
            // Stale count for a replaced session; the fresh cache was
            // already installed by the browse.
            debug!(%session, "discarding stale recount");
        }
    }

    fn absorb_bundle(
        &mut self,
        purpose: AssemblyFor,
        result: Result<ContextBundle, AssembleError>,
    ) {
        match (purpose, result) {
            (AssemblyFor::Copy, Ok(bundle)) => {
                let text = bundle.clipboard_text();
                match self.clipboard.set_text(&text) {
                    Ok(()) => {
                        info!(chars = text.len(), "copied bundle to clipboard");
                        self.show_toast(
                            &format!("Copied {} to clipboard!", bundle.summary()),
                            ToastKind::Success,
                        );
                    }
                    Err(err) => {
                        // Keep the bundle visible so it can be copied by hand.
                        warn!(%err, "clipboard write failed");
                        self.preview.install(bundle);
                        self.mode = Mode::Preview;
                        self.show_toast(
                            &format!("Failed to copy context: {err}"),
                            ToastKind::Error,
                        );
                    }
                }
            }
            (AssemblyFor::Preview, Ok(bundle)) => {
                self.preview.install(bundle);
                self.mode = Mode::Preview;
            }
            (AssemblyFor::Copy, Err(AssembleError::Empty)) => {
                self.show_toast("No content selected or available to copy.", ToastKind::Error);
            }
            (AssemblyFor::Preview, Err(AssembleError::Empty)) => {
                self.preview.clear();
                self.mode = Mode::Preview;
            }
            (AssemblyFor::Copy, Err(AssembleError::InstructionsUnavailable(err))) => {
                warn!(%err, "copy failed: instructions unavailable");
                self.show_toast(
                    "Failed to load custom instructions. No files selected to copy.",
                    ToastKind::Error,
                );
            }
            (AssemblyFor::Preview, Err(AssembleError::InstructionsUnavailable(err))) => {
                warn!(%err, "preview failed: instructions unavailable");
                self.show_toast(
                    "Failed to load custom instructions. No files selected for preview.",
                    ToastKind::Error,
                );
            }
            (AssemblyFor::Copy, Err(err)) => {
                warn!(%err, "copy assembly failed");
                self.show_toast(&format!("Failed to copy context: {err}"), ToastKind::Error);
            }
            (AssemblyFor::Preview, Err(err)) => {
                warn!(%err, "preview assembly failed");
                self.show_toast(&format!("Failed to preview context: {err}"), ToastKind::Error);
            }
        }
    }

    /// Start a recount if one is needed and none is in flight.
    fn maybe_start_recount(&mut self) {
        if self.recount_in_flight {
            return;
        }
        let Some(session) = &self.session else {
            // Nothing to count against yet; drop the flag.
            let _ = self.selection.take_recount_needed();
            return;
        };
        if !self.selection.take_recount_needed() {
            return;
        }
        let Some(cache) = self.cache.take() else {
            // Cache is out with a task; re-mark and retry when it returns.
            self.selection.mark_recount();
            return;
        };
        self.recount_in_flight = true;
        tasks::spawn_recount(
            self.gateway.clone(),
            self.events_tx.clone(),
            session.id,
            session.root.clone(),
            self.selection.selected_files(),
            cache,
        );
    }

    /// Timer tick: expire the toast, refresh the log overlay.
    pub fn tick(&mut self) {
        if let Some(toast) = &self.toast {
            if Instant::now() >= toast.expires_at {
                self.toast = None;
            }
        }
        if self.mode == Mode::Logs {
            self.logs.refresh();
        }
    }

    fn cursor_row_id(&self) -> Option<RowId> {
        self.selection.rows().get(self.cursor).map(|row| row.id)
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.selection.len().saturating_sub(1));
    }

    fn show_toast(&mut self, text: &str, kind: ToastKind) {
        let ttl = Duration::from_millis(self.config.ui.toast_duration_ms);
        self.toast = Some(Toast {
            text: text.to_string(),
            kind,
            expires_at: Instant::now() + ttl,
        });
    }
}
