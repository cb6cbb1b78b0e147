//! Background gateway tasks.
//!
//! Every gateway call the TUI makes is spawned here so the event loop never
//! blocks on I/O. Each task reports back as an [`AppEvent::Task`] carrying a
//! [`TaskOutcome`]; the app mutates its state only when it absorbs that
//! outcome on the main loop, so no state is shared with the tasks.
//!
//! Browse and recount outcomes carry the [`SessionId`] they were started
//! for. The app compares it against the current session and silently drops
//! results that arrive after the user has moved on.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use promptpack_core::gateway::{
    BrowseResponse, ExclusionRules, Gateway, GatewayError, InstructionsResponse, SavedResponse,
};
use promptpack_core::{assembler, AssembleError, ContextBundle, LineCountCache, SessionId};

use crate::event::AppEvent;

/// Which user action an assembly was started for. Success and failure are
/// surfaced differently for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyFor {
    Copy,
    Preview,
}

/// Result of a finished background task.
#[derive(Debug)]
pub enum TaskOutcome {
    Browsed {
        session: SessionId,
        directory: PathBuf,
        result: Result<BrowseResponse, GatewayError>,
    },
    Recounted {
        session: SessionId,
        cache: LineCountCache,
        total: u64,
    },
    Assembled {
        purpose: AssemblyFor,
        result: Result<ContextBundle, AssembleError>,
    },
    InstructionsLoaded {
        result: Result<InstructionsResponse, GatewayError>,
    },
    InstructionsSaved {
        result: Result<SavedResponse, GatewayError>,
    },
    ExclusionsLoaded {
        result: Result<ExclusionRules, GatewayError>,
    },
    ExclusionsSaved {
        result: Result<SavedResponse, GatewayError>,
    },
}

/// Browse `directory` for the given session.
pub fn spawn_browse(
    gateway: Arc<dyn Gateway>,
    tx: UnboundedSender<AppEvent>,
    session: SessionId,
    directory: PathBuf,
) {
    tokio::spawn(async move {
        let result = gateway.browse_directory(directory.clone()).await;
        let _ = tx.send(AppEvent::Task(TaskOutcome::Browsed {
            session,
            directory,
            result,
        }));
    });
}

/// Recalculate the selected line total, filling `cache` as needed.
///
/// The cache is moved into the task and handed back inside the outcome; the
/// app reinstalls it only when the session still matches.
pub fn spawn_recount(
    gateway: Arc<dyn Gateway>,
    tx: UnboundedSender<AppEvent>,
    session: SessionId,
    directory: PathBuf,
    selected: Vec<PathBuf>,
    mut cache: LineCountCache,
) {
    tokio::spawn(async move {
        let total = cache
            .recalculate_total(gateway.as_ref(), &directory, &selected)
            .await;
        let _ = tx.send(AppEvent::Task(TaskOutcome::Recounted {
            session,
            cache,
            total,
        }));
    });
}

/// Assemble a context bundle for copying or previewing.
pub fn spawn_assemble(
    gateway: Arc<dyn Gateway>,
    tx: UnboundedSender<AppEvent>,
    purpose: AssemblyFor,
    selected: Vec<PathBuf>,
    directory: PathBuf,
) {
    tokio::spawn(async move {
        let result = assembler::assemble(gateway.as_ref(), &selected, &directory).await;
        let _ = tx.send(AppEvent::Task(TaskOutcome::Assembled { purpose, result }));
    });
}

/// Load the stored custom-instructions text.
pub fn spawn_instructions_load(gateway: Arc<dyn Gateway>, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let result = gateway.custom_instructions().await;
        let _ = tx.send(AppEvent::Task(TaskOutcome::InstructionsLoaded { result }));
    });
}

/// Persist the custom-instructions text.
pub fn spawn_instructions_save(
    gateway: Arc<dyn Gateway>,
    tx: UnboundedSender<AppEvent>,
    text: String,
) {
    tokio::spawn(async move {
        let result = gateway.save_custom_instructions(text).await;
        let _ = tx.send(AppEvent::Task(TaskOutcome::InstructionsSaved { result }));
    });
}

/// Load the stored exclusion rules.
pub fn spawn_exclusions_load(gateway: Arc<dyn Gateway>, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let result = gateway.exclusions().await;
        let _ = tx.send(AppEvent::Task(TaskOutcome::ExclusionsLoaded { result }));
    });
}

/// Persist the exclusion rules.
pub fn spawn_exclusions_save(
    gateway: Arc<dyn Gateway>,
    tx: UnboundedSender<AppEvent>,
    rules: ExclusionRules,
) {
    tokio::spawn(async move {
        let result = gateway.save_exclusions(rules).await;
        let _ = tx.send(AppEvent::Task(TaskOutcome::ExclusionsSaved { result }));
    });
}
