#![deny(unsafe_code)]

//! promptpack core engine.
//!
//! Provides the machinery behind both frontends: the gateway to a browsed
//! project (file listing, line counts, content, instruction and exclusion
//! stores), the ordered file-selection rows, the line-count cache with its
//! size tiers, the hierarchical file tree, and the assembler that turns a
//! selection into one pasteable text bundle.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future — the standard return type for async
/// trait methods that require dynamic dispatch (`dyn Trait`).
///
/// Native `async fn` in traits produces opaque return types that are **not**
/// object-safe. Traits consumed via `Arc<dyn Trait>` must return a concrete
/// `Pin<Box<dyn Future>>` instead. This alias keeps those signatures readable.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Context bundle assembly from instructions and selected file contents.
pub mod assembler;
/// Human-readable file-size formatting.
pub mod format;
/// Gateway trait, wire types, and the local filesystem backend.
pub mod gateway;
/// Line-count cache and size tiers.
pub mod linecount;
/// In-memory log collector for the TUI.
pub mod logging;
/// Ordered file-selection rows.
pub mod selection;
/// Directory session identity.
pub mod session;
/// Hierarchical file tree model.
pub mod tree;

pub use assembler::{AssembleError, ContextBundle};
pub use format::format_file_size;
pub use gateway::{Gateway, GatewayError, LocalGateway};
pub use linecount::{LineCountCache, SizeTier};
pub use logging::{LogCollector, LogReader};
pub use selection::{FileRow, RowId, SelectionState};
pub use session::{DirectorySession, SessionAllocator, SessionId};
pub use tree::TreeNode;
