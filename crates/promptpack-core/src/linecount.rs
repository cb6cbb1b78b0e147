//! Line-count cache and size tiers.
//!
//! Line counts are fetched through the gateway once per path and cached for
//! the lifetime of a directory session; the cache is cleared wholesale when
//! the session changes and never selectively invalidated. A failed fetch is
//! cached as 0 so one broken file cannot hammer the backend on every
//! recount.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::warn;

use crate::gateway::Gateway;

/// Total selected lines at which the indicator leaves green.
pub const GREEN_MAX_LINES: u64 = 4000;
/// Total selected lines at which the indicator leaves yellow.
pub const YELLOW_MAX_LINES: u64 = 8000;

/// Rough bundle-size indicator derived from the selected line total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Green,
    Yellow,
    Red,
}

impl SizeTier {
    pub fn for_total(total: u64) -> Self {
        if total <= GREEN_MAX_LINES {
            SizeTier::Green
        } else if total <= YELLOW_MAX_LINES {
            SizeTier::Yellow
        } else {
            SizeTier::Red
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeTier::Green => "green",
            SizeTier::Yellow => "yellow",
            SizeTier::Red => "red",
        }
    }
}

/// Per-session cache of file line counts.
#[derive(Debug, Default)]
pub struct LineCountCache {
    counts: HashMap<PathBuf, u64>,
}

impl LineCountCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached count. Called when the browsed directory changes.
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn get(&self, path: &Path) -> Option<u64> {
        self.counts.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Line count for `path`, fetching through the gateway on a miss.
    ///
    /// A failed fetch is recorded as 0 and not retried until [`clear`](Self::clear).
    pub async fn fetch(&mut self, gateway: &dyn Gateway, directory: &Path, path: &Path) -> u64 {
        if let Some(count) = self.counts.get(path) {
            return *count;
        }
        let count = Self::fetch_uncached(gateway, directory, path).await;
        self.counts.insert(path.to_path_buf(), count);
        count
    }

    /// Recalculate the total for the selected paths.
    ///
    /// Counts missing from the cache are fetched concurrently (one fetch per
    /// unique path), then the total is summed over the full selection, so a
    /// path selected in two rows counts twice.
    pub async fn recalculate_total(
        &mut self,
        gateway: &dyn Gateway,
        directory: &Path,
        selected: &[PathBuf],
    ) -> u64 {
        let mut seen = HashSet::new();
        let missing: Vec<&PathBuf> = selected
            .iter()
            .filter(|path| !self.counts.contains_key(path.as_path()))
            .filter(|path| seen.insert(path.as_path()))
            .collect();

        let fetches = missing.into_iter().map(|path| async move {
            let count = Self::fetch_uncached(gateway, directory, path).await;
            (path.clone(), count)
        });
        for (path, count) in join_all(fetches).await {
            self.counts.insert(path, count);
        }

        selected
            .iter()
            .map(|path| self.counts.get(path.as_path()).copied().unwrap_or(0))
            .sum()
    }

    async fn fetch_uncached(gateway: &dyn Gateway, directory: &Path, path: &Path) -> u64 {
        match gateway
            .line_count(path.to_path_buf(), directory.to_path_buf())
            .await
        {
            Ok(resp) => resp.line_count,
            Err(err) => {
                warn!(path = %path.display(), %err, "line count failed, caching 0");
                0
            }
        }
    }
}
