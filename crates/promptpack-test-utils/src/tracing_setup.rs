//! Tracing initialisation for tests.
//!
//! Gateway and assembler code logs its degradation decisions (skipped files,
//! failed fetches) through `tracing`; call [`init_test_tracing`] at the top
//! of a test to see those events in the harness output under `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Initialise a tracing subscriber writing to the test-harness writer,
/// filtered by `RUST_LOG` (default `info`).
///
/// Idempotent: only the first call per process installs a subscriber.
///
/// # Example
///
/// ```ignore
/// #[tokio::test]
/// async fn my_test() {
///     promptpack_test_utils::init_test_tracing();
///     tracing::info!("visible when RUST_LOG=info");
/// }
/// ```
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
