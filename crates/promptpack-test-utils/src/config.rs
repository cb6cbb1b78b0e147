//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use promptpack_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .data_dir("/tmp/promptpack-test")
///     .tick_rate_ms(10)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn data_dir(mut self, dir: &str) -> Self {
        self.config.storage.data_dir = dir.to_string();
        self
    }

    pub fn tick_rate_ms(mut self, ms: u64) -> Self {
        self.config.ui.tick_rate_ms = ms;
        self
    }

    pub fn toast_duration_ms(mut self, ms: u64) -> Self {
        self.config.ui.toast_duration_ms = ms;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.browse.follow_symlinks = follow;
        self
    }

    pub fn default_directory(mut self, dir: &str) -> Self {
        self.config.browse.default_directory = Some(dir.to_string());
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
