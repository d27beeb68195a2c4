//! Configuration loading.
//!
//! `defaults/tagmend.default.toml` is embedded into the library so the
//! documented defaults and the runtime defaults cannot drift apart. Callers
//! layer deployment-specific files on top of the defaults via [`Loader`]
//! before deserializing into [`TagmendConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/tagmend.default.toml");

/// Top-level configuration for assembling a pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct TagmendConfig {
    pub headers: HeadersConfig,
    pub tags: TagsConfig,
}

/// Which section labels the normalizer recognizes as headers.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadersConfig {
    pub labels: Vec<String>,
}

/// Control-tag scanning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsConfig {
    pub prefix: String,
    pub extract_progress: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TagmendConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TagmendConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.headers.labels.len(), 5);
        assert_eq!(config.headers.labels[0], "Hint");
        assert_eq!(config.tags.prefix, "TAG");
        assert!(config.tags.extract_progress);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("tags.prefix", "OTK")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.tags.prefix, "OTK");
    }
}
