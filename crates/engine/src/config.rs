//! Decode session configuration.

use std::path::{Path, PathBuf};

use protocol::MAX_ATTRIBUTE_LEN;

/// Resource limits applied while decoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeLimits {
    max_attribute_len: usize,
}

impl DecodeLimits {
    /// Creates limits with the given attribute size ceiling.
    ///
    /// Values above the protocol maximum are clamped to it.
    #[must_use]
    pub const fn new(max_attribute_len: usize) -> Self {
        let max_attribute_len = if max_attribute_len > MAX_ATTRIBUTE_LEN {
            MAX_ATTRIBUTE_LEN
        } else {
            max_attribute_len
        };
        Self { max_attribute_len }
    }

    /// Largest accepted attribute value, in bytes.
    #[must_use]
    pub const fn max_attribute_len(self) -> usize {
        self.max_attribute_len
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new(MAX_ATTRIBUTE_LEN)
    }
}

/// Configuration for one decode session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeConfig {
    root: PathBuf,
    stop_at_end: bool,
    limits: DecodeLimits,
}

impl DecodeConfig {
    /// Returns a builder with default settings.
    #[must_use]
    pub fn builder() -> DecodeConfigBuilder {
        DecodeConfigBuilder::default()
    }

    /// Configuration rooted at `root` with every other setting at its default.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::builder().root(root).build()
    }

    /// Directory every stream path is resolved under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reports whether decoding stops after the first `end` command.
    #[must_use]
    #[doc(alias = "--stop-at-end")]
    pub const fn stop_at_end(&self) -> bool {
        self.stop_at_end
    }

    /// Resource limits.
    #[must_use]
    pub const fn limits(&self) -> DecodeLimits {
        self.limits
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder used to assemble a [`DecodeConfig`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeConfigBuilder {
    root: PathBuf,
    stop_at_end: bool,
    limits: DecodeLimits,
}

impl Default for DecodeConfigBuilder {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            stop_at_end: false,
            limits: DecodeLimits::default(),
        }
    }
}

impl DecodeConfigBuilder {
    /// Sets the receive root.
    #[must_use]
    #[doc(alias = "--root")]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Stops after the first `end` instead of reading concatenated streams.
    #[must_use]
    #[doc(alias = "--stop-at-end")]
    #[doc(alias = "-e")]
    pub fn stop_at_end(mut self, stop: bool) -> Self {
        self.stop_at_end = stop;
        self
    }

    /// Replaces the resource limits.
    #[must_use]
    pub fn limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Lowers the attribute size ceiling.
    #[must_use]
    #[doc(alias = "--max-attribute-size")]
    pub fn max_attribute_len(mut self, max: usize) -> Self {
        self.limits = DecodeLimits::new(max);
        self
    }

    /// Finalises the configuration.
    #[must_use]
    pub fn build(self) -> DecodeConfig {
        DecodeConfig {
            root: self.root,
            stop_at_end: self.stop_at_end,
            limits: self.limits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_read_every_stream_under_current_directory() {
        let config = DecodeConfig::default();

        assert_eq!(config.root(), Path::new("."));
        assert!(!config.stop_at_end());
        assert_eq!(config.limits().max_attribute_len(), MAX_ATTRIBUTE_LEN);
    }

    #[test]
    fn builder_sets_every_field() {
        let config = DecodeConfig::builder()
            .root("/srv/recv")
            .stop_at_end(true)
            .max_attribute_len(1024)
            .build();

        assert_eq!(config.root(), Path::new("/srv/recv"));
        assert!(config.stop_at_end());
        assert_eq!(config.limits(), DecodeLimits::new(1024));
    }

    #[test]
    fn limits_are_clamped_to_protocol_maximum() {
        assert_eq!(
            DecodeLimits::new(usize::MAX).max_attribute_len(),
            MAX_ATTRIBUTE_LEN
        );
    }
}
