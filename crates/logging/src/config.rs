//! Verbosity configuration derived from the `-v` count.

use std::fmt;

/// Diagnostic detail, from quietest to noisiest.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Session summaries.
    Info,
    /// Stream headers.
    Debug,
    /// Every decoded command.
    Trace,
}

impl LogLevel {
    /// Lower-case name, as accepted by `RUST_LOG`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic configuration for one process.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Level applied to every target without an explicit directive.
    pub level: LogLevel,
    /// Whether event targets are printed.
    pub show_target: bool,
}

impl VerbosityConfig {
    /// Maps a `-v` count onto a configuration.
    ///
    /// No flag keeps warnings only, `-v` adds the session summary, `-vv`
    /// stream headers and `-vvv` or more every command.
    pub fn from_verbose_level(level: u8) -> Self {
        let level = match level {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        Self {
            level,
            show_target: level >= LogLevel::Debug,
        }
    }

    /// Default filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directive(&self) -> &'static str {
        self.level.as_str()
    }
}
