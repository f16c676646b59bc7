#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` turns the command line's verbosity flags into a `tracing`
//! subscriber. Library crates only emit events through the `tracing` macros;
//! the binary decides once, at start-up, what is shown.
//!
//! # Design
//!
//! [`VerbosityConfig`] maps a `-v` count onto a [`LogLevel`]. With the
//! `tracing` feature, [`init_tracing`] installs a formatting layer on stderr
//! behind an `EnvFilter`, so `RUST_LOG` can still override the level per
//! target.
//!
//! # Examples
//!
//! ```
//! use logging::{LogLevel, VerbosityConfig};
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! assert_eq!(config.level, LogLevel::Debug);
//! assert_eq!(config.directive(), "debug");
//! ```

mod config;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::{LogLevel, VerbosityConfig};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{build_filter, init_tracing};
