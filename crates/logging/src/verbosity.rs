//! crates/logging/src/verbosity.rs
//! Numeric verbosity levels mapped onto harness filter directives.

use std::fmt;

/// Root target shared by every harness subsystem.
pub const HARNESS_TARGET: &str = "harness";

/// Verbosity requested by a test driver.
///
/// Levels mirror the usual `-v` counting: `0` silences the harness, each
/// additional step reveals one more `tracing` level.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Verbosity {
    /// No harness events.
    Quiet,
    /// Capture overflows and other warnings.
    #[default]
    Warn,
    /// Lifecycle events.
    Info,
    /// Connection and listener table changes.
    Debug,
    /// Every queued and delivered line.
    Trace,
}

impl Verbosity {
    /// Maps a numeric level to a verbosity, saturating at [`Verbosity::Trace`].
    #[must_use]
    pub const fn from_level(level: u8) -> Self {
        match level {
            0 => Self::Quiet,
            1 => Self::Warn,
            2 => Self::Info,
            3 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Returns the numeric level for this verbosity.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Quiet => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
            Self::Trace => 4,
        }
    }

    /// Returns the level name understood by `EnvFilter`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quiet => "off",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Returns the filter directive enabling harness targets at this level.
    #[must_use]
    pub fn directive(self) -> String {
        format!("{HARNESS_TARGET}={}", self.as_str())
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        Self::from_level(level)
    }
}
