//! Source tracking for configuration values.
//!
//! Every resolved configuration value carries the layer it came from, so
//! that diagnostics can report not just what a value is but where it was
//! set.

use std::fmt::Display;
use std::ops::Deref;

/// The configuration layer a value originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Command line argument.
    Cli,
    /// Environment variable.
    Env,
    /// TOML configuration file.
    File,
    /// Built-in default.
    Default,
}

impl ValueSource {
    /// Returns the source name as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueSource::Cli => "cli",
            ValueSource::Env => "env",
            ValueSource::File => "file",
            ValueSource::Default => "default",
        }
    }
}

/// A configuration value tagged with the layer it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    value: T,
    source: ValueSource,
}

impl<T> Sourced<T> {
    /// Wraps a value coming from a command line argument.
    pub fn cli(value: T) -> Self {
        Self {
            value,
            source: ValueSource::Cli,
        }
    }

    /// Wraps a value coming from an environment variable.
    pub fn env(value: T) -> Self {
        Self {
            value,
            source: ValueSource::Env,
        }
    }

    /// Wraps a value coming from the configuration file.
    pub fn file(value: T) -> Self {
        Self {
            value,
            source: ValueSource::File,
        }
    }

    /// Wraps a built-in default value.
    pub fn defaulted(value: T) -> Self {
        Self {
            value,
            source: ValueSource::Default,
        }
    }

    /// Returns the value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the layer the value came from.
    pub fn source(&self) -> ValueSource {
        self.source
    }

    /// Consumes the wrapper and returns the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> Deref for Sourced<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T: Display> Display for Sourced<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}
