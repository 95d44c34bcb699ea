//! # IconKit Common
//!
//! Shared error type and logging configuration for the IconKit crates.
//!
//! The parsing crates define their own narrow error enums; this crate is
//! the layer tools and hosts use to report them uniformly.

use thiserror::Error;

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Unified error type for IconKit hosts and tools.
#[derive(Error, Debug)]
pub enum IconKitError {
    /// Icon source could not be parsed.
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors.
    #[error("Config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl IconKitError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a parse error with source.
    pub fn parse_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source.
    pub fn config_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error category for reports.
    pub fn category(&self) -> &'static str {
        match self {
            IconKitError::Parse { .. } => "parse",
            IconKitError::Config { .. } => "config",
            IconKitError::Io(_) => "io",
            IconKitError::NotFound(_) => "not_found",
            IconKitError::InvalidArgument(_) => "invalid_argument",
        }
    }
}

/// Result type alias for IconKit operations.
pub type Result<T> = std::result::Result<T, IconKitError>;

/// Extension trait for Result.
pub trait ResultExt<T> {
    /// Wrap the error as a parse error with a message prefix.
    fn parse_context(self, message: impl Into<String>) -> Result<T>;

    /// Wrap the error as a config error with a message prefix.
    fn config_context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn parse_context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let message = format!("{}: {}", message.into(), e);
            IconKitError::parse_with_source(message, e)
        })
    }

    fn config_context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let message = format!("{}: {}", message.into(), e);
            IconKitError::config_with_source(message, e)
        })
    }
}

/// Extension trait for Option.
pub trait OptionExt<T> {
    /// Convert None to a NotFound error.
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| IconKitError::NotFound(resource.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_categories() {
        assert_eq!(IconKitError::parse("bad path").category(), "parse");
        assert_eq!(IconKitError::config("bad json").category(), "config");
        assert_eq!(
            IconKitError::InvalidArgument("x".into()).category(),
            "invalid_argument"
        );
    }

    #[test]
    fn test_parse_context_keeps_source() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = res.parse_context("icon.svg").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: icon.svg: boom");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_option_ext() {
        let some: Option<i32> = Some(42);
        assert_eq!(some.ok_or_not_found("test").unwrap(), 42);

        let none: Option<i32> = None;
        assert!(matches!(
            none.ok_or_not_found("test"),
            Err(IconKitError::NotFound(_))
        ));
    }
}
