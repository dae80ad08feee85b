//! Error types for resolution and casting

use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the resolution engine
#[derive(Error, Debug)]
pub enum EnvError {
    /// Strict mode is on and none of the keys resolved
    #[error("{}", missing_message(.keys))]
    Missing { keys: Vec<String> },

    /// A present value could not be converted by the requested caster
    #[error("Failed to cast {key}='{value}': {source}")]
    Validation {
        key: String,
        value: String,
        #[source]
        source: CastError,
    },

    /// A source file contains a line the reader cannot understand
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Reading a source file failed for a reason other than absence
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn missing_message(keys: &[String]) -> String {
    match keys {
        [key] => format!("Missing required environment variable: {}", key),
        _ => format!("Missing required environment variables: [{}]", keys.join(", ")),
    }
}

impl EnvError {
    /// Create a missing-variable error for a single key
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing {
            keys: vec![key.into()],
        }
    }

    /// Create a missing-variable error naming every attempted key
    pub fn missing_any<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Missing {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a validation error wrapping a cast failure
    pub fn validation(key: impl Into<String>, value: impl Into<String>, source: CastError) -> Self {
        Self::Validation {
            key: key.into(),
            value: value.into(),
            source,
        }
    }

    /// Create a parse error for a source file line
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Check if this is a missing-variable error
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Errors produced by a single caster
#[derive(Error, Debug)]
pub enum CastError {
    #[error("invalid integer: {0}")]
    Integer(#[from] ParseIntError),

    #[error("invalid float: {0}")]
    Float(#[from] ParseFloatError),

    #[error("Invalid boolean value: {0}")]
    Boolean(String),

    #[error("Invalid JSON value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("value is empty")]
    Empty,

    #[error("list delimiter must not be empty")]
    EmptyDelimiter,
}

pub type EnvResult<T> = Result<T, EnvError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_missing_single_key_message() {
        let err = EnvError::missing("DATABASE_URL");
        assert!(err.is_missing());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: DATABASE_URL"
        );
    }

    #[test]
    fn test_missing_many_keys_message() {
        let err = EnvError::missing_any(["PRIMARY", "FALLBACK"]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: [PRIMARY, FALLBACK]"
        );
    }

    #[test]
    fn test_validation_carries_cause() {
        let cause = "abc".parse::<i64>().unwrap_err();
        let err = EnvError::validation("PORT", "abc", CastError::from(cause));

        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Failed to cast PORT='abc'"));
        assert!(err.source().is_some());

        match err {
            EnvError::Validation { key, value, source } => {
                assert_eq!(key, "PORT");
                assert_eq!(value, "abc");
                assert!(matches!(source, CastError::Integer(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_message_includes_location() {
        let err = EnvError::parse("/tmp/app.env", 3, "expected KEY=value");
        assert_eq!(err.to_string(), "/tmp/app.env:3: expected KEY=value");
    }
}
