//! Error types for chart generation
//!
//! Every failure is fatal to the current run. Errors carry the operation that
//! failed, the chart being generated and the offending path or template so a
//! report on stderr is enough to diagnose the problem.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`GenerationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    FileSystem,
    Template,
}

/// Failure reported by a [`TemplateSource`](crate::templates::TemplateSource)
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{name}' not found in catalog")]
    NotFound { name: String },

    #[error("failed to parse template '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to execute template '{name}': {source}")]
    Execution {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Error returned by parameter validation and by [`generate_chart`](crate::generate_chart)
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A required parameter is missing or malformed. Raised before any file is touched.
    #[error("{operation}: {message}{}", flag.map(|f| format!(" (flag {})", f)).unwrap_or_default())]
    Validation {
        operation: &'static str,
        message: String,
        flag: Option<&'static str>,
    },

    /// A directory or file operation on the output store failed
    #[error("{operation} failed for chart '{chart}' at {}: {source}", path.display())]
    FileSystem {
        operation: &'static str,
        chart: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template could not be read, parsed or executed
    #[error("{operation} failed for chart '{chart}' writing {}: {source}", output.display())]
    Template {
        operation: &'static str,
        chart: String,
        output: PathBuf,
        #[source]
        source: TemplateError,
    },
}

impl GenerationError {
    pub fn validation(operation: &'static str, message: impl Into<String>) -> Self {
        GenerationError::Validation {
            operation,
            message: message.into(),
            flag: None,
        }
    }

    /// Attach the CLI flag that carries the invalid value
    pub fn with_flag(self, flag: &'static str) -> Self {
        match self {
            GenerationError::Validation {
                operation, message, ..
            } => GenerationError::Validation {
                operation,
                message,
                flag: Some(flag),
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Validation { .. } => ErrorKind::Validation,
            GenerationError::FileSystem { .. } => ErrorKind::FileSystem,
            GenerationError::Template { .. } => ErrorKind::Template,
        }
    }

    /// Name of the operation that failed (e.g. `create-directory`, `render-template`)
    pub fn operation(&self) -> &'static str {
        match self {
            GenerationError::Validation { operation, .. }
            | GenerationError::FileSystem { operation, .. }
            | GenerationError::Template { operation, .. } => operation,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, GenerationError>;
