//! Error types for task tracker domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The project name exceeds the accepted length.
    #[error("project name has {0} characters, at most 255 are allowed")]
    ProjectNameTooLong(usize),

    /// The project description exceeds the accepted length.
    #[error("project description has {0} characters, at most 1000 are allowed")]
    ProjectDescriptionTooLong(usize),

    /// A page must hold at least one item.
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(u32),
}

/// Error returned while parsing enumerated domain values from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseDomainValueError {
    /// Name of the enumeration being parsed.
    pub kind: &'static str,
    /// Offending input.
    pub value: String,
}

impl ParseDomainValueError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
