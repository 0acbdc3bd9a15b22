//! Error types for composition, emission and rendering.
//!
//! Composition and emission errors are never fatal: the driver turns them
//! into diagnostics scoped to the originating declaration and moves on.

use thiserror::Error;

use crate::ir::{DirectiveKind, ElementKind};

/// Error raised while composing an artifact from a directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// The directive was attached to an element it cannot be generated for.
    #[error("@{} is only applicable to a {expected}, but '{declaration}' is a {found}", .directive.annotation_name())]
    WrongElementKind {
        declaration: String,
        found: ElementKind,
        expected: &'static str,
        directive: DirectiveKind,
    },
}

impl ComposeError {
    /// Create a wrong-element-kind error.
    pub fn wrong_element_kind(
        declaration: impl Into<String>,
        found: ElementKind,
        directive: DirectiveKind,
    ) -> Self {
        Self::WrongElementKind {
            declaration: declaration.into(),
            found,
            expected: directive.expected_elements(),
            directive,
        }
    }
}

/// Failure reported by an emission sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// The target already exists and may not be replaced.
    #[error("{target} already exists at {path}")]
    Conflict { target: String, path: String },

    /// The sink failed to persist the artifact.
    #[error("failed to write {target}: {message}")]
    Io { target: String, message: String },

    /// The sink refused the artifact for another reason.
    #[error("{target} was rejected: {reason}")]
    Rejected { target: String, reason: String },
}

impl EmitError {
    /// Create a conflict error.
    pub fn conflict(target: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Conflict {
            target: target.into(),
            path: path.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(target: impl Into<String>, message: impl ToString) -> Self {
        Self::Io {
            target: target.into(),
            message: message.to_string(),
        }
    }

    /// Create a rejection error.
    pub fn rejected(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Qualified name of the artifact that failed.
    pub fn target(&self) -> &str {
        match self {
            Self::Conflict { target, .. }
            | Self::Io { target, .. }
            | Self::Rejected { target, .. } => target,
        }
    }
}

/// Failure while rendering an artifact to text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to render {target}: {message}")]
pub struct RenderError {
    pub target: String,
    pub message: String,
}

impl RenderError {
    pub fn new(target: impl Into<String>, message: impl ToString) -> Self {
        Self {
            target: target.into(),
            message: message.to_string(),
        }
    }
}
