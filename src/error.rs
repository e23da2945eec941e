//! Error types.

use thiserror::Error;

use crate::launch::LaunchConfiguration;

/// Failure of a transition computation.
///
/// All variants are input errors from the navigation-graph builder: a run
/// that hits one is aborted and returns no graph.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum TransitionError {
    /// Neither or both of `standard` / `singleTop` are set.
    #[error("malformed launch configuration {config}")]
    MalformedConfiguration { config: LaunchConfiguration },

    /// An `invalid` or `finish` configuration was used for a launch.
    #[error("launch configuration {config} cannot drive a launch transition")]
    InvalidConfiguration { config: LaunchConfiguration },

    /// A transition was requested from an empty stack.
    #[error("cannot transition from an empty activity stack")]
    EmptyStack,
}

pub type TransitionResult<T> = Result<T, TransitionError>;

/// Failure to read a textual navigation graph.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("no main activity declared")]
    MissingMain,
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            line,
            message: message.into(),
        }
    }
}
