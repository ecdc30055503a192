//! Error types of the harness.

use thiserror::Error;

/// Errors raised while building or activating a registry.
///
/// Everything but [`ReentrantActivation`](Self::ReentrantActivation) can only
/// happen while a [`Runner`](crate::runner::Runner) is constructed and means the
/// configuration does not fit the registered shared library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HarnessError {
    #[error("unknown shared context {context:?} requested by {component}")]
    UnknownContext { component: String, context: String },

    #[error("no shared behavior {behavior:?} registered for {component}")]
    UnknownBehavior { component: String, behavior: String },

    #[error("component {0} is already registered")]
    DuplicateComponent(String),

    #[error("registry is already active")]
    ReentrantActivation,
}

/// Error of a single [`Runner::run`](crate::runner::Runner::run) call.
#[derive(Debug, Error)]
pub enum RunError<E> {
    #[error(transparent)]
    Harness(#[from] HarnessError),

    /// The execution engine failed, the error is passed through untouched.
    #[error(transparent)]
    Engine(E),
}

impl<E> RunError<E> {
    pub fn engine_error(&self) -> Option<&E> {
        match self {
            RunError::Engine(err) => Some(err),
            RunError::Harness(_) => None,
        }
    }
}
