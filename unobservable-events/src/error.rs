//! Error types for event declaration, lookup and dispatch

use crate::name::EventName;
use thiserror::Error;

/// Broad family an [`EventError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed handler specification or declaration target
    Argument,
    /// Lookup of an event (or accessor) that was never declared
    Name,
    /// Introspection on a value that is not a type descriptor
    Type,
}

/// Errors surfaced synchronously to the caller.
///
/// Handler failures are never reported through this type; see [`HandlerError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("No event handler specified")]
    NoHandler,

    #[error("Argument is not callable: {0}")]
    NotCallable(String),

    #[error("Too many arguments for an event handler: expected at most 2, got {0}")]
    TooManyArguments(usize),

    #[error("Type {0} does not support events")]
    EventsNotSupported(String),

    #[error("Undefined event: {0}")]
    UndefinedEvent(EventName),

    #[error("Undefined event accessor: {0}")]
    UndefinedAccessor(EventName),

    #[error("Expected a type descriptor, got {0}")]
    NotAType(String),
}

impl EventError {
    /// Error family, matching the argument/name/type taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EventError::NoHandler
            | EventError::NotCallable(_)
            | EventError::TooManyArguments(_)
            | EventError::EventsNotSupported(_) => ErrorKind::Argument,
            EventError::UndefinedEvent(_) | EventError::UndefinedAccessor(_) => ErrorKind::Name,
            EventError::NotAType(_) => ErrorKind::Type,
        }
    }
}

/// Error returned (or raised as a panic) from inside a handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Undefined method `{method}` for {receiver}")]
    UndefinedMethod { receiver: String, method: String },

    #[error("Handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }

    /// Shorthand for [`HandlerError::UndefinedMethod`].
    pub fn undefined_method(receiver: impl Into<String>, method: impl Into<String>) -> Self {
        HandlerError::UndefinedMethod {
            receiver: receiver.into(),
            method: method.into(),
        }
    }
}

/// Diagnostic record for a handler failure suppressed during dispatch.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    /// Event the handler was attached to, when the dispatcher knows it
    pub event: Option<EventName>,

    /// Position of the handler in the dispatch snapshot
    pub position: usize,

    /// Human readable handler description
    pub handler: String,

    /// What went wrong
    pub error: HandlerError,
}
