//! The built-in layers of an error chain.
//!
//! - [`Fundamental`]: a leaf message, with or without a stack
//! - [`Wrapped`]: a message on top of a cause; `wrap` gives it a stack,
//!   `with_message` does not
//! - [`WithStack`]: a stack on top of a cause, adding no text
//!
//! The crate-private constructors take a `skip` count: the number of frames
//! between the constructor and the caller whose stack should be recorded.

use core::fmt;
use core::panic::Location;
use std::error::Error as StdError;

use crate::error::Error;
use crate::failure::Failure;
use crate::format::{Verbose, Verbosity};
use crate::stack::Stack;

// ============================================================================
// Fundamental - leaf
// ============================================================================

/// A leaf error: a message with no cause.
///
/// Created by [`Error::new`] (with a stack), [`Error::plain`] (without) and the
/// [`format_err!`](crate::format_err) macro.
#[derive(Debug)]
pub struct Fundamental {
    message: String,
    stack: Option<Stack>,
    location: &'static Location<'static>,
}

impl Fundamental {
    #[track_caller]
    #[inline(never)]
    pub(crate) fn traced(message: String, skip: usize) -> Self {
        Self {
            message,
            stack: Some(Stack::capture(skip.saturating_add(1))),
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub(crate) fn untraced(message: String) -> Self {
        Self {
            message,
            stack: None,
            location: Location::caller(),
        }
    }

    /// The message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Fundamental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Fundamental {}

impl Failure for Fundamental {
    fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    fn location(&self) -> Option<&'static Location<'static>> {
        Some(self.location)
    }
}

// ============================================================================
// Wrapped - message + cause
// ============================================================================

/// A message layered over a cause, rendered `message: cause`.
///
/// [`Error::wrap`] records a stack at the wrap site; [`Error::with_message`]
/// does not.
#[derive(Debug)]
pub struct Wrapped {
    message: String,
    cause: Error,
    stack: Option<Stack>,
    location: &'static Location<'static>,
}

impl Wrapped {
    #[track_caller]
    #[inline(never)]
    pub(crate) fn traced(cause: Error, message: String, skip: usize) -> Error {
        Error::from_failure(Self {
            message,
            cause,
            stack: Some(Stack::capture(skip.saturating_add(1))),
            location: Location::caller(),
        })
    }

    #[track_caller]
    pub(crate) fn untraced(cause: Error, message: String) -> Error {
        Error::from_failure(Self {
            message,
            cause,
            stack: None,
            location: Location::caller(),
        })
    }

    /// The message this layer added.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The immediate cause.
    pub fn cause(&self) -> &Error {
        &self.cause
    }
}

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.cause)
    }
}

impl StdError for Wrapped {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_dyn_error())
    }
}

impl Failure for Wrapped {
    fn caused_by(&self) -> Option<&Error> {
        Some(&self.cause)
    }

    fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    fn location(&self) -> Option<&'static Location<'static>> {
        Some(self.location)
    }

    fn fmt_layer(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ============================================================================
// WithStack - stack + cause
// ============================================================================

/// A stack layered over a cause. Adds no text: its message is the cause's.
#[derive(Debug)]
pub struct WithStack {
    cause: Error,
    stack: Stack,
    location: &'static Location<'static>,
}

impl WithStack {
    #[track_caller]
    #[inline(never)]
    pub(crate) fn traced(cause: Error, skip: usize) -> Error {
        Error::from_failure(Self {
            cause,
            stack: Stack::capture(skip.saturating_add(1)),
            location: Location::caller(),
        })
    }

    /// The immediate cause.
    pub fn cause(&self) -> &Error {
        &self.cause
    }
}

impl fmt::Display for WithStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cause)
    }
}

impl StdError for WithStack {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_dyn_error())
    }
}

impl Failure for WithStack {
    fn caused_by(&self) -> Option<&Error> {
        Some(&self.cause)
    }

    fn stack(&self) -> Option<&Stack> {
        Some(&self.stack)
    }

    fn location(&self) -> Option<&'static Location<'static>> {
        Some(self.location)
    }

    fn fmt_layer(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }

    fn fmt_full(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cause.fmt_full(f)?;
        self.stack.fmt_with(f, Verbosity::Full)
    }
}
