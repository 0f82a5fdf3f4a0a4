//! Extension traits for annotating errors directly on `Result` and `Option`.
//!
//! - [`ResultExt`]: `.wrap()`, `.with_stack()` and `.with_message()` on any
//!   `Result<T, E>` whose error converts into [`Error`]
//! - [`OptionExt`]: `.ok_or_error()` turns `None` into a new leaf error
//!
//! The `Ok` / `Some` branch passes through untouched and captures nothing.

use core::fmt;

use crate::error::Error;
use crate::layer::{Fundamental, WithStack, Wrapped};

// ============================================================================
// ResultExt
// ============================================================================

/// Annotate the error of a `Result`, converting it into [`Error`] first.
///
/// ## Example
///
/// ```rust
/// use causeway::{Error, ResultExt};
///
/// fn read_config(path: &str) -> Result<String, Error> {
///     let text = std::fs::read_to_string(path).wrap(format_args!("reading {}", path))?;
///     Ok(text)
/// }
///
/// let err = read_config("/definitely/not/here.toml").unwrap_err();
/// assert!(err.to_string().starts_with("reading /definitely/not/here.toml: "));
/// assert!(err.cause().downcast_ref::<std::io::Error>().is_some());
/// ```
pub trait ResultExt<T> {
    /// Add `message` in front of the error and record the caller's stack.
    #[track_caller]
    fn wrap(self, message: impl fmt::Display) -> Result<T, Error>;

    /// Like [`wrap`](Self::wrap), building the message only on error.
    #[track_caller]
    fn wrap_with<M: fmt::Display>(self, message: impl FnOnce() -> M) -> Result<T, Error>;

    /// Record the caller's stack without changing the message.
    #[track_caller]
    fn with_stack(self) -> Result<T, Error>;

    /// Add `message` in front of the error without recording a stack.
    #[track_caller]
    fn with_message(self, message: impl fmt::Display) -> Result<T, Error>;
}

impl<T, E: Into<Error>> ResultExt<T> for Result<T, E> {
    #[track_caller]
    #[inline(never)]
    fn wrap(self, message: impl fmt::Display) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Wrapped::traced(e.into(), message.to_string(), 1)),
        }
    }

    #[track_caller]
    #[inline(never)]
    fn wrap_with<M: fmt::Display>(self, message: impl FnOnce() -> M) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Wrapped::traced(e.into(), message().to_string(), 1)),
        }
    }

    #[track_caller]
    #[inline(never)]
    fn with_stack(self) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(WithStack::traced(e.into(), 1)),
        }
    }

    #[track_caller]
    #[inline]
    fn with_message(self, message: impl fmt::Display) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Wrapped::untraced(e.into(), message.to_string())),
        }
    }
}

// ============================================================================
// OptionExt
// ============================================================================

/// Turn a missing value into an [`Error`].
///
/// ```rust
/// use causeway::OptionExt;
///
/// let port: Option<u16> = None;
/// let err = port.ok_or_error("port not configured").unwrap_err();
/// assert_eq!(err.to_string(), "port not configured");
/// ```
pub trait OptionExt<T> {
    /// `Some(v)` becomes `Ok(v)`; `None` becomes a leaf error carrying
    /// `message` and the caller's stack.
    #[track_caller]
    fn ok_or_error(self, message: impl fmt::Display) -> Result<T, Error>;
}

impl<T> OptionExt<T> for Option<T> {
    #[track_caller]
    #[inline(never)]
    fn ok_or_error(self, message: impl fmt::Display) -> Result<T, Error> {
        match self {
            Some(v) => Ok(v),
            None => Err(Error::from_failure(Fundamental::traced(
                message.to_string(),
                1,
            ))),
        }
    }
}
