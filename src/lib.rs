//! # causeway - error annotation with stacks and root causes
//!
//! Wrap errors with context as they travel up the call chain, record where that
//! happened, and get back to the original failure when you need to act on it.
//!
//! ```text
//! $ {}   -> saving profile: writing cache: disk full
//! $ {:+} -> disk full
//!           writing cache
//!           app::cache::store
//!           	/src/app/src/cache.rs:41
//!           app::profile::save
//!           	/src/app/src/profile.rs:88
//!           ...
//!           saving profile
//!           ...
//! ```
//!
//! ## Try It Now
//!
//! ```rust
//! use causeway::{Error, ResultExt};
//!
//! fn store() -> Result<(), Error> {
//!     Err(Error::new("disk full"))
//! }
//!
//! fn save() -> Result<(), Error> {
//!     store().wrap("writing cache")?;
//!     Ok(())
//! }
//!
//! let err = save().wrap("saving profile").unwrap_err();
//! assert_eq!(err.to_string(), "saving profile: writing cache: disk full");
//! assert_eq!(err.cause().to_string(), "disk full");
//! ```
//!
//! ## Annotating
//!
//! | Call | Message | Stack |
//! |------|---------|-------|
//! | [`Error::new(msg)`](Error::new) / [`format_err!`] | `msg` | recorded |
//! | [`Error::plain(msg)`](Error::plain) | `msg` | none |
//! | [`err.wrap(msg)`](Error::wrap) | `msg: <err>` | recorded |
//! | [`err.with_stack()`](Error::with_stack) | `<err>` | recorded |
//! | [`err.with_message(msg)`](Error::with_message) | `msg: <err>` | none |
//!
//! The same operations exist on `Result` through [`ResultExt`], and on
//! `Option<Error>` as the free functions [`wrap`], [`with_stack`],
//! [`with_message`] and [`cause`], where an absent error stays absent.
//!
//! Every annotating call is `#[track_caller]`: besides the stack, each layer
//! remembers the exact [`location`](Error::location) it was created at.
//!
//! ## Rendering
//!
//! - `{}` gives the short form: every layer's message joined with `": "`.
//! - `{:+}` and `{:?}` give the full form: each layer's own message on its own
//!   line, innermost first, followed by the stack that layer recorded.
//! - [`Error::render`] takes the [`Verbosity`] as an argument instead.
//!
//! Stacks are captured as raw instruction pointers; symbols are only resolved
//! when a full rendering is produced. Unresolvable frames print as `unknown`.
//!
//! ## Combining
//!
//! [`combine`] folds several independent errors into one [`Combination`] and
//! [`uncombine`] splits it again. Absent entries are dropped.
//!
//! ## Interop
//!
//! [`Error`] converts from any `std::error::Error + Send + Sync + 'static`, so `?`
//! works on foreign results, and every layer reports its cause through
//! `source()`. [`is`], [`find`] and [`unwrap`] walk that chain for any
//! `dyn std::error::Error`.

#![deny(unsafe_code)]

mod chain;
mod combine;
mod error;
mod ext;
mod failure;
mod format;
pub mod kind;
mod layer;
pub mod prelude;
pub mod report;
pub mod stack;

pub use chain::{Chain, chain, find, is, unwrap};
pub use combine::{Combination, combine, uncombine};
pub use error::Error;
pub use ext::{OptionExt, ResultExt};
pub use failure::{AsDynError, Failure};
pub use format::{Render, Verbose, Verbosity};
pub use kind::{Kind, KindError};
pub use layer::{Fundamental, WithStack, Wrapped};
pub use stack::{Frame, Stack, Symbol};

// ============================================================================
// Option-level annotation
// ============================================================================

/// Add `message` in front of `err` and record the caller's stack.
///
/// `None` stays `None`.
///
/// ```rust
/// use causeway::{Error, wrap};
///
/// assert!(wrap(None, "ignored").is_none());
///
/// let err = wrap(Some(Error::plain("e0")), "ctx").unwrap();
/// assert_eq!(err.to_string(), "ctx: e0");
/// ```
#[track_caller]
#[inline(never)]
pub fn wrap(err: Option<Error>, message: impl core::fmt::Display) -> Option<Error> {
    match err {
        Some(err) => Some(layer::Wrapped::traced(err, message.to_string(), 1)),
        None => None,
    }
}

/// Record the caller's stack on `err` without changing its message.
///
/// `None` stays `None`.
#[track_caller]
#[inline(never)]
pub fn with_stack(err: Option<Error>) -> Option<Error> {
    match err {
        Some(err) => Some(layer::WithStack::traced(err, 1)),
        None => None,
    }
}

/// Like [`with_stack`], dropping `skip` further frames above the caller.
///
/// Helpers that annotate on behalf of their own caller pass `skip = 1`.
#[track_caller]
#[inline(never)]
pub fn with_stack_skip(skip: usize, err: Option<Error>) -> Option<Error> {
    match err {
        Some(err) => Some(layer::WithStack::traced(err, skip.saturating_add(1))),
        None => None,
    }
}

/// Add `message` in front of `err` without recording a stack.
///
/// `None` stays `None`.
#[track_caller]
pub fn with_message(err: Option<Error>, message: impl core::fmt::Display) -> Option<Error> {
    match err {
        Some(err) => Some(layer::Wrapped::untraced(err, message.to_string())),
        None => None,
    }
}

/// The root cause of `err`, or `None` when `err` is `None`.
pub fn cause(err: Option<&Error>) -> Option<&Error> {
    err.map(Error::cause)
}

// ============================================================================
// Macros
// ============================================================================

/// Build an [`Error`] from a format string, recording the caller's stack.
///
/// ```rust
/// let err = causeway::format_err!("port {} in use", 8080);
/// assert_eq!(err.to_string(), "port 8080 in use");
/// ```
#[macro_export]
macro_rules! format_err {
    ($($arg:tt)+) => {
        $crate::Error::new(::core::format_args!($($arg)+))
    };
}

/// Return early with an error built by [`format_err!`].
///
/// ```rust
/// use causeway::{Error, bail};
///
/// fn check(n: u32) -> Result<u32, Error> {
///     if n == 0 {
///         bail!("zero is not allowed");
///     }
///     Ok(n)
/// }
///
/// assert_eq!(check(0).unwrap_err().to_string(), "zero is not allowed");
/// ```
#[macro_export]
macro_rules! bail {
    ($($arg:tt)+) => {
        return ::core::result::Result::Err(::core::convert::From::from($crate::format_err!($($arg)+)))
    };
}

/// Return early with an error built by [`format_err!`] unless `cond` holds.
///
/// ```rust
/// use causeway::{Error, ensure};
///
/// fn check(len: usize) -> Result<(), Error> {
///     ensure!(len <= 8, "name too long: {} bytes", len);
///     Ok(())
/// }
///
/// assert!(check(4).is_ok());
/// assert_eq!(check(12).unwrap_err().to_string(), "name too long: 12 bytes");
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::bail!($($arg)+);
        }
    };
}

#[cfg(test)]
mod tests;
