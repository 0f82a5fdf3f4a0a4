//! The [`Failure`] trait: what one layer of an error chain can expose.
//!
//! Every layer type in this crate ([`Fundamental`](crate::Fundamental),
//! [`Wrapped`](crate::Wrapped), [`WithStack`](crate::WithStack),
//! [`Combination`](crate::Combination), [`KindError`](crate::KindError)) is a
//! plain struct implementing `Failure`. Cause resolution and formatting only ever
//! ask a layer for its capabilities, so a type defined outside this crate takes
//! part in the chain exactly like the built-in ones.

use core::fmt;
use core::panic::Location;
use std::error::Error as StdError;

use crate::error::Error;
use crate::format::{Verbose, Verbosity};
use crate::stack::Stack;

// ============================================================================
// AsDynError - object-safe access to the std::error::Error view
// ============================================================================

/// Converts a concrete error into `dyn std::error::Error` trait objects.
///
/// Implemented for every `std::error::Error + Send + Sync + 'static` type, so it
/// never needs a manual impl. It exists so `dyn Failure` can hand out its
/// `std::error::Error` view for downcasting and `source()` walking.
pub trait AsDynError: Send + Sync + 'static {
    /// Borrow as a `std::error::Error` trait object.
    fn as_dyn_error(&self) -> &(dyn StdError + Send + Sync + 'static);

    /// Mutably borrow as a `std::error::Error` trait object.
    fn as_dyn_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static);

    /// Convert a boxed value into a boxed `std::error::Error` trait object.
    fn into_dyn_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static>;
}

impl<T: StdError + Send + Sync + 'static> AsDynError for T {
    fn as_dyn_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_dyn_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_dyn_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }
}

// ============================================================================
// Failure
// ============================================================================

/// One layer of an error chain.
///
/// `Display` is the layer's short message: the whole `outer: inner` text for
/// annotation layers, the plain text for leaves. The remaining methods are
/// capabilities with conservative defaults; a layer that overrides none of them
/// is a leaf without a stack.
///
/// ## Example
///
/// ```rust
/// use causeway::{Error, Failure};
/// use std::fmt;
///
/// /// An annotation layer that records a retry count.
/// #[derive(Debug)]
/// struct Retried {
///     attempts: u32,
///     cause: Error,
/// }
///
/// impl fmt::Display for Retried {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "after {} attempts: {}", self.attempts, self.cause)
///     }
/// }
///
/// impl std::error::Error for Retried {
///     fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
///         Some(self.cause.as_dyn_error())
///     }
/// }
///
/// impl Failure for Retried {
///     fn caused_by(&self) -> Option<&Error> {
///         Some(&self.cause)
///     }
///
///     fn fmt_layer(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "after {} attempts", self.attempts)
///     }
/// }
///
/// let root = Error::plain("timeout");
/// let err = Error::from_failure(Retried { attempts: 3, cause: root });
/// assert_eq!(err.to_string(), "after 3 attempts: timeout");
/// assert_eq!(err.cause().to_string(), "timeout");
/// ```
pub trait Failure: StdError + AsDynError {
    /// The immediate cause, for annotation layers.
    ///
    /// Returning `Some` is what makes a layer transparent to
    /// [`Error::cause`](crate::Error::cause).
    fn caused_by(&self) -> Option<&Error> {
        None
    }

    /// Stack captured when this layer was created.
    fn stack(&self) -> Option<&Stack> {
        None
    }

    /// Source location of the call that created this layer.
    fn location(&self) -> Option<&'static Location<'static>> {
        None
    }

    /// This layer's own message, without its cause's.
    ///
    /// Defaults to `Display`, which is correct for leaves. Annotation layers
    /// write only the text they added; stack-only layers write nothing.
    fn fmt_layer(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }

    /// Full diagnostic rendering.
    ///
    /// The default prints the cause's full rendering first, then this layer's
    /// own message on a new line, then this layer's stack.
    fn fmt_full(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cause) = self.caused_by() {
            cause.fmt_full(f)?;
            f.write_str("\n")?;
        }
        self.fmt_layer(f)?;
        if let Some(stack) = self.stack() {
            stack.fmt_with(f, Verbosity::Full)?;
        }
        Ok(())
    }
}
