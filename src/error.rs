//! The [`Error`] handle.
//!
//! An `Error` owns either a native layer (anything implementing
//! [`Failure`]) or a foreign `std::error::Error` that entered through `?` or
//! [`From`]. Foreign errors are leaves: they expose no cause, stack or location
//! of their own, but still take part in downcasting and `source()` walking.

use core::fmt;
use core::ops::Deref;
use core::panic::Location;
use core::slice;
use std::error::Error as StdError;

use crate::chain::{self, Chain};
use crate::combine::Combination;
use crate::failure::Failure;
use crate::format::{Render, Verbose, Verbosity};
use crate::kind::{Kind, KindError};
use crate::layer::{Fundamental, WithStack, Wrapped};
use crate::stack::Stack;

/// An annotated error.
///
/// ## Formatting
///
/// | format | output |
/// |--------|--------|
/// | `{}` | `outer: middle: root` |
/// | `{:+}` / `{:?}` | every layer's own message, innermost first, with stacks |
///
/// ## Conversions
///
/// Any `std::error::Error + Send + Sync + 'static` converts into `Error`, so `?`
/// works on foreign results. `Error` itself does not implement
/// `std::error::Error`; it derefs to `dyn std::error::Error + Send + Sync` and
/// converts into a boxed trait object with [`into_boxed`](Error::into_boxed) or
/// `From`.
pub struct Error {
    repr: Repr,
}

enum Repr {
    Native(Box<dyn Failure>),
    Foreign(Box<dyn StdError + Send + Sync + 'static>),
}

// ============================================================================
// Construction
// ============================================================================

impl Error {
    /// A leaf error carrying `message` and the caller's stack.
    ///
    /// ```rust
    /// use causeway::Error;
    ///
    /// let err = Error::new("connection refused");
    /// assert_eq!(err.to_string(), "connection refused");
    /// assert!(err.stack().is_some());
    /// ```
    #[track_caller]
    #[inline(never)]
    pub fn new(message: impl fmt::Display) -> Self {
        Self::from_failure(Fundamental::traced(message.to_string(), 1))
    }

    /// A leaf error carrying only `message`; no stack is captured.
    #[track_caller]
    pub fn plain(message: impl fmt::Display) -> Self {
        Self::from_failure(Fundamental::untraced(message.to_string()))
    }

    /// Wrap a layer type.
    pub fn from_failure<F: Failure>(failure: F) -> Self {
        Self {
            repr: Repr::Native(Box::new(failure)),
        }
    }

    /// Adopt an already boxed foreign error.
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self {
            repr: Repr::Foreign(error),
        }
    }

    // ========================================================================
    // Annotation
    // ========================================================================

    /// Add `message` in front of this error and record the caller's stack.
    ///
    /// The short rendering becomes `message: <previous>`.
    #[track_caller]
    #[inline(never)]
    pub fn wrap(self, message: impl fmt::Display) -> Self {
        Wrapped::traced(self, message.to_string(), 1)
    }

    /// Record the caller's stack without changing the message.
    #[track_caller]
    #[inline(never)]
    pub fn with_stack(self) -> Self {
        WithStack::traced(self, 1)
    }

    /// Like [`with_stack`](Error::with_stack), dropping `skip` further frames
    /// above the caller.
    #[track_caller]
    #[inline(never)]
    pub fn with_stack_skip(self, skip: usize) -> Self {
        WithStack::traced(self, skip.saturating_add(1))
    }

    /// Add `message` in front of this error without recording a stack.
    #[track_caller]
    pub fn with_message(self, message: impl fmt::Display) -> Self {
        Wrapped::untraced(self, message.to_string())
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// The immediate cause, one layer down.
    pub fn caused_by(&self) -> Option<&Error> {
        match &self.repr {
            Repr::Native(failure) => failure.caused_by(),
            Repr::Foreign(_) => None,
        }
    }

    /// The root cause: the innermost layer reachable through
    /// [`caused_by`](Error::caused_by). Returns `self` for leaves.
    ///
    /// For a combination this is the root cause of its first element.
    pub fn cause(&self) -> &Error {
        let mut current = self;
        while let Some(next) = current.caused_by() {
            current = next;
        }
        current
    }

    /// The stack recorded by this layer, if it recorded one.
    pub fn stack(&self) -> Option<&Stack> {
        match &self.repr {
            Repr::Native(failure) => failure.stack(),
            Repr::Foreign(_) => None,
        }
    }

    /// The source location of the call that created this layer.
    pub fn location(&self) -> Option<&'static Location<'static>> {
        match &self.repr {
            Repr::Native(failure) => failure.location(),
            Repr::Foreign(_) => None,
        }
    }

    /// This layer's own message, without any cause text.
    ///
    /// Empty for stack-only layers.
    pub fn layer_message(&self) -> impl fmt::Display + '_ {
        LayerMessage { error: self }
    }

    /// Every layer from this one down to the root cause, outermost first.
    pub fn layers(&self) -> impl Iterator<Item = &Error> {
        core::iter::successors(Some(self), |err| err.caused_by())
    }

    /// The `std::error::Error` view of this layer.
    pub fn as_dyn_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match &self.repr {
            Repr::Native(failure) => failure.as_dyn_error(),
            Repr::Foreign(error) => &**error,
        }
    }

    /// Mutable `std::error::Error` view of this layer.
    pub fn as_dyn_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        match &mut self.repr {
            Repr::Native(failure) => failure.as_dyn_error_mut(),
            Repr::Foreign(error) => &mut **error,
        }
    }

    /// Convert into a boxed `std::error::Error`, keeping the concrete layer type.
    pub fn into_boxed(self) -> Box<dyn StdError + Send + Sync + 'static> {
        match self.repr {
            Repr::Native(failure) => failure.into_dyn_error(),
            Repr::Foreign(error) => error,
        }
    }

    /// Whether this layer is of type `E`.
    pub fn is_layer<E: StdError + 'static>(&self) -> bool {
        self.as_dyn_error().is::<E>()
    }

    /// Borrow this layer as `E`. Only the outermost layer is checked; use
    /// [`find`](Error::find) to search the chain.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.as_dyn_error().downcast_ref::<E>()
    }

    /// Mutably borrow this layer as `E`.
    pub fn downcast_mut<E: StdError + 'static>(&mut self) -> Option<&mut E> {
        self.as_dyn_error_mut().downcast_mut::<E>()
    }

    /// Take this layer as `E`, or give the error back unchanged.
    pub fn downcast<E: StdError + 'static>(self) -> Result<E, Self> {
        if !self.is_layer::<E>() {
            return Err(self);
        }
        self.into_boxed()
            .downcast::<E>()
            .map(|boxed| *boxed)
            .map_err(Error::from_boxed)
    }

    // ========================================================================
    // Chain-compatibility bridge
    // ========================================================================

    /// Iterate over this error and its `source()` chain.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self.as_dyn_error())
    }

    /// Whether this error or anything in its `source()` chain equals `target`.
    pub fn is<T: StdError + PartialEq + 'static>(&self, target: &T) -> bool {
        chain::is(self.as_dyn_error(), target)
    }

    /// The first error of type `T` in the `source()` chain.
    pub fn find<T: StdError + 'static>(&self) -> Option<&T> {
        chain::find(self.as_dyn_error())
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    /// The elements of a combination, or a one-element slice holding `self`.
    pub fn errors(&self) -> &[Error] {
        match self.downcast_ref::<Combination>() {
            Some(combination) => combination.errors(),
            None => slice::from_ref(self),
        }
    }

    /// Split a combination into its elements; any other error becomes a
    /// one-element vector.
    pub fn uncombine(self) -> Vec<Error> {
        match self.downcast::<Combination>() {
            Ok(combination) => combination.into_errors(),
            Err(err) => vec![err],
        }
    }

    // ========================================================================
    // Kinds
    // ========================================================================

    /// The first sentinel kind found in the chain.
    pub fn kind(&self) -> Option<Kind> {
        self.find::<KindError>().map(KindError::kind)
    }

    /// Whether the chain carries a sentinel of `kind`.
    pub fn is_kind(&self, kind: Kind) -> bool {
        self.chain()
            .filter_map(|err| err.downcast_ref::<KindError>())
            .any(|err| err.kind() == kind)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Format at an explicit verbosity, ignoring formatter flags.
    pub fn render(&self, verbosity: Verbosity) -> Render<'_, Self> {
        Render::new(self, verbosity)
    }

    pub(crate) fn fmt_full(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Native(failure) => failure.fmt_full(f),
            Repr::Foreign(error) => write!(f, "{}", error),
        }
    }

    fn fmt_layer(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Native(failure) => failure.fmt_layer(f),
            Repr::Foreign(error) => write!(f, "{}", error),
        }
    }
}

struct LayerMessage<'a> {
    error: &'a Error,
}

impl fmt::Display for LayerMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt_layer(f)
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl Verbose for Error {
    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, verbosity: Verbosity) -> fmt::Result {
        match (verbosity, &self.repr) {
            (Verbosity::Full, _) => self.fmt_full(f),
            (Verbosity::Short, Repr::Native(failure)) => write!(f, "{}", failure),
            (Verbosity::Short, Repr::Foreign(error)) => write!(f, "{}", error),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, Verbosity::of(f))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_full(f)
    }
}

impl Deref for Error {
    type Target = dyn StdError + Send + Sync + 'static;

    fn deref(&self) -> &Self::Target {
        self.as_dyn_error()
    }
}

impl AsRef<dyn StdError + Send + Sync> for Error {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.as_dyn_error()
    }
}

impl AsRef<dyn StdError> for Error {
    fn as_ref(&self) -> &(dyn StdError + 'static) {
        self.as_dyn_error()
    }
}

impl<E> From<E> for Error
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::from_boxed(Box::new(error))
    }
}

impl From<Error> for Box<dyn StdError + Send + Sync + 'static> {
    fn from(error: Error) -> Self {
        error.into_boxed()
    }
}

impl From<Error> for Box<dyn StdError + 'static> {
    fn from(error: Error) -> Self {
        error.into_boxed()
    }
}
