//! Rendering verbosity.
//!
//! Every renderable type in this crate reads the `+` flag of the formatter
//! (`{:+}`) as a request for the full diagnostic form. When the verbosity is only
//! known at runtime, pass it explicitly through [`Render`] instead.

use core::fmt;

/// How much detail to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Verbosity {
    /// Messages only, one logical line (`{}`).
    #[default]
    Short,
    /// Messages layer by layer with captured stacks (`{:+}` or `{:?}`).
    Full,
}

impl Verbosity {
    /// Verbosity requested by a formatter's flags.
    #[inline]
    pub fn of(f: &fmt::Formatter<'_>) -> Self {
        if f.sign_plus() {
            Verbosity::Full
        } else {
            Verbosity::Short
        }
    }

    /// Whether this is [`Verbosity::Full`].
    #[inline]
    pub fn is_full(self) -> bool {
        matches!(self, Verbosity::Full)
    }
}

/// Types that can be formatted at either verbosity.
pub trait Verbose {
    /// Format at the given verbosity.
    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, verbosity: Verbosity) -> fmt::Result;
}

/// A value paired with a fixed verbosity; formats identically regardless of
/// the `{}` / `{:+}` flags it is printed with.
///
/// ```rust
/// use causeway::{Error, Verbosity};
///
/// let err = Error::plain("disk full").wrap("saving");
/// assert_eq!(err.render(Verbosity::Short).to_string(), "saving: disk full");
/// assert!(err.render(Verbosity::Full).to_string().starts_with("disk full\nsaving"));
/// ```
pub struct Render<'a, T: ?Sized> {
    value: &'a T,
    verbosity: Verbosity,
}

impl<'a, T: ?Sized> Render<'a, T> {
    /// Pair `value` with `verbosity`.
    #[inline]
    pub fn new(value: &'a T, verbosity: Verbosity) -> Self {
        Self { value, verbosity }
    }

    /// The verbosity this adapter renders at.
    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

impl<T: Verbose + ?Sized> fmt::Display for Render<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt_with(f, self.verbosity)
    }
}

impl<T: Verbose + ?Sized> fmt::Debug for Render<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt_with(f, self.verbosity)
    }
}
