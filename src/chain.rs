//! Interop with `std::error::Error::source`.
//!
//! Every annotation layer reports its immediate cause through `source()`, and a
//! combination reports its first element. The functions here work on any
//! `dyn std::error::Error`, so they apply equally to an [`Error`](crate::Error)
//! (through `Deref`), a `Box<dyn Error>` or an `anyhow::Error`.

use std::error::Error as StdError;

/// Iterator over an error and its `source()` chain, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    /// Start at `head`.
    pub fn new(head: &'a (dyn StdError + 'static)) -> Self {
        Self { next: Some(head) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl core::iter::FusedIterator for Chain<'_> {}

/// Iterate over `err` and everything reachable through `source()`.
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain::new(err)
}

/// The immediate cause one level down, or `None` for a leaf.
pub fn unwrap<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    err.source()
}

/// Whether `err`, or any error reachable by unwrapping it, equals `target`.
///
/// ```rust
/// use causeway::Error;
///
/// #[derive(Debug, PartialEq)]
/// struct Timeout;
///
/// impl std::fmt::Display for Timeout {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("timeout")
///     }
/// }
///
/// impl std::error::Error for Timeout {}
///
/// let err = Error::from(Timeout).wrap("fetching index");
/// assert!(causeway::is(&*err, &Timeout));
/// ```
pub fn is<T>(err: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + PartialEq + 'static,
{
    chain(err).any(|e| e.downcast_ref::<T>() == Some(target))
}

/// The first error of type `T` reachable by unwrapping `err` (including `err`).
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    chain(err).find_map(|e| e.downcast_ref::<T>())
}
