//! Call-stack capture and frame formatting.
//!
//! A [`Stack`] stores raw instruction pointers taken when an error is created or
//! wrapped. Nothing is symbolized at capture time: file, line and function name
//! are looked up through `backtrace` only when a frame is actually rendered, so an
//! error that is only ever displayed with `{}` (or dropped) never pays for it.

use core::ffi::c_void;
use core::fmt;

use crate::format::{Render, Verbose, Verbosity};

/// Maximum number of frames kept by a single capture.
pub const MAX_DEPTH: usize = 32;

/// Frames walked while looking for the capture anchor plus the kept frames.
const SCAN_DEPTH: usize = MAX_DEPTH + 16;

/// Text used for any part of a frame that cannot be resolved.
const UNKNOWN: &str = "unknown";

// ============================================================================
// FrameVec - configurable storage for captured frames
// ============================================================================

/// Stack-first frame storage with 16 inline slots (smallvec-frames).
#[cfg(feature = "smallvec-frames")]
type FrameVec = smallvec::SmallVec<[Frame; 16]>;

/// Stack-first frame storage with 16 inline slots (tinyvec-frames).
#[cfg(all(feature = "tinyvec-frames", not(feature = "smallvec-frames")))]
type FrameVec = tinyvec::TinyVec<[Frame; 16]>;

/// Heap frame storage (default).
#[cfg(not(any(feature = "smallvec-frames", feature = "tinyvec-frames")))]
type FrameVec = Vec<Frame>;

// ============================================================================
// Frame
// ============================================================================

/// A single captured call site.
///
/// Holds only the instruction pointer. An instruction pointer of zero is the
/// unresolvable frame ([`Frame::UNKNOWN`]); it formats as `unknown` / `unknown:0`.
///
/// ## Formatting
///
/// | format | output |
/// |--------|--------|
/// | `{}` | `file.rs:42` |
/// | `{:+}` | `function\n\t/full/path/file.rs:42` |
/// | [`source(Short)`](Frame::source) | `file.rs` |
/// | [`source(Full)`](Frame::source) | `function\n\t/full/path/file.rs` |
///
/// A frame whose function resolves but whose file does not prints
/// `function\n\tunknown:0` in the full form.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Frame {
    ip: usize,
}

impl Frame {
    /// The frame that never resolves.
    pub const UNKNOWN: Frame = Frame { ip: 0 };

    /// Build a frame from a raw instruction pointer.
    #[inline]
    pub const fn from_ip(ip: usize) -> Self {
        Self { ip }
    }

    /// The raw instruction pointer.
    #[inline]
    pub const fn ip(&self) -> usize {
        self.ip
    }

    /// Look up file, line and function name for this frame.
    ///
    /// This is the expensive step; every accessor below calls it. When several
    /// parts are needed, resolve once and read them from the [`Symbol`].
    pub fn resolve(&self) -> Symbol {
        let mut symbol = Symbol::default();
        if self.ip == 0 {
            return symbol;
        }
        let mut found = false;
        backtrace::resolve(self.ip as *mut c_void, |s| {
            // Inlined frames report several symbols; the first is the innermost.
            if found {
                return;
            }
            found = true;
            symbol.name = s.name().map(|name| format!("{:#}", name));
            symbol.file = s.filename().map(|path| path.to_string_lossy().into_owned());
            symbol.line = s.lineno();
        });
        symbol
    }

    /// Full source path, or `unknown`.
    pub fn file(&self) -> String {
        self.resolve().file().into()
    }

    /// Base file name without directories, or `unknown`.
    pub fn file_name(&self) -> String {
        self.resolve().file_name().into()
    }

    /// Source line, or 0.
    pub fn line(&self) -> u32 {
        self.resolve().line()
    }

    /// Fully qualified function name, or `unknown`.
    pub fn function(&self) -> String {
        self.resolve().function().into()
    }

    /// Function name without its module path (`Type::method` or `function`).
    pub fn short_function(&self) -> String {
        self.resolve().short_function().into()
    }

    /// File reference without the line number.
    ///
    /// `Short` gives the base file name, `Full` gives the function name and the
    /// full path on two lines.
    pub fn source(&self, verbosity: Verbosity) -> impl fmt::Display + '_ {
        FrameSource {
            frame: self,
            verbosity,
        }
    }

    /// Line form at an explicit verbosity, ignoring formatter flags.
    pub fn render(&self, verbosity: Verbosity) -> Render<'_, Self> {
        Render::new(self, verbosity)
    }
}

impl Verbose for Frame {
    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, verbosity: Verbosity) -> fmt::Result {
        self.resolve().fmt_with(f, verbosity)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, Verbosity::of(f))
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({:#x})", self.ip)
    }
}

struct FrameSource<'a> {
    frame: &'a Frame,
    verbosity: Verbosity,
}

impl fmt::Display for FrameSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.frame.resolve().fmt_source(f, self.verbosity)
    }
}

// ============================================================================
// Symbol - resolved frame
// ============================================================================

/// The resolved form of a [`Frame`].
///
/// Every accessor degrades to `unknown` / `0` instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbol {
    pub(crate) name: Option<String>,
    pub(crate) file: Option<String>,
    pub(crate) line: Option<u32>,
}

impl Symbol {
    /// Whether any debug information was found.
    pub fn is_resolved(&self) -> bool {
        self.name.is_some() || self.file.is_some()
    }

    /// Fully qualified function name, or `unknown`.
    pub fn function(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Function name without its module path.
    pub fn short_function(&self) -> &str {
        match self.name.as_deref() {
            Some(name) => short_function_name(name),
            None => UNKNOWN,
        }
    }

    /// Full source path, or `unknown`.
    pub fn file(&self) -> &str {
        self.file.as_deref().unwrap_or(UNKNOWN)
    }

    /// Base file name, or `unknown`.
    pub fn file_name(&self) -> &str {
        match self.file.as_deref() {
            Some(file) => file.rsplit(['/', '\\']).next().unwrap_or(file),
            None => UNKNOWN,
        }
    }

    /// Source line, or 0.
    pub fn line(&self) -> u32 {
        self.line.unwrap_or(0)
    }

    fn fmt_source(&self, f: &mut fmt::Formatter<'_>, verbosity: Verbosity) -> fmt::Result {
        match (verbosity, self.file.as_deref()) {
            (Verbosity::Full, Some(file)) => write!(f, "{}\n\t{}", self.function(), file),
            (Verbosity::Full, None) if self.name.is_some() => {
                write!(f, "{}\n\t{}", self.function(), UNKNOWN)
            }
            (Verbosity::Full, None) => f.write_str(UNKNOWN),
            (Verbosity::Short, _) => f.write_str(self.file_name()),
        }
    }

    /// Line form at an explicit verbosity, as [`Frame::render`] prints it.
    pub fn render(&self, verbosity: Verbosity) -> Render<'_, Self> {
        Render::new(self, verbosity)
    }
}

impl Verbose for Symbol {
    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, verbosity: Verbosity) -> fmt::Result {
        self.fmt_source(f, verbosity)?;
        write!(f, ":{}", self.line())
    }
}

/// Strip the module path from a demangled function name.
///
/// `app::db::Conn::query` becomes `Conn::query`, `app::db::connect` becomes
/// `connect`. Closure suffixes are dropped and `::` inside `<...>` is ignored, so
/// `<app::Foo as core::fmt::Display>::fmt` keeps its qualified self type.
pub(crate) fn short_function_name(name: &str) -> &str {
    let mut name = name;
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }

    let bytes = name.as_bytes();
    let mut depth = 0usize;
    let mut last = None;
    let mut prev = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                prev = last;
                last = Some(i);
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    let Some(last) = last else {
        return name;
    };
    let owner_start = prev.map_or(0, |p| p + 2);
    let owner = &name[owner_start..last];
    if owner.starts_with('<') || owner.starts_with(|c: char| c.is_ascii_uppercase()) {
        &name[owner_start..]
    } else {
        &name[last + 2..]
    }
}

// ============================================================================
// Stack
// ============================================================================

/// A bounded sequence of frames, innermost (most recent call) first.
///
/// Never mutated after capture. At most [`MAX_DEPTH`] frames are kept; deeper
/// call stacks are truncated silently.
///
/// ## Formatting
///
/// - `{}` gives a bracketed list, `[a.rs:10 b.rs:20]`
/// - `{:+}` gives every frame on its own line, each preceded by a newline
/// - [`sources()`](Stack::sources) gives `[a.rs b.rs]`
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Stack {
    frames: FrameVec,
}

impl Stack {
    /// Capture the current call stack.
    ///
    /// The first frame is the function calling `capture`, after dropping `skip`
    /// further frames above it. Only instruction pointers are recorded.
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        let anchor = (Stack::capture as fn(usize) -> Stack) as usize;

        let mut raw = [(0usize, 0usize); SCAN_DEPTH];
        let mut seen = 0;
        backtrace::trace(|frame| {
            raw[seen] = (frame.ip() as usize, frame.symbol_address() as usize);
            seen += 1;
            seen < SCAN_DEPTH
        });
        let raw = &raw[..seen];

        // Frames before (and including) this function belong to the unwinder.
        let start = raw
            .iter()
            .position(|&(_, symbol)| symbol == anchor)
            .map_or(0, |i| i + 1)
            .saturating_add(skip);

        let frames = raw
            .iter()
            .skip(start)
            .take(MAX_DEPTH)
            .map(|&(ip, _)| Frame::from_ip(ip))
            .collect();
        Self { frames }
    }

    /// Build a stack from already captured frames, truncated to [`MAX_DEPTH`].
    pub fn from_frames(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().take(MAX_DEPTH).collect(),
        }
    }

    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames were captured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frames, innermost first.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Iterate over the frames, innermost first.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// The innermost frame (the capture site).
    #[inline]
    pub fn first(&self) -> Option<&Frame> {
        self.frames.first()
    }

    /// Bracketed list of base file names, `[a.rs b.rs]`.
    pub fn sources(&self) -> impl fmt::Display + '_ {
        StackSources { stack: self }
    }

    /// Format at an explicit verbosity, ignoring formatter flags.
    pub fn render(&self, verbosity: Verbosity) -> Render<'_, Self> {
        Render::new(self, verbosity)
    }
}

impl Verbose for Stack {
    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, verbosity: Verbosity) -> fmt::Result {
        match verbosity {
            Verbosity::Full => {
                for frame in self.iter() {
                    f.write_str("\n")?;
                    frame.resolve().fmt_with(f, Verbosity::Full)?;
                }
                Ok(())
            }
            Verbosity::Short => {
                f.write_str("[")?;
                for (i, frame) in self.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    frame.resolve().fmt_with(f, Verbosity::Short)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, Verbosity::of(f))
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a Frame;
    type IntoIter = core::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

struct StackSources<'a> {
    stack: &'a Stack,
}

impl fmt::Display for StackSources<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, frame) in self.stack.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(frame.resolve().file_name())?;
        }
        f.write_str("]")
    }
}
