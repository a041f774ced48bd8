//! Interpreter configuration.
//!
//! [`RuntimeConfig`] is a small `Copy` value built with `const` builder
//! methods. The defaults evaluate any description the memory allows.
//!
//! # Examples
//!
//! ```rust
//! use effio::effect::{Runtime, RuntimeConfig};
//!
//! let config = RuntimeConfig::default()
//!     .with_frame_capacity(64)
//!     .with_max_frame_depth(10_000);
//!
//! let runtime = Runtime::new(config);
//! assert_eq!(runtime.config().max_frame_depth(), Some(10_000));
//! ```

/// Default initial capacity of the frame stack.
pub const DEFAULT_FRAME_CAPACITY: usize = 16;

/// Settings for a [`Runtime`](super::Runtime).
///
/// # Fields
///
/// - `frame_capacity`: frames reserved up front for every evaluation
/// - `max_frame_depth`: ceiling on pending frames, `None` for unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuntimeConfig {
    frame_capacity: usize,
    max_frame_depth: Option<usize>,
}

impl RuntimeConfig {
    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frame_capacity: DEFAULT_FRAME_CAPACITY,
            max_frame_depth: None,
        }
    }

    /// Sets how many frames are reserved before evaluation starts.
    #[must_use]
    pub const fn with_frame_capacity(mut self, frame_capacity: usize) -> Self {
        self.frame_capacity = frame_capacity;
        self
    }

    /// Caps the number of pending frames.
    ///
    /// An evaluation that needs more frames stops with
    /// [`InterpretError::FrameDepthExceeded`](super::InterpretError::FrameDepthExceeded).
    #[must_use]
    pub const fn with_max_frame_depth(mut self, max_frame_depth: usize) -> Self {
        self.max_frame_depth = Some(max_frame_depth);
        self
    }

    /// Removes any cap on pending frames.
    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.max_frame_depth = None;
        self
    }

    /// Returns the initial frame capacity.
    #[inline]
    pub const fn frame_capacity(&self) -> usize {
        self.frame_capacity
    }

    /// Returns the frame ceiling, if any.
    #[inline]
    pub const fn max_frame_depth(&self) -> Option<usize> {
        self.max_frame_depth
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}
