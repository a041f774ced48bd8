//! Error types for the interpreter.
//!
//! Domain failures never show up here: they are ordinary values of the
//! description's `E` parameter and come back as `Err(e)` from
//! [`Runtime::run`](super::Runtime::run). [`InterpretError`] covers the
//! cases where the interpreter itself cannot finish an evaluation.

use std::fmt::{self, Display, Formatter};

/// Represents errors raised by the interpreter rather than by the program.
///
/// # Examples
///
/// ```rust
/// use effio::effect::InterpretError;
///
/// let error = InterpretError::FrameDepthExceeded { limit: 128 };
/// assert_eq!(
///     format!("{}", error),
///     "Frame depth limit of 128 pending frames exceeded"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    /// An erased value did not have the type its node was built with.
    ///
    /// Descriptions built through the public API pin every hidden type at
    /// construction, so this variant indicates a bug in the crate itself.
    TypeMismatch {
        /// Description of the context where mismatch occurred.
        context: &'static str,
    },
    /// The number of pending frames grew past
    /// [`RuntimeConfig::max_frame_depth`](super::RuntimeConfig::max_frame_depth).
    FrameDepthExceeded {
        /// The configured ceiling.
        limit: usize,
    },
}

impl Display for InterpretError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { context } => {
                write!(formatter, "Type mismatch in interpret: {context}")
            }
            Self::FrameDepthExceeded { limit } => {
                write!(
                    formatter,
                    "Frame depth limit of {limit} pending frames exceeded"
                )
            }
        }
    }
}

impl std::error::Error for InterpretError {}
