//! Pending work for the interpreter.
//!
//! A [`Frame`] records what to do with an outcome once the node currently
//! being evaluated settles. Frames live on a [`FrameStack`] on the heap, so
//! the depth of a description never turns into native call depth.

use std::rc::Rc;

use smallvec::SmallVec;

use super::config::DEFAULT_FRAME_CAPACITY;
use super::error::InterpretError;
use super::node::{Combine, Environment, ErasedArrow, ErasedResource, Node, Outcome, Value};

const FRAME_INLINE_CAPACITY: usize = DEFAULT_FRAME_CAPACITY;

pub(crate) enum Frame {
    /// Continue with the arrow on success; pass failures through.
    Chain(Rc<dyn ErasedArrow>),
    /// Continue with the arrow on failure; pass successes through.
    CatchAll(Rc<dyn ErasedArrow>),
    /// Continue with exactly one of the arrows.
    Fold {
        on_failure: Rc<dyn ErasedArrow>,
        on_success: Rc<dyn ErasedArrow>,
    },
    /// Put the outer environment back once a `Provide` subtree settles.
    RestoreEnvironment(Environment),
    /// Waiting for the acquire step of a bracket.
    Acquire(Rc<dyn ErasedResource>),
    /// Waiting for the use step of a bracket; holds the acquired value.
    Release {
        acquired: Value,
        resource: Rc<dyn ErasedResource>,
    },
    /// Waiting for a finalizer; holds the outcome of the use step.
    Finalized(Outcome),
    /// Waiting for the left side of a `Zip`.
    ZipRight { right: Rc<Node>, combine: Combine },
    /// Waiting for the right side of a `Zip`; holds the left value.
    ZipCombine { first: Value, combine: Combine },
    /// Run the finalizer of an `Ensuring` once the wrapped node settles.
    Ensure(Rc<Node>),
}

impl Frame {
    pub(crate) const fn tag(&self) -> &'static str {
        match self {
            Self::Chain(_) => "Chain",
            Self::CatchAll(_) => "CatchAll",
            Self::Fold { .. } => "Fold",
            Self::RestoreEnvironment(_) => "RestoreEnvironment",
            Self::Acquire(_) => "Acquire",
            Self::Release { .. } => "Release",
            Self::Finalized(_) => "Finalized",
            Self::ZipRight { .. } => "ZipRight",
            Self::ZipCombine { .. } => "ZipCombine",
            Self::Ensure(_) => "Ensure",
        }
    }
}

/// LIFO work list of pending frames.
///
/// Uses `SmallVec` for inline storage of short pipelines and grows on the
/// heap for long ones.
pub(crate) struct FrameStack {
    frames: SmallVec<[Frame; FRAME_INLINE_CAPACITY]>,
    limit: Option<usize>,
    peak: usize,
}

impl FrameStack {
    pub(crate) fn new(capacity: usize, limit: Option<usize>) -> Self {
        Self {
            frames: SmallVec::with_capacity(capacity),
            limit,
            peak: 0,
        }
    }

    pub(crate) fn push(&mut self, frame: Frame) -> Result<(), InterpretError> {
        if let Some(limit) = self.limit
            && self.frames.len() >= limit
        {
            tracing::warn!(limit, frame = frame.tag(), "frame depth limit exceeded");
            return Err(InterpretError::FrameDepthExceeded { limit });
        }
        self.frames.push(frame);
        self.peak = self.peak.max(self.frames.len());
        Ok(())
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub(crate) const fn peak(&self) -> usize {
        self.peak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn restore_frame() -> Frame {
        Frame::RestoreEnvironment(Rc::new(()))
    }

    #[rstest]
    fn test_push_pop_is_lifo() {
        let mut stack = FrameStack::new(4, None);
        stack.push(restore_frame()).expect("push");
        stack
            .push(Frame::Finalized(Outcome::success(1_i32)))
            .expect("push");

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop().map(|frame| frame.tag()), Some("Finalized"));
        assert_eq!(
            stack.pop().map(|frame| frame.tag()),
            Some("RestoreEnvironment")
        );
        assert!(stack.pop().is_none());
    }

    #[rstest]
    fn test_peak_tracks_deepest_point() {
        let mut stack = FrameStack::new(0, None);
        for _ in 0..40 {
            stack.push(restore_frame()).expect("push");
        }
        for _ in 0..30 {
            stack.pop();
        }
        stack.push(restore_frame()).expect("push");
        assert_eq!(stack.len(), 11);
        assert_eq!(stack.peak(), 40);
    }

    #[rstest]
    fn test_inline_storage_matches_default_capacity() {
        let stack = FrameStack::new(0, None);
        assert_eq!(stack.frames.inline_size(), DEFAULT_FRAME_CAPACITY);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    fn test_limit_is_enforced(#[case] limit: usize) {
        let mut stack = FrameStack::new(0, Some(limit));
        for _ in 0..limit {
            stack.push(restore_frame()).expect("push within limit");
        }
        assert_eq!(
            stack.push(restore_frame()),
            Err(InterpretError::FrameDepthExceeded { limit })
        );
        assert_eq!(stack.len(), limit);
    }
}
