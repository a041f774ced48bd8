//! The stack-safe interpreter.
//!
//! # Design
//!
//! Evaluation is a single loop over two states:
//!
//! ```text
//! Flow::Evaluate(node)   -- inspect a node: settle it, or push a frame and descend
//! Flow::Settled(outcome) -- pop one frame and resolve it against the outcome
//! ```
//!
//! Every combinator, including the acquire, use and finalize steps of
//! `bracket` and both sides of `zip`, is driven by the same loop, so native
//! stack depth stays constant regardless of how the description was composed.
//! Pending work is kept on a heap-allocated [`FrameStack`].
//!
//! # Examples
//!
//! ```rust
//! use effio::effect::{IO, Runtime};
//!
//! let program: IO<i32, String, i32> = IO::access(|n: &i32| *n).map(|n| n * 2);
//!
//! let runtime = Runtime::default();
//! assert_eq!(runtime.run(21, &program), Ok(42));
//! assert_eq!(runtime.run(5, &program), Ok(10));
//! ```

use std::rc::Rc;

use super::config::RuntimeConfig;
use super::error::InterpretError;
use super::frame::{Frame, FrameStack};
use super::io::IO;
use super::node::{Environment, Flow, Node, Outcome};

/// Evaluates [`IO`] descriptions against an environment.
///
/// A `Runtime` holds only its [`RuntimeConfig`]; it can be reused for any
/// number of evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Runtime {
    config: RuntimeConfig,
}

impl Runtime {
    /// Creates a runtime with the given configuration.
    #[must_use]
    pub const fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of this runtime.
    #[inline]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Evaluates `io` against `environment`.
    ///
    /// Domain failures come back as `Err(e)`; they are never panics.
    ///
    /// # Panics
    ///
    /// Panics if the interpreter cannot finish (see [`Runtime::try_run`]).
    /// With the default configuration this only happens if a caller-supplied
    /// function panics.
    pub fn run<R, E, A>(&self, environment: R, io: &IO<R, E, A>) -> Result<A, E>
    where
        R: 'static,
        E: 'static,
        A: 'static,
    {
        self.try_run(environment, io)
            .unwrap_or_else(|error| panic!("effect evaluation aborted: {error}"))
    }

    /// Evaluates `io` against `environment`, reporting interpreter errors.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::FrameDepthExceeded`] when the configured
    /// frame ceiling is reached, and [`InterpretError::TypeMismatch`] if an
    /// erased value does not have the type its node was built with.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::{IO, InterpretError, Runtime, RuntimeConfig};
    ///
    /// let program: IO<(), String, u32> = (0..10).fold(IO::succeed(0), |io, _| {
    ///     io.chain(|n| IO::succeed(n + 1))
    /// });
    ///
    /// let strict = Runtime::new(RuntimeConfig::default().with_max_frame_depth(4));
    /// assert_eq!(
    ///     strict.try_run((), &program),
    ///     Err(InterpretError::FrameDepthExceeded { limit: 4 })
    /// );
    /// assert_eq!(Runtime::default().try_run((), &program), Ok(Ok(10)));
    /// ```
    pub fn try_run<R, E, A>(
        &self,
        environment: R,
        io: &IO<R, E, A>,
    ) -> Result<Result<A, E>, InterpretError>
    where
        R: 'static,
        E: 'static,
        A: 'static,
    {
        let environment: Environment = Rc::new(environment);
        self.evaluate(environment, Rc::clone(io.node()))?
            .into_result::<A, E>()
    }

    fn evaluate(&self, environment: Environment, root: Rc<Node>) -> Result<Outcome, InterpretError> {
        let span = tracing::trace_span!("evaluate", root = root.tag());
        let _entered = span.enter();

        let mut frames = FrameStack::new(
            self.config.frame_capacity(),
            self.config.max_frame_depth(),
        );
        let mut environment = environment;
        let mut flow = Flow::Evaluate(root);
        let mut steps: u64 = 0;

        loop {
            steps += 1;
            flow = match flow {
                Flow::Evaluate(node) => Self::step(&node, &mut environment, &mut frames)?,
                Flow::Settled(outcome) => match frames.pop() {
                    Some(frame) => Self::resolve(frame, outcome, &mut environment, &mut frames)?,
                    None => {
                        tracing::trace!(
                            steps,
                            peak_frames = frames.peak(),
                            succeeded = outcome.is_success(),
                            "evaluation finished"
                        );
                        return Ok(outcome);
                    }
                },
            };
        }
    }

    /// Inspects one node: leaves settle, combinators push a frame and descend.
    fn step(
        node: &Node,
        environment: &mut Environment,
        frames: &mut FrameStack,
    ) -> Result<Flow, InterpretError> {
        let next = match node {
            Node::Succeed(produce) => return Ok(Flow::Settled(Outcome::Success(produce()))),
            Node::Fail(produce) => return Ok(Flow::Settled(Outcome::Failure(produce()))),
            Node::Access(read) => {
                return Ok(Flow::Settled(Outcome::Success(read(&**environment)?)));
            }
            Node::Chain {
                prior,
                continuation,
            } => {
                frames.push(Frame::Chain(Rc::clone(continuation)))?;
                prior
            }
            Node::CatchAll { prior, recover } => {
                frames.push(Frame::CatchAll(Rc::clone(recover)))?;
                prior
            }
            Node::Fold {
                prior,
                on_failure,
                on_success,
            } => {
                frames.push(Frame::Fold {
                    on_failure: Rc::clone(on_failure),
                    on_success: Rc::clone(on_success),
                })?;
                prior
            }
            Node::Provide { prior, narrow } => {
                let narrowed = narrow(&**environment)?;
                let outer = std::mem::replace(environment, narrowed);
                frames.push(Frame::RestoreEnvironment(outer))?;
                prior
            }
            Node::Bracket { acquire, resource } => {
                frames.push(Frame::Acquire(Rc::clone(resource)))?;
                acquire
            }
            Node::Zip {
                left,
                right,
                combine,
            } => {
                frames.push(Frame::ZipRight {
                    right: Rc::clone(right),
                    combine: Rc::clone(combine),
                })?;
                left
            }
            Node::Ensuring { prior, finalizer } => {
                frames.push(Frame::Ensure(Rc::clone(finalizer)))?;
                prior
            }
        };
        Ok(Flow::Evaluate(Rc::clone(next)))
    }

    /// Resolves one popped frame against the outcome that reached it.
    fn resolve(
        frame: Frame,
        outcome: Outcome,
        environment: &mut Environment,
        frames: &mut FrameStack,
    ) -> Result<Flow, InterpretError> {
        match (frame, outcome) {
            (Frame::Chain(continuation), Outcome::Success(value)) => continuation.apply(value),
            (Frame::CatchAll(recover), Outcome::Failure(error)) => recover.apply(error),
            (Frame::Fold { on_success, .. }, Outcome::Success(value)) => on_success.apply(value),
            (Frame::Fold { on_failure, .. }, Outcome::Failure(error)) => on_failure.apply(error),
            (Frame::RestoreEnvironment(outer), outcome) => {
                *environment = outer;
                Ok(Flow::Settled(outcome))
            }
            (Frame::Acquire(resource), Outcome::Success(acquired)) => {
                let use_resource = resource.start(&acquired)?;
                frames.push(Frame::Release { acquired, resource })?;
                Ok(Flow::Evaluate(use_resource))
            }
            (Frame::Release { acquired, resource }, outcome) => {
                let (finalizer, outcome) = resource.release(acquired, outcome)?;
                frames.push(Frame::Finalized(outcome))?;
                Ok(Flow::Evaluate(finalizer))
            }
            (Frame::ZipRight { right, combine }, Outcome::Success(first)) => {
                frames.push(Frame::ZipCombine { first, combine })?;
                Ok(Flow::Evaluate(right))
            }
            (Frame::ZipCombine { first, combine }, Outcome::Success(second)) => {
                Ok(Flow::Settled(Outcome::Success(combine(first, second)?)))
            }
            (Frame::Ensure(finalizer), outcome) => {
                frames.push(Frame::Finalized(outcome))?;
                Ok(Flow::Evaluate(finalizer))
            }
            (Frame::Finalized(original), Outcome::Success(_)) => Ok(Flow::Settled(original)),
            (Frame::Finalized(original), Outcome::Failure(error)) => {
                tracing::debug!(
                    original_succeeded = original.is_success(),
                    pending_frames = frames.len(),
                    "finalizer failed; its failure replaces the outcome"
                );
                Ok(Flow::Settled(Outcome::Failure(error)))
            }
            (
                Frame::Chain(_)
                | Frame::Acquire(_)
                | Frame::ZipRight { .. }
                | Frame::ZipCombine { .. },
                failure @ Outcome::Failure(_),
            ) => {
                Ok(Flow::Settled(failure))
            }
            (Frame::CatchAll(_), success @ Outcome::Success(_)) => Ok(Flow::Settled(success)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;

    #[rstest]
    fn test_run_succeed() {
        let io: IO<(), String, i32> = IO::succeed(42);
        assert_eq!(Runtime::default().run((), &io), Ok(42));
    }

    #[rstest]
    fn test_run_fail() {
        let io: IO<(), String, i32> = IO::fail("boom".to_string());
        assert_eq!(Runtime::default().run((), &io), Err("boom".to_string()));
    }

    #[rstest]
    fn test_try_run_reports_frame_limit() {
        let io: IO<(), String, i32> = IO::succeed(1)
            .chain(|n| IO::succeed(n + 1))
            .chain(|n| IO::succeed(n + 1));
        let runtime = Runtime::new(RuntimeConfig::default().with_max_frame_depth(1));
        assert_eq!(
            runtime.try_run((), &io),
            Err(InterpretError::FrameDepthExceeded { limit: 1 })
        );
    }

    #[rstest]
    fn test_frame_limit_is_not_hit_by_right_nested_loops() {
        fn count_down(n: u32) -> IO<(), String, u32> {
            if n == 0 {
                IO::succeed(0)
            } else {
                IO::succeed(n).chain(|n| count_down(n - 1))
            }
        }

        let runtime = Runtime::new(RuntimeConfig::default().with_max_frame_depth(1));
        assert_eq!(runtime.try_run((), &count_down(10_000)), Ok(Ok(0)));
    }

    #[rstest]
    #[should_panic(expected = "effect evaluation aborted")]
    fn test_run_panics_on_interpreter_error() {
        let io: IO<(), String, i32> = IO::succeed(1).map(|n| n + 1);
        let runtime = Runtime::new(RuntimeConfig::default().with_max_frame_depth(0));
        let _ = runtime.run((), &io);
    }

    #[rstest]
    fn test_environment_restored_after_failure_inside_provide() {
        let inner: IO<String, String, i32> = IO::fail("inner".to_string());
        let io: IO<i32, String, i32> = inner
            .provide_some(|n: &i32| n.to_string())
            .catch_all(|_| IO::access(|n: &i32| *n));
        assert_eq!(Runtime::default().run(7, &io), Ok(7));
    }

    #[rstest]
    fn test_bracket_steps_run_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (acquire_log, use_log, release_log) = (log.clone(), log.clone(), log.clone());

        let io: IO<(), String, i32> = IO::succeed_with(move || {
            acquire_log.borrow_mut().push("acquire");
            10
        })
        .bracket(
            move |n| {
                use_log.borrow_mut().push("use");
                IO::succeed(n * 2)
            },
            move |_, _| {
                release_log.borrow_mut().push("release");
                IO::unit()
            },
        );

        assert_eq!(Runtime::default().run((), &io), Ok(20));
        assert_eq!(*log.borrow(), vec!["acquire", "use", "release"]);
    }

    #[rstest]
    fn test_runtime_is_reusable() {
        let runtime = Runtime::new(RuntimeConfig::default().with_frame_capacity(2));
        let io: IO<i32, (), i32> = IO::access(|n: &i32| n + 1);
        assert_eq!(runtime.run(1, &io), Ok(2));
        assert_eq!(runtime.run(41, &io), Ok(42));
        assert_eq!(runtime.config().frame_capacity(), 2);
    }
}
