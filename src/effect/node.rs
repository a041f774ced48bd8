//! Closed node representation of effect descriptions.
//!
//! Every [`IO`](super::IO) wraps an `Rc<Node>`. `Node` is not generic: the
//! value, error and environment types of a description are erased at the
//! point where it is built, so the interpreter can match on a single enum no
//! matter which types were used to assemble the tree.
//!
//! # Existential continuations
//!
//! A `Chain` node relates some prior description producing a hidden type `T`
//! to a function `T -> IO<R, E, B>`. The hidden `T` is pinned inside a generic
//! struct ([`FlatMapArrow`] or [`PureArrow`]) and exposed to the interpreter
//! only through the single-method [`ErasedArrow`] trait:
//!
//! ```text
//! Chain { prior: Node /* yields T */, continuation: dyn ErasedArrow /* T -> Node */ }
//! ```
//!
//! Bracket uses the same scheme through [`ErasedResource`].

use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;

use super::error::InterpretError;

// =============================================================================
// Erased Values
// =============================================================================

/// A type-erased success value or failure value.
pub(crate) type Value = Box<dyn Any>;

/// A type-erased environment, shared by every node that reads it.
pub(crate) type Environment = Rc<dyn Any>;

/// Produces a fresh value on every evaluation.
pub(crate) type Produce = Rc<dyn Fn() -> Value>;

/// Reads a value out of the current environment.
pub(crate) type Read = Rc<dyn Fn(&dyn Any) -> Result<Value, InterpretError>>;

/// Maps the current environment to the one a subtree expects.
pub(crate) type Narrow = Rc<dyn Fn(&dyn Any) -> Result<Environment, InterpretError>>;

/// Merges the values of the two sides of a `Zip`.
pub(crate) type Combine = Rc<dyn Fn(Value, Value) -> Result<Value, InterpretError>>;

/// Recovers the concrete type of an erased value.
pub(crate) fn unerase<T: 'static>(value: Value, context: &'static str) -> Result<T, InterpretError> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| InterpretError::TypeMismatch { context })
}

/// The settled result of a node: either branch carries an erased value.
pub(crate) enum Outcome {
    Success(Value),
    Failure(Value),
}

impl Outcome {
    #[inline]
    pub(crate) fn success<A: 'static>(value: A) -> Self {
        Self::Success(Box::new(value))
    }

    #[inline]
    pub(crate) fn failure<E: 'static>(error: E) -> Self {
        Self::Failure(Box::new(error))
    }

    pub(crate) fn from_result<A: 'static, E: 'static>(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(error) => Self::failure(error),
        }
    }

    pub(crate) fn into_result<A: 'static, E: 'static>(
        self,
    ) -> Result<Result<A, E>, InterpretError> {
        match self {
            Self::Success(value) => unerase(value, "success outcome").map(Ok),
            Self::Failure(error) => unerase(error, "failure outcome").map(Err),
        }
    }

    #[inline]
    pub(crate) const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// What the interpreter does next: descend into a node, or unwind with an outcome.
pub(crate) enum Flow {
    Evaluate(Rc<Node>),
    Settled(Outcome),
}

// =============================================================================
// Continuation Types
// =============================================================================

/// Type-erased arrow (continuation).
///
/// Converts `T -> IO<R, E, B>` into `Box<dyn Any> -> Flow` so that
/// continuations over different hidden types share one frame variant.
pub(crate) trait ErasedArrow {
    fn apply(&self, input: Value) -> Result<Flow, InterpretError>;
}

/// Continues with the description returned by `function`.
pub(crate) struct FlatMapArrow<A, F>
where
    F: Fn(A) -> Rc<Node>,
{
    function: F,
    _input: PhantomData<fn(A)>,
}

impl<A, F> FlatMapArrow<A, F>
where
    F: Fn(A) -> Rc<Node>,
{
    pub(crate) fn new(function: F) -> Self {
        Self {
            function,
            _input: PhantomData,
        }
    }
}

impl<A: 'static, F> ErasedArrow for FlatMapArrow<A, F>
where
    F: Fn(A) -> Rc<Node>,
{
    fn apply(&self, input: Value) -> Result<Flow, InterpretError> {
        let value = unerase::<A>(input, "continuation input")?;
        Ok(Flow::Evaluate((self.function)(value)))
    }
}

/// Settles immediately with the outcome returned by `function`.
///
/// Used by `map`, `map_error` and `fold` so that they need neither a fresh
/// node nor a `Clone` bound on the produced value.
pub(crate) struct PureArrow<A, F>
where
    F: Fn(A) -> Outcome,
{
    function: F,
    _input: PhantomData<fn(A)>,
}

impl<A, F> PureArrow<A, F>
where
    F: Fn(A) -> Outcome,
{
    pub(crate) fn new(function: F) -> Self {
        Self {
            function,
            _input: PhantomData,
        }
    }
}

impl<A: 'static, F> ErasedArrow for PureArrow<A, F>
where
    F: Fn(A) -> Outcome,
{
    #[inline]
    fn apply(&self, input: Value) -> Result<Flow, InterpretError> {
        let value = unerase::<A>(input, "pure continuation input")?;
        Ok(Flow::Settled((self.function)(value)))
    }
}

// =============================================================================
// Resource Types
// =============================================================================

/// Type-erased `use`/`finalize` pair of a bracket.
pub(crate) trait ErasedResource {
    /// Builds the `use` description from a borrowed acquired value.
    fn start(&self, acquired: &Value) -> Result<Rc<Node>, InterpretError>;

    /// Builds the finalizer description and hands the `use` outcome back.
    fn release(
        &self,
        acquired: Value,
        outcome: Outcome,
    ) -> Result<(Rc<Node>, Outcome), InterpretError>;
}

pub(crate) struct Resource<A, B, E, U, F>
where
    U: Fn(A) -> Rc<Node>,
    F: Fn(A, &Result<B, E>) -> Rc<Node>,
{
    use_resource: U,
    finalize: F,
    _types: PhantomData<fn(A) -> Result<B, E>>,
}

impl<A, B, E, U, F> Resource<A, B, E, U, F>
where
    U: Fn(A) -> Rc<Node>,
    F: Fn(A, &Result<B, E>) -> Rc<Node>,
{
    pub(crate) fn new(use_resource: U, finalize: F) -> Self {
        Self {
            use_resource,
            finalize,
            _types: PhantomData,
        }
    }
}

impl<A, B, E, U, F> ErasedResource for Resource<A, B, E, U, F>
where
    A: Clone + 'static,
    B: 'static,
    E: 'static,
    U: Fn(A) -> Rc<Node>,
    F: Fn(A, &Result<B, E>) -> Rc<Node>,
{
    fn start(&self, acquired: &Value) -> Result<Rc<Node>, InterpretError> {
        let value = acquired
            .downcast_ref::<A>()
            .ok_or(InterpretError::TypeMismatch {
                context: "acquired resource",
            })?;
        Ok((self.use_resource)(value.clone()))
    }

    fn release(
        &self,
        acquired: Value,
        outcome: Outcome,
    ) -> Result<(Rc<Node>, Outcome), InterpretError> {
        let value = unerase::<A>(acquired, "acquired resource")?;
        let exit = outcome.into_result::<B, E>()?;
        let finalizer = (self.finalize)(value, &exit);
        Ok((finalizer, Outcome::from_result(exit)))
    }
}

// =============================================================================
// Node
// =============================================================================

/// One suspended operation, or a combinator wrapping a prior description.
pub(crate) enum Node {
    Succeed(Produce),
    Fail(Produce),
    Access(Read),
    Chain {
        prior: Rc<Node>,
        continuation: Rc<dyn ErasedArrow>,
    },
    CatchAll {
        prior: Rc<Node>,
        recover: Rc<dyn ErasedArrow>,
    },
    Fold {
        prior: Rc<Node>,
        on_failure: Rc<dyn ErasedArrow>,
        on_success: Rc<dyn ErasedArrow>,
    },
    Provide {
        prior: Rc<Node>,
        narrow: Narrow,
    },
    Bracket {
        acquire: Rc<Node>,
        resource: Rc<dyn ErasedResource>,
    },
    /// Evaluates `left` then `right` and merges both values.
    Zip {
        left: Rc<Node>,
        right: Rc<Node>,
        combine: Combine,
    },
    /// Evaluates `finalizer` after `prior`, whatever its outcome.
    Ensuring {
        prior: Rc<Node>,
        finalizer: Rc<Node>,
    },
}

impl Node {
    pub(crate) const fn tag(&self) -> &'static str {
        match self {
            Self::Succeed(_) => "Succeed",
            Self::Fail(_) => "Fail",
            Self::Access(_) => "Access",
            Self::Chain { .. } => "Chain",
            Self::CatchAll { .. } => "CatchAll",
            Self::Fold { .. } => "Fold",
            Self::Provide { .. } => "Provide",
            Self::Bracket { .. } => "Bracket",
            Self::Zip { .. } => "Zip",
            Self::Ensuring { .. } => "Ensuring",
        }
    }

    const fn is_leaf(&self) -> bool {
        matches!(self, Self::Succeed(_) | Self::Fail(_) | Self::Access(_))
    }

    fn leaf() -> Rc<Self> {
        Rc::new(Self::Succeed(Rc::new(|| Box::new(()) as Value)))
    }

    /// Moves uniquely owned children out so that they can be dropped by a loop.
    fn detach_children(&mut self, detached: &mut Vec<Rc<Self>>) {
        let children = match self {
            Self::Chain { prior, .. }
            | Self::CatchAll { prior, .. }
            | Self::Fold { prior, .. }
            | Self::Provide { prior, .. } => [Some(prior), None],
            Self::Bracket { acquire, .. } => [Some(acquire), None],
            Self::Zip { left, right, .. } => [Some(left), Some(right)],
            Self::Ensuring { prior, finalizer } => [Some(prior), Some(finalizer)],
            Self::Succeed(_) | Self::Fail(_) | Self::Access(_) => return,
        };
        for child in children.into_iter().flatten() {
            if Rc::strong_count(child) == 1 && !child.is_leaf() {
                detached.push(std::mem::replace(child, Self::leaf()));
            }
        }
    }
}

// Long descriptions nest through the child slots; the default drop glue would
// recurse once per link.
impl Drop for Node {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.detach_children(&mut detached);
        while let Some(child) = detached.pop() {
            if let Ok(mut node) = Rc::try_unwrap(child) {
                node.detach_children(&mut detached);
            }
        }
    }
}
