//! IO - an immutable description of a computation.
//!
//! The `IO<R, E, A>` type describes a computation that reads an environment
//! `R`, may fail with `E` and succeeds with `A`. Building an `IO` never runs
//! anything: constructors and combinators only assemble a tree of nodes.
//! Execution happens only via [`IO::run`] or a [`Runtime`], which walks the
//! tree once per call.
//!
//! # Design Philosophy
//!
//! IO "describes" a program but doesn't "execute" it. A description can be
//! run any number of times, against any number of environments, and gives
//! equal results for equal inputs as long as the supplied functions are pure.
//!
//! # Examples
//!
//! ```rust
//! use effio::effect::IO;
//!
//! struct Input {
//!     n: i32,
//! }
//!
//! let program = IO::access(|input: &Input| input.n).chain(|n| {
//!     if n > 0 {
//!         IO::fail("positive")
//!     } else {
//!         IO::succeed(format!("got {n}"))
//!     }
//! });
//!
//! assert_eq!(program.run(Input { n: -1 }), Ok("got -1".to_string()));
//! assert_eq!(program.run(Input { n: 5 }), Err("positive"));
//! ```
//!
//! # Deferred Evaluation
//!
//! ```rust
//! use effio::effect::IO;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let calls = Rc::new(Cell::new(0));
//! let counter = calls.clone();
//!
//! let io: IO<(), (), i32> = IO::succeed_with(move || {
//!     counter.set(counter.get() + 1);
//!     42
//! });
//!
//! // Not executed yet
//! assert_eq!(calls.get(), 0);
//!
//! assert_eq!(io.run(()), Ok(42));
//! assert_eq!(io.run(()), Ok(42));
//! assert_eq!(calls.get(), 2);
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::environment::Has;
use super::error::InterpretError;
use super::node::{
    Environment, FlatMapArrow, Node, Outcome, PureArrow, Resource, Value, unerase,
};
use super::runtime::Runtime;

/// A description of a computation over an environment.
///
/// # Type Parameters
///
/// - `R`: The environment the description reads.
/// - `E`: The failure it may produce.
/// - `A`: The value it produces on success.
///
/// # Monad Laws
///
/// `IO` satisfies the monad laws, observed through [`IO::run`]:
///
/// 1. **Left Identity**: `IO::succeed(a).chain(f) == f(a)`
/// 2. **Right Identity**: `m.chain(IO::succeed) == m`
/// 3. **Associativity**: `m.chain(f).chain(g) == m.chain(|x| f(x).chain(g))`
///
/// # Stack Safety
///
/// Evaluation uses an explicit frame stack, so chains of any length run in
/// constant native stack space:
///
/// ```rust
/// use effio::effect::IO;
///
/// let program: IO<(), (), u64> = (0..50_000).fold(IO::succeed(0), |io, _| {
///     io.chain(|x| IO::succeed(x + 1))
/// });
/// assert_eq!(program.run(()), Ok(50_000));
/// ```
pub struct IO<R, E, A> {
    node: Rc<Node>,
    _types: PhantomData<fn(&R) -> Result<A, E>>,
}

impl<R, E, A> IO<R, E, A> {
    #[inline]
    fn from_node(node: Node) -> Self {
        Self {
            node: Rc::new(node),
            _types: PhantomData,
        }
    }

    #[inline]
    fn from_shared(node: Rc<Node>) -> Self {
        Self {
            node,
            _types: PhantomData,
        }
    }

    #[inline]
    pub(crate) const fn node(&self) -> &Rc<Node> {
        &self.node
    }

    #[inline]
    fn into_node(self) -> Rc<Node> {
        self.node
    }
}

// Descriptions are shared, so cloning never requires `R`, `E` or `A` to be `Clone`.
impl<R, E, A> Clone for IO<R, E, A> {
    fn clone(&self) -> Self {
        Self::from_shared(Rc::clone(&self.node))
    }
}

impl<R, E, A> fmt::Debug for IO<R, E, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("IO")
            .field("node", &self.node.tag())
            .finish()
    }
}

static_assertions::assert_not_impl_any!(IO<(), (), ()>: Send, Sync);

// =============================================================================
// Constructors
// =============================================================================

impl<R, E, A> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: 'static,
{
    /// Creates a description that succeeds with `value`.
    ///
    /// Each evaluation receives its own clone of `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<(), String, i32> = IO::succeed(42);
    /// assert_eq!(io.run(()), Ok(42));
    /// ```
    pub fn succeed(value: A) -> Self
    where
        A: Clone,
    {
        Self::from_node(Node::Succeed(Rc::new(move || {
            Box::new(value.clone()) as Value
        })))
    }

    /// Creates a description that succeeds with the result of `producer`.
    ///
    /// `producer` runs at evaluation time, once per evaluation.
    pub fn succeed_with<F>(producer: F) -> Self
    where
        F: Fn() -> A + 'static,
    {
        Self::from_node(Node::Succeed(Rc::new(move || {
            Box::new(producer()) as Value
        })))
    }

    /// Creates a description that fails with `error`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<(), &str, i32> = IO::fail("boom");
    /// assert_eq!(io.run(()), Err("boom"));
    /// ```
    pub fn fail(error: E) -> Self
    where
        E: Clone,
    {
        Self::from_node(Node::Fail(Rc::new(move || Box::new(error.clone()) as Value)))
    }

    /// Creates a description that fails with the result of `producer`.
    ///
    /// `producer` runs at evaluation time, once per evaluation.
    pub fn fail_with<F>(producer: F) -> Self
    where
        F: Fn() -> E + 'static,
    {
        Self::from_node(Node::Fail(Rc::new(move || Box::new(producer()) as Value)))
    }

    /// Creates a description that reads the environment with `accessor`.
    ///
    /// Never fails. `accessor` is called exactly once per evaluation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<(i32, i32), (), i32> = IO::access(|(a, b): &(i32, i32)| a + b);
    /// assert_eq!(io.run((20, 22)), Ok(42));
    /// ```
    pub fn access<F>(accessor: F) -> Self
    where
        F: Fn(&R) -> A + 'static,
    {
        Self::from_node(Node::Access(Rc::new(move |environment: &dyn Any| {
            environment
                .downcast_ref::<R>()
                .map(|environment| Box::new(accessor(environment)) as Value)
                .ok_or(InterpretError::TypeMismatch {
                    context: "access environment",
                })
        })))
    }

    /// Lifts a `Result` into a description.
    pub fn from_result(result: Result<A, E>) -> Self
    where
        A: Clone,
        E: Clone,
    {
        match result {
            Ok(value) => Self::succeed(value),
            Err(error) => Self::fail(error),
        }
    }

    /// Reads a `T` out of an environment that [`Has`] it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::{Has, IO};
    ///
    /// #[derive(Clone)]
    /// struct Port(u16);
    ///
    /// struct Settings {
    ///     port: Port,
    /// }
    ///
    /// impl Has<Port> for Settings {
    ///     fn get(&self) -> &Port {
    ///         &self.port
    ///     }
    /// }
    ///
    /// let io: IO<Settings, (), u16> = IO::access_service(|port: &Port| port.0);
    /// assert_eq!(io.run(Settings { port: Port(8080) }), Ok(8080));
    /// ```
    pub fn access_service<T, F>(accessor: F) -> Self
    where
        R: Has<T>,
        T: 'static,
        F: Fn(&T) -> A + 'static,
    {
        Self::access(move |environment: &R| accessor(<R as Has<T>>::get(environment)))
    }

    /// Succeeds with a clone of the `A` held by the environment.
    pub fn service() -> Self
    where
        R: Has<A>,
        A: Clone,
    {
        Self::access(|environment: &R| <R as Has<A>>::get(environment).clone())
    }
}

impl<R, E> IO<R, E, R>
where
    R: Clone + 'static,
    E: 'static,
{
    /// Succeeds with a clone of the whole environment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<String, (), String> = IO::environment();
    /// assert_eq!(io.run("config".to_string()), Ok("config".to_string()));
    /// ```
    pub fn environment() -> Self {
        Self::access(R::clone)
    }
}

impl<R, E> IO<R, E, ()>
where
    R: 'static,
    E: 'static,
{
    /// Creates a description that succeeds with `()`.
    pub fn unit() -> Self {
        Self::succeed(())
    }
}

// =============================================================================
// Sequencing
// =============================================================================

impl<R, E, A> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: 'static,
{
    /// Sequences `function` after this description.
    ///
    /// If this description fails, `function` is never called and the failure
    /// propagates unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<(), String, i32> = IO::succeed(1).chain(|x| IO::succeed(x + 1));
    /// assert_eq!(io.run(()), Ok(2));
    /// ```
    pub fn chain<B, F>(self, function: F) -> IO<R, E, B>
    where
        B: 'static,
        F: Fn(A) -> IO<R, E, B> + 'static,
    {
        IO::from_node(Node::Chain {
            prior: self.into_node(),
            continuation: Rc::new(FlatMapArrow::new(move |value: A| {
                function(value).into_node()
            })),
        })
    }

    /// Alias for [`IO::chain`].
    #[inline]
    pub fn and_then<B, F>(self, function: F) -> IO<R, E, B>
    where
        B: 'static,
        F: Fn(A) -> IO<R, E, B> + 'static,
    {
        self.chain(function)
    }

    /// Sequences `next` after this description, discarding this value.
    pub fn then<B: 'static>(self, next: IO<R, E, B>) -> IO<R, E, B> {
        self.zip_with(next, |_, second| second)
    }

    /// Transforms the success value.
    ///
    /// Equivalent to `self.chain(|a| IO::succeed(function(a)))`, without
    /// requiring `B: Clone`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<(), (), String> = IO::succeed(21).map(|x| (x * 2).to_string());
    /// assert_eq!(io.run(()), Ok("42".to_string()));
    /// ```
    pub fn map<B, F>(self, function: F) -> IO<R, E, B>
    where
        B: 'static,
        F: Fn(A) -> B + 'static,
    {
        IO::from_node(Node::Chain {
            prior: self.into_node(),
            continuation: Rc::new(PureArrow::new(move |value: A| {
                Outcome::success(function(value))
            })),
        })
    }

    /// Combines the values of two descriptions, evaluated left to right.
    ///
    /// If this description fails, `other` is never evaluated.
    pub fn zip_with<B, C, F>(self, other: IO<R, E, B>, function: F) -> IO<R, E, C>
    where
        B: 'static,
        C: 'static,
        F: Fn(A, B) -> C + 'static,
    {
        let combine = move |first: Value, second: Value| -> Result<Value, InterpretError> {
            let first = unerase::<A>(first, "zip left value")?;
            let second = unerase::<B>(second, "zip right value")?;
            Ok(Box::new(function(first, second)) as Value)
        };
        IO::from_node(Node::Zip {
            left: self.into_node(),
            right: other.into_node(),
            combine: Rc::new(combine),
        })
    }

    /// Pairs the values of two descriptions, evaluated left to right.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<(), (), (i32, &str)> = IO::succeed(1).zip(IO::succeed("one"));
    /// assert_eq!(io.run(()), Ok((1, "one")));
    /// ```
    pub fn zip<B: 'static>(self, other: IO<R, E, B>) -> IO<R, E, (A, B)> {
        self.zip_with(other, |first, second| (first, second))
    }
}

// =============================================================================
// Failure Handling
// =============================================================================

impl<R, E, A> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: 'static,
{
    /// Recovers from a failure with `recover`.
    ///
    /// If this description succeeds, `recover` is never called. The failure
    /// type of the result is the failure type of the recovery.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<(), String, usize> = IO::<(), &str, usize>::fail("boom")
    ///     .catch_all(|error| IO::succeed(error.len()));
    /// assert_eq!(io.run(()), Ok(4));
    /// ```
    pub fn catch_all<E2, F>(self, recover: F) -> IO<R, E2, A>
    where
        E2: 'static,
        F: Fn(E) -> IO<R, E2, A> + 'static,
    {
        IO::from_node(Node::CatchAll {
            prior: self.into_node(),
            recover: Rc::new(FlatMapArrow::new(move |error: E| {
                recover(error).into_node()
            })),
        })
    }

    /// Handles both outcomes; exactly one of the two functions runs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<(), (), String> = IO::<(), &str, i32>::fail("x").fold_m(
    ///     |error| IO::succeed(format!("err:{error}")),
    ///     |value| IO::succeed(format!("ok:{value}")),
    /// );
    /// assert_eq!(io.run(()), Ok("err:x".to_string()));
    /// ```
    pub fn fold_m<E2, B, G, H>(self, on_failure: G, on_success: H) -> IO<R, E2, B>
    where
        E2: 'static,
        B: 'static,
        G: Fn(E) -> IO<R, E2, B> + 'static,
        H: Fn(A) -> IO<R, E2, B> + 'static,
    {
        IO::from_node(Node::Fold {
            prior: self.into_node(),
            on_failure: Rc::new(FlatMapArrow::new(move |error: E| {
                on_failure(error).into_node()
            })),
            on_success: Rc::new(FlatMapArrow::new(move |value: A| {
                on_success(value).into_node()
            })),
        })
    }

    /// Handles both outcomes with pure functions; the result never fails.
    pub fn fold<E2, B, G, H>(self, on_failure: G, on_success: H) -> IO<R, E2, B>
    where
        E2: 'static,
        B: 'static,
        G: Fn(E) -> B + 'static,
        H: Fn(A) -> B + 'static,
    {
        IO::from_node(Node::Fold {
            prior: self.into_node(),
            on_failure: Rc::new(PureArrow::new(move |error: E| {
                Outcome::success(on_failure(error))
            })),
            on_success: Rc::new(PureArrow::new(move |value: A| {
                Outcome::success(on_success(value))
            })),
        })
    }

    /// Materialises the outcome as a `Result`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io = IO::<(), &str, i32>::fail("boom").either::<()>();
    /// assert_eq!(io.run(()), Ok(Err("boom")));
    /// ```
    pub fn either<E2: 'static>(self) -> IO<R, E2, Result<A, E>> {
        self.fold(Err, Ok)
    }

    /// Transforms the failure value.
    pub fn map_error<E2, F>(self, function: F) -> IO<R, E2, A>
    where
        E2: 'static,
        F: Fn(E) -> E2 + 'static,
    {
        IO::from_node(Node::CatchAll {
            prior: self.into_node(),
            recover: Rc::new(PureArrow::new(move |error: E| {
                Outcome::failure(function(error))
            })),
        })
    }

    /// Widens the failure type into a union that can be built from it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// #[derive(Debug, PartialEq)]
    /// enum AppError {
    ///     NotFound(&'static str),
    /// }
    ///
    /// impl From<&'static str> for AppError {
    ///     fn from(key: &'static str) -> Self {
    ///         Self::NotFound(key)
    ///     }
    /// }
    ///
    /// let io = IO::<(), &'static str, i32>::fail("user").widen_error::<AppError>();
    /// assert_eq!(io.run(()), Err(AppError::NotFound("user")));
    /// ```
    pub fn widen_error<E2>(self) -> IO<R, E2, A>
    where
        E2: From<E> + 'static,
    {
        self.map_error(E2::from)
    }
}

// =============================================================================
// Environment
// =============================================================================

impl<R, E, A> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: 'static,
{
    /// Runs this description inside an environment derived from an outer one.
    ///
    /// Accesses inside this description see `narrow(outer)`. The outer
    /// environment is restored once the description settles, so siblings
    /// outside the boundary are unaffected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// struct Outer {
    ///     x: i32,
    /// }
    ///
    /// struct Inner {
    ///     a: i32,
    /// }
    ///
    /// let io: IO<Outer, (), i32> = IO::access(|inner: &Inner| inner.a)
    ///     .provide_some(|outer: &Outer| Inner { a: outer.x });
    /// assert_eq!(io.run(Outer { x: 42 }), Ok(42));
    /// ```
    pub fn provide_some<R0, F>(self, narrow: F) -> IO<R0, E, A>
    where
        R0: 'static,
        F: Fn(&R0) -> R + 'static,
    {
        IO::from_node(Node::Provide {
            prior: self.into_node(),
            narrow: Rc::new(move |outer: &dyn Any| {
                outer
                    .downcast_ref::<R0>()
                    .map(|outer| Rc::new(narrow(outer)) as Environment)
                    .ok_or(InterpretError::TypeMismatch {
                        context: "provide_some environment",
                    })
            }),
        })
    }

    /// Satisfies the whole requirement with a fixed environment.
    pub fn provide<R0: 'static>(self, environment: R) -> IO<R0, E, A>
    where
        R: Clone,
    {
        self.provide_some(move |_: &R0| environment.clone())
    }

    /// Lifts this description into any environment that [`Has`] its own.
    ///
    /// This is how requirements are conjoined: descriptions over `Db` and
    /// `Clock` both lift into an `R: Has<Db> + Has<Clock>` and then compose.
    pub fn lift_environment<R0>(self) -> IO<R0, E, A>
    where
        R0: Has<R> + 'static,
        R: Clone,
    {
        self.provide_some(|outer: &R0| <R0 as Has<R>>::get(outer).clone())
    }
}

// =============================================================================
// Resources
// =============================================================================

impl<R, E, A> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: 'static,
{
    /// Acquires a value with this description, uses it, and always finalizes it.
    ///
    /// - If acquisition fails, neither `use_resource` nor `finalize` runs.
    /// - Otherwise `finalize` runs exactly once with the acquired value and
    ///   the outcome of `use_resource`, whether that succeeded or failed.
    /// - If `finalize` succeeds, the outcome of `use_resource` is returned
    ///   unchanged. If `finalize` fails, its failure replaces that outcome.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let released = Rc::new(RefCell::new(Vec::new()));
    /// let log = released.clone();
    ///
    /// let io: IO<(), &str, i32> = IO::succeed(1).bracket(
    ///     |_| IO::fail("boom"),
    ///     move |handle, exit| {
    ///         log.borrow_mut().push((handle, *exit));
    ///         IO::unit()
    ///     },
    /// );
    ///
    /// assert_eq!(io.run(()), Err("boom"));
    /// assert_eq!(*released.borrow(), vec![(1, Err("boom"))]);
    /// ```
    pub fn bracket<B, X, U, F>(self, use_resource: U, finalize: F) -> IO<R, E, B>
    where
        A: Clone,
        B: 'static,
        X: 'static,
        U: Fn(A) -> IO<R, E, B> + 'static,
        F: Fn(A, &Result<B, E>) -> IO<R, E, X> + 'static,
    {
        IO::from_node(Node::Bracket {
            acquire: self.into_node(),
            resource: Rc::new(Resource::new(
                move |acquired: A| use_resource(acquired).into_node(),
                move |acquired: A, exit: &Result<B, E>| finalize(acquired, exit).into_node(),
            )),
        })
    }

    /// Runs `finalizer` after this description, whatever its outcome.
    ///
    /// Follows the same policy as [`IO::bracket`]: a failing finalizer
    /// replaces the outcome.
    pub fn ensuring<X: 'static>(self, finalizer: IO<R, E, X>) -> Self {
        Self::from_node(Node::Ensuring {
            prior: self.into_node(),
            finalizer: finalizer.into_node(),
        })
    }
}

// =============================================================================
// Evaluation
// =============================================================================

impl<R, E, A> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: 'static,
{
    /// Evaluates this description against `environment` with a default [`Runtime`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use effio::effect::IO;
    ///
    /// let io: IO<i32, String, i32> = IO::access(|n: &i32| n * 2);
    /// assert_eq!(io.run(21), Ok(42));
    /// assert_eq!(io.run(5), Ok(10));
    /// ```
    pub fn run(&self, environment: R) -> Result<A, E> {
        Runtime::default().run(environment, self)
    }
}
