//! Free-function and curried forms of the `IO` API.
//!
//! Every combinator here takes its configuration first and returns a
//! function from the description to the new description, so that programs
//! read top to bottom with [`pipe!`](crate::pipe):
//!
//! ```rust
//! use effio::effect::pipeable::{access, chain, fail, run, succeed};
//! use effio::pipe;
//!
//! struct Input {
//!     n: i32,
//! }
//!
//! let program = pipe!(
//!     access(|input: &Input| input.n),
//!     chain(|n: i32| {
//!         if n > 0 {
//!             fail("positive")
//!         } else {
//!             succeed(format!("got {n}"))
//!         }
//!     })
//! );
//!
//! assert_eq!(run(Input { n: -1 })(program.clone()), Ok("got -1".to_string()));
//! assert_eq!(run(Input { n: 5 })(program), Err("positive"));
//! ```

use super::io::IO;

// =============================================================================
// Constructors
// =============================================================================

/// See [`IO::succeed`].
pub fn succeed<R, E, A>(value: A) -> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: Clone + 'static,
{
    IO::succeed(value)
}

/// See [`IO::succeed_with`].
pub fn succeed_with<R, E, A, F>(producer: F) -> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: 'static,
    F: Fn() -> A + 'static,
{
    IO::succeed_with(producer)
}

/// See [`IO::fail`].
pub fn fail<R, E, A>(error: E) -> IO<R, E, A>
where
    R: 'static,
    E: Clone + 'static,
    A: 'static,
{
    IO::fail(error)
}

/// See [`IO::fail_with`].
pub fn fail_with<R, E, A, F>(producer: F) -> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: 'static,
    F: Fn() -> E + 'static,
{
    IO::fail_with(producer)
}

/// See [`IO::access`].
pub fn access<R, E, A, F>(accessor: F) -> IO<R, E, A>
where
    R: 'static,
    E: 'static,
    A: 'static,
    F: Fn(&R) -> A + 'static,
{
    IO::access(accessor)
}

/// See [`IO::unit`].
pub fn unit<R, E>() -> IO<R, E, ()>
where
    R: 'static,
    E: 'static,
{
    IO::unit()
}

// =============================================================================
// Combinators
// =============================================================================

/// Curried [`IO::chain`].
pub fn chain<R, E, A, B, F>(function: F) -> impl FnOnce(IO<R, E, A>) -> IO<R, E, B>
where
    R: 'static,
    E: 'static,
    A: 'static,
    B: 'static,
    F: Fn(A) -> IO<R, E, B> + 'static,
{
    move |io| io.chain(function)
}

/// Curried [`IO::map`].
pub fn map<R, E, A, B, F>(function: F) -> impl FnOnce(IO<R, E, A>) -> IO<R, E, B>
where
    R: 'static,
    E: 'static,
    A: 'static,
    B: 'static,
    F: Fn(A) -> B + 'static,
{
    move |io| io.map(function)
}

/// Curried [`IO::catch_all`].
pub fn catch_all<R, E, E2, A, F>(recover: F) -> impl FnOnce(IO<R, E, A>) -> IO<R, E2, A>
where
    R: 'static,
    E: 'static,
    E2: 'static,
    A: 'static,
    F: Fn(E) -> IO<R, E2, A> + 'static,
{
    move |io| io.catch_all(recover)
}

/// Curried [`IO::fold_m`].
pub fn fold_m<R, E, E2, A, B, G, H>(
    on_failure: G,
    on_success: H,
) -> impl FnOnce(IO<R, E, A>) -> IO<R, E2, B>
where
    R: 'static,
    E: 'static,
    E2: 'static,
    A: 'static,
    B: 'static,
    G: Fn(E) -> IO<R, E2, B> + 'static,
    H: Fn(A) -> IO<R, E2, B> + 'static,
{
    move |io| io.fold_m(on_failure, on_success)
}

/// Curried [`IO::provide_some`].
pub fn provide_some<R0, R, E, A, F>(narrow: F) -> impl FnOnce(IO<R, E, A>) -> IO<R0, E, A>
where
    R0: 'static,
    R: 'static,
    E: 'static,
    A: 'static,
    F: Fn(&R0) -> R + 'static,
{
    move |io| io.provide_some(narrow)
}

/// Curried [`IO::bracket`].
pub fn bracket<R, E, A, B, X, U, F>(
    use_resource: U,
    finalize: F,
) -> impl FnOnce(IO<R, E, A>) -> IO<R, E, B>
where
    R: 'static,
    E: 'static,
    A: Clone + 'static,
    B: 'static,
    X: 'static,
    U: Fn(A) -> IO<R, E, B> + 'static,
    F: Fn(A, &Result<B, E>) -> IO<R, E, X> + 'static,
{
    move |io| io.bracket(use_resource, finalize)
}

// =============================================================================
// Evaluation
// =============================================================================

/// Curried [`IO::run`]: `run(environment)(io)`.
pub fn run<R, E, A>(environment: R) -> impl FnOnce(IO<R, E, A>) -> Result<A, E>
where
    R: 'static,
    E: 'static,
    A: 'static,
{
    move |io| io.run(environment)
}
