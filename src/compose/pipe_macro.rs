//! The `pipe!` macro for left-to-right function application.
//!
//! Combined with the curried functions in
//! [`effect::pipeable`](crate::effect::pipeable), it lets effect programs
//! read in the order they run.

/// Pipes a value through a series of functions from left to right.
///
/// `pipe!(x, f, g, h)` is equivalent to `h(g(f(x)))`.
///
/// # Syntax
///
/// - `pipe!(x)` - Returns `x` unchanged
/// - `pipe!(x, f)` - Returns `f(x)`
/// - `pipe!(x, f, g, ...)` - Returns `...g(f(x))`
///
/// Each function is called exactly once, so [`FnOnce`] is enough. The
/// curried combinators of the effect module return `impl FnOnce`.
///
/// # Examples
///
/// ## Plain functions
///
/// ```
/// use effio::pipe;
///
/// fn to_string(x: i32) -> String { x.to_string() }
/// fn get_length(s: String) -> usize { s.len() }
///
/// assert_eq!(pipe!(12345, to_string, get_length), 5);
/// ```
///
/// ## Effect pipelines
///
/// ```
/// use effio::effect::pipeable::{catch_all, chain, fail, map, succeed};
/// use effio::effect::IO;
/// use effio::pipe;
///
/// let program: IO<(), String, i32> = pipe!(
///     succeed(20),
///     chain(|x: i32| if x > 10 { fail(format!("{x} too big")) } else { succeed(x) }),
///     catch_all(|error: String| succeed(error.len() as i32)),
///     map(|x: i32| x * 2)
/// );
///
/// assert_eq!(program.run(()), Ok(22));
/// ```
#[macro_export]
macro_rules! pipe {
    ($value:expr) => {
        $value
    };

    ($value:expr, $function:expr $(,)?) => {
        $function($value)
    };

    ($value:expr, $function:expr, $($remaining_functions:expr),+ $(,)?) => {
        $crate::pipe!($function($value), $($remaining_functions),+)
    };
}
