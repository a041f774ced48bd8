//! Environment requirements and how they combine.
//!
//! A description over `R` can only be composed with descriptions over the
//! same `R`. Requirements are conjoined by naming an environment that
//! contains each of them and lifting every part into it:
//!
//! - [`IO::provide_some`](super::IO::provide_some) projects explicitly.
//! - [`IO::lift_environment`](super::IO::lift_environment) projects through
//!   [`Has`].
//!
//! Generic code states a conjunction as trait bounds, `R: Has<A> + Has<B>`,
//! and the compiler checks every composition at the point it is built.
//!
//! # Examples
//!
//! ```rust
//! use effio::effect::{Has, IO};
//!
//! #[derive(Clone)]
//! struct Greeting(String);
//!
//! #[derive(Clone)]
//! struct Name(String);
//!
//! struct App {
//!     greeting: Greeting,
//!     name: Name,
//! }
//!
//! impl Has<Greeting> for App {
//!     fn get(&self) -> &Greeting {
//!         &self.greeting
//!     }
//! }
//!
//! impl Has<Name> for App {
//!     fn get(&self) -> &Name {
//!         &self.name
//!     }
//! }
//!
//! fn greet<R: Has<Greeting> + Has<Name> + 'static>() -> IO<R, (), String> {
//!     let greeting: IO<Greeting, (), String> = IO::access(|g: &Greeting| g.0.clone());
//!     let name: IO<Name, (), String> = IO::access(|n: &Name| n.0.clone());
//!     greeting
//!         .lift_environment::<R>()
//!         .zip_with(name.lift_environment::<R>(), |g, n| format!("{g}, {n}!"))
//! }
//!
//! let app = App {
//!     greeting: Greeting("Hello".to_string()),
//!     name: Name("effio".to_string()),
//! };
//! assert_eq!(greet::<App>().run(app), Ok("Hello, effio!".to_string()));
//! ```

/// An environment that contains a `T`.
///
/// Every type trivially has itself.
pub trait Has<T> {
    /// Borrows the contained `T`.
    fn get(&self) -> &T;
}

impl<T> Has<T> for T {
    #[inline]
    fn get(&self) -> &T {
        self
    }
}
