//! # effio
//!
//! Environment-aware effect descriptions with a stack-safe interpreter.
//!
//! ## Overview
//!
//! An [`IO<R, E, A>`](effect::IO) describes a computation that reads an
//! environment `R`, may fail with `E`, and succeeds with `A`. Descriptions
//! are plain values: they are built and combined without running anything,
//! and evaluated any number of times by a [`Runtime`](effect::Runtime).
//!
//! - **Constructors**: `succeed`, `fail`, `access`, `unit`
//! - **Combinators**: `chain`, `map`, `catch_all`, `fold_m`, `provide_some`, `bracket`
//! - **Interpreter**: explicit frame stack, constant native stack depth
//! - **Pipelines**: curried functions for the [`pipe!`] macro
//!
//! ## Feature Flags
//!
//! - `effect`: The effect algebra and its interpreter
//! - `compose`: The `pipe!` macro
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use effio::prelude::*;
//!
//! struct Config {
//!     retries: u32,
//! }
//!
//! let program: IO<Config, String, u32> = IO::access(|config: &Config| config.retries)
//!     .chain(|retries| {
//!         if retries == 0 {
//!             IO::fail("no retries left".to_string())
//!         } else {
//!             IO::succeed(retries - 1)
//!         }
//!     });
//!
//! assert_eq!(program.run(Config { retries: 3 }), Ok(2));
//! assert_eq!(program.run(Config { retries: 0 }), Err("no retries left".to_string()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use effio::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "compose")]
    pub use crate::pipe;

    #[cfg(feature = "effect")]
    pub use crate::effect::{Has, IO, InterpretError, Runtime, RuntimeConfig};
}

#[cfg(feature = "compose")]
pub mod compose;

#[cfg(feature = "effect")]
pub mod effect;
