//! Environment-aware effect descriptions and their interpreter.
//!
//! This module provides [`IO<R, E, A>`](IO): a value describing a computation
//! that reads an environment `R`, may fail with `E`, and succeeds with `A`.
//! Descriptions are assembled from a handful of primitives and evaluated by a
//! stack-safe [`Runtime`].
//!
//! # Primitives
//!
//! - [`IO::succeed`] / [`IO::fail`]: settle immediately
//! - [`IO::access`]: read the environment
//! - [`IO::chain`]: sequence on success
//! - [`IO::catch_all`]: recover on failure
//! - [`IO::fold_m`]: branch on either outcome
//! - [`IO::provide_some`]: run inside a derived environment
//! - [`IO::bracket`]: acquire, use and always finalize a resource
//!
//! Everything else (`map`, `zip`, `either`, `map_error`, `ensuring`, ...) is
//! built from these.
//!
//! # Pipelines
//!
//! The [`pipeable`] module offers the same API as curried free functions for
//! use with [`pipe!`](crate::pipe).
//!
//! # Examples
//!
//! ```rust
//! use effio::effect::IO;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum LookupError {
//!     Missing(String),
//! }
//!
//! struct Directory {
//!     users: Vec<(u32, String)>,
//! }
//!
//! fn find_user(id: u32) -> IO<Directory, LookupError, String> {
//!     IO::access(move |directory: &Directory| {
//!         directory
//!             .users
//!             .iter()
//!             .find(|(key, _)| *key == id)
//!             .map(|(_, name)| name.clone())
//!     })
//!     .chain(move |found| match found {
//!         Some(name) => IO::succeed(name),
//!         None => IO::fail(LookupError::Missing(id.to_string())),
//!     })
//! }
//!
//! let directory = || Directory {
//!     users: vec![(1, "ada".to_string())],
//! };
//!
//! assert_eq!(find_user(1).run(directory()), Ok("ada".to_string()));
//! assert_eq!(
//!     find_user(2).run(directory()),
//!     Err(LookupError::Missing("2".to_string()))
//! );
//!
//! let recovered = find_user(2).catch_all(|_| IO::<Directory, (), _>::succeed("guest".to_string()));
//! assert_eq!(recovered.run(directory()), Ok("guest".to_string()));
//! ```

mod config;
mod environment;
mod error;
mod frame;
mod io;
mod node;
pub mod pipeable;
mod runtime;

pub use config::{DEFAULT_FRAME_CAPACITY, RuntimeConfig};
pub use environment::Has;
pub use error::InterpretError;
pub use io::IO;
pub use runtime::Runtime;
