//! Function composition utilities.
//!
//! - [`pipe!`]: apply functions left-to-right (data flow style)
//!
//! # Examples
//!
//! ```
//! use effio::pipe;
//!
//! fn add_one(x: i32) -> i32 { x + 1 }
//! fn double(x: i32) -> i32 { x * 2 }
//!
//! // pipe!(x, f, g) = g(f(x))
//! assert_eq!(pipe!(5, double, add_one), 11);
//! ```

mod pipe_macro;
