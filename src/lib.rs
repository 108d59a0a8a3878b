//! `hll-sketch` is a Rust crate designed to estimate the number of distinct elements in a stream or dataset
//! using fixed, sublinear memory.
//!
//! This library implements HyperLogLog with linear counting for the small range and
//! a 32-bit hash-space correction for the large range.
//!
//! ```
//! use hll_sketch::Sketch;
//!
//! let mut sketch: Sketch = Sketch::with_precision(12).unwrap();
//! for i in 0..1000 {
//!     sketch.insert(&i);
//! }
//! assert!((sketch.estimate() - 1000.0).abs() < 50.0);
//! ```
mod error;
mod registers;
pub mod sketch;

pub use error::ConfigError;
pub use sketch::Sketch;
