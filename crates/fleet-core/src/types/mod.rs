//! Domain types for the fleet word scanner.
//!
//! # Module Organization
//!
//! - [`descriptor`] - Directory entry snapshots
//! - [`tally`] - Word occurrence counts
//! - [`result`] - Aggregation statistics
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use fleet_core::{AggregationResult, FileDescriptor, WordTally};
//! ```

pub mod descriptor;
pub mod result;
pub mod tally;

pub use descriptor::FileDescriptor;
pub use result::AggregationResult;
pub use tally::WordTally;
