//! HTTP protocol layer module
//!
//! Glue between hyper's types and the transport-neutral handler result.

pub mod response;

// Re-export commonly used types
pub use response::{build_404_response, build_405_response, build_result_response};
