//! Request handler module
//!
//! Dispatches requests from the connection layer to the echo handler.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
