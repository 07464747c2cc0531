//! Echo trigger
//!
//! An HTTP function that answers `GET` with a JSON description of the request
//! (headers, query parameters) and processing-time metadata, optionally after
//! waiting the number of seconds given in the `d` query parameter.
//!
//! [`echo`] holds the handler itself and has no dependency on the HTTP server;
//! the remaining modules host it on `tokio` + `hyper`.

pub mod config;
pub mod echo;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
