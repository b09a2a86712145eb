//! Request handler module
//!
//! Turns one HTTP request into one response: the router resolves the path,
//! then hands directories to `index` and files to `download`.

pub mod download;
pub mod index;
pub mod router;

pub use router::handle_request;
