//! Browse a directory tree over HTTP and download its files.
//!
//! A request for a directory renders an HTML index of its children, a
//! request for a file streams it back as an attachment. Every request path
//! is confined to one root directory fixed at startup.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod walker;
