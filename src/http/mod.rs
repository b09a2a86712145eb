//! HTTP protocol layer module
//!
//! Response body type and status-specific response builders. Kept free of
//! filesystem logic so handlers only decide *which* response to build.

pub mod response;

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;

/// Body type shared by every response: fixed buffers and file streams alike
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// Wrap an in-memory buffer as a [`ResponseBody`]
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// An empty [`ResponseBody`]
pub fn empty() -> ResponseBody {
    full(Bytes::new())
}

pub use response::{
    build_405_response, build_500_response, build_download_response, build_error_response,
    build_html_response, content_disposition,
};
