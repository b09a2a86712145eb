//! File download responses
//!
//! The file is streamed in fixed-size chunks, never buffered whole. If
//! opening the file fails the client gets a 500 with an empty body. Once
//! headers are out a read error can only abort the body, so the client
//! may receive a truncated file; that is not retried or repaired here.

use std::path::Path;

use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::Response;
use tokio::fs::File;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::config::MIN_CHUNK_SIZE;
use crate::http::{self, ResponseBody};
use crate::logger;

/// Stream the file at `path` as an attachment
pub async fn serve_file(path: &Path, chunk_size: usize) -> Response<ResponseBody> {
    let file = match File::open(path).await {
        Ok(f) => f,
        Err(e) => {
            logger::log_error(&format!("Failed to open '{}': {}", path.display(), e));
            return http::build_500_response();
        }
    };

    // Length from the open handle, not an earlier stat
    let len = match file.metadata().await {
        Ok(m) => m.len(),
        Err(e) => {
            logger::log_error(&format!("Failed to stat '{}': {}", path.display(), e));
            return http::build_500_response();
        }
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let body = stream_body(file, chunk_size, path.display().to_string());

    http::build_download_response(body, &file_name, len)
}

/// Chunked body over `reader`; a read error ends the stream with that error
fn stream_body<R>(reader: R, chunk_size: usize, shown: String) -> ResponseBody
where
    R: AsyncRead + Send + 'static,
{
    let stream = ReaderStream::with_capacity(reader, chunk_size.max(MIN_CHUNK_SIZE))
        .inspect_err(move |e| {
            logger::log_error(&format!("Download of '{shown}' aborted mid-stream: {e}"));
        })
        .map_ok(Frame::data);

    StreamBody::new(stream).boxed_unsync()
}
