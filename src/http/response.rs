//! HTTP response building module
//!
//! Provides builders for every response the server sends.

use hyper::header::{ALLOW, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::{empty, full, ResponseBody};
use crate::error::ServeError;

/// Bytes left as-is in a download file name, besides ASCII alphanumerics
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'*');

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Build 200 response for a rendered directory index
pub fn build_html_response(content: String) -> Response<ResponseBody> {
    let content_length = content.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(full(content))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(empty())
        })
}

/// Build 200 response streaming a file as an attachment
pub fn build_download_response(
    body: ResponseBody,
    file_name: &str,
    len: u64,
) -> Response<ResponseBody> {
    match Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/octet-stream")
        .header(CONTENT_LENGTH, len)
        .header(CONTENT_DISPOSITION, content_disposition(file_name))
        .body(body)
    {
        Ok(resp) => resp,
        Err(e) => {
            log_build_error("download", &e);
            build_500_response()
        }
    }
}

/// Build the client-visible response for a per-request failure
///
/// Client errors echo the message; server errors send an empty body.
pub fn build_error_response(err: &ServeError) -> Response<ResponseBody> {
    let status = err.status();
    if status.is_server_error() {
        return build_500_response();
    }

    let message = err.to_string();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(CONTENT_LENGTH, message.len())
        .body(full(message))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(empty())
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(ALLOW, "GET")
        .body(full("405 Method Not Allowed"))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(empty())
        })
}

/// Build 500 response with an empty body
pub fn build_500_response() -> Response<ResponseBody> {
    let mut resp = Response::new(empty());
    *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    resp.headers_mut()
        .insert(CONTENT_TYPE, hyper::header::HeaderValue::from_static(TEXT_PLAIN));
    resp.headers_mut()
        .insert(CONTENT_LENGTH, hyper::header::HeaderValue::from_static("0"));
    resp
}

/// `Content-Disposition` value telling the client to save `file_name`
pub fn content_disposition(file_name: &str) -> String {
    format!(
        "attachment; filename=\"{}\"",
        utf8_percent_encode(file_name, FILENAME_ENCODE_SET)
    )
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<ResponseBody>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_content_disposition_plain_name() {
        assert_eq!(
            content_disposition("report.txt"),
            "attachment; filename=\"report.txt\""
        );
        assert_eq!(
            content_disposition("a-b_c*.tar.gz"),
            "attachment; filename=\"a-b_c*.tar.gz\""
        );
    }

    #[test]
    fn test_content_disposition_encodes_specials() {
        assert_eq!(
            content_disposition("a b\".txt"),
            "attachment; filename=\"a%20b%22.txt\""
        );
        assert_eq!(
            content_disposition("\u{6587}.txt"),
            "attachment; filename=\"%E6%96%87.txt\""
        );
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let resp = build_error_response(&ServeError::PathNotFound("/missing.txt".into()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[CONTENT_TYPE], TEXT_PLAIN);
        assert!(body_string(resp).await.contains("/missing.txt"));
    }

    #[tokio::test]
    async fn test_server_error_has_empty_body() {
        let resp = build_error_response(&ServeError::Io(std::io::Error::other("disk")));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "");
    }

    #[tokio::test]
    async fn test_html_response() {
        let resp = build_html_response("<p>hi</p>".to_string());
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "9");
        assert_eq!(body_string(resp).await, "<p>hi</p>");
    }

    #[test]
    fn test_405_allows_get_only() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET");
    }
}
