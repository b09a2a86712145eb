//! Directory index responses

use std::path::Path;

use hyper::Response;

use crate::http::{self, ResponseBody};
use crate::walker::{list_directory, render_index};

/// List `dir` and render it as the page for `request_path`
///
/// Enumeration failures render an empty index rather than an error page.
pub async fn serve_index(request_path: &str, dir: &Path) -> Response<ResponseBody> {
    let entries = list_directory(dir).await;
    http::build_html_response(render_index(request_path, &entries))
}
