//! HTML index rendering
//!
//! Produces the directory page: a `.` row, a `..` row unless at `/`, then
//! one row per entry. Links are plain `current/name` paths.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::listing::DirEntry;
use super::size::human_size;

const DIR_ICON: &str = "\u{1F4C2}";
const FILE_ICON: &str = "\u{1F4C4}";

/// Render a complete HTML document for `request_path`
pub fn render_index(request_path: &str, entries: &[DirEntry]) -> String {
    let current = normalize(request_path);
    let current = current.as_str();
    let mut rows = String::new();

    push_row(&mut rows, DIR_ICON, current, ".", "-");

    // Child links are built on `base`, which is empty at the root so
    // children become `/name` instead of `//name`.
    let base = if current == "/" {
        ""
    } else {
        let parent = current.rfind('/').map_or("", |i| &current[..i]);
        push_row(
            &mut rows,
            DIR_ICON,
            if parent.is_empty() { "/" } else { parent },
            "..",
            "-",
        );
        current
    };

    for entry in entries {
        let href = format!("{base}/{}", entry.name);
        if entry.is_dir {
            push_row(&mut rows, DIR_ICON, &href, &entry.name, "-");
        } else {
            push_row(&mut rows, FILE_ICON, &href, &entry.name, &human_size(entry.size));
        }
    }

    format!("{}{rows}{}", page_head(current), PAGE_TAIL)
}

/// Rebuild the path from its non-empty segments
///
/// `/docs/` links like `/docs`, and `//docs` must not become a
/// protocol-relative `//docs` href.
fn normalize(request_path: &str) -> String {
    let segments: Vec<&str> = request_path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn push_row(out: &mut String, icon: &str, href: &str, label: &str, size: &str) {
    out.push_str(&format!(
        r#"      <li><span class="left">{icon}</span><a href="{}"><span class="left">{}</span></a> <span class="right">{size}</span></li>"#,
        encode_double_quoted_attribute(href),
        encode_text(label),
    ));
    out.push('\n');
}

fn page_head(current: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Index of {}</title>
  <style>
    li {{
      line-height: 30px;
      white-space: nowrap;
      overflow: hidden;
      width: 500px;
      text-overflow: ellipsis;
      list-style-type: none;
    }}
    a {{ display: inline-block; }}
    .left {{ float: left; }}
    .right {{ float: right; }}
  </style>
</head>
<body>
  <div>
    <ul>
"#,
        encode_text(current)
    )
}

const PAGE_TAIL: &str = r"    </ul>
  </div>
</body>
</html>
";
