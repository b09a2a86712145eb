//! Filesystem side of the server
//!
//! Resolves request paths under the served root, enumerates directories
//! and renders their HTML index. Nothing here knows about HTTP.

pub mod listing;
pub mod render;
pub mod resolve;
pub mod size;

pub use listing::{list_directory, DirEntry};
pub use render::render_index;
pub use resolve::{decode_request_path, resolve, ResolvedTarget, ServeRoot};
pub use size::human_size;
