//! Static HTML output for published pages.
//!
//! Every block type this build understands has a fixed markup; unknown
//! blocks are left out of the page.

mod compiler;

pub use compiler::{render_json, render_page_to_html, CompileOptions, RenderError, UNTITLED};
