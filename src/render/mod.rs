//! Frame output: the view image and the HTML document carrying it.

pub mod document;
pub mod image;

pub use document::render_document;
pub use image::{render_view, ImageData};

/// Escapes text for use in XML/HTML content and attribute values.
pub fn escape_markup(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
