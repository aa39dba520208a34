pub mod literal;
pub mod resolver;
pub mod shapes;

pub use shapes::{CallSite, ShapeTable};

use tracing::trace;

use crate::core::snippet::Fragment;
use literal::{unescape, unindent};

/// Runs every shape of `table` over `content` and returns the non-empty
/// fragments, shape by shape, each shape's matches left to right.
pub fn extract_fragments(content: &str, table: &ShapeTable) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for shape in table.shapes() {
        for caps in shape.regex.captures_iter(content) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.name("body")) else {
                continue;
            };
            let mut code = if shape.literal.decodes_escapes() {
                unescape(body.as_str())
            } else {
                body.as_str().to_string()
            };
            if shape.block {
                code = unindent(&code);
            }

            let trimmed = code.trim();
            if trimmed.is_empty() {
                continue;
            }
            let offset = whole.start();
            trace!(
                call_site = %shape.call_site,
                literal = shape.literal.as_str(),
                offset,
                "Matched literal"
            );
            fragments.push(Fragment {
                code: trimmed.to_string(),
                line: line_number(content, offset),
                offset,
            });
        }
    }
    fragments
}

/// 1-based line number of `offset`.
pub fn line_number(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
