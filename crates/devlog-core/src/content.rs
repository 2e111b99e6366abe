//! Block rendering for post bodies.
//!
//! Post content is markdown-ish text. It is not parsed. It is cut on blank
//! lines and each segment is classified by its prefix:
//!
//! - `## ` and `### ` become headings,
//! - a segment opening with a code fence becomes a code block,
//! - everything else becomes a paragraph with inline code spans.
//!
//! There is no nesting and no link or emphasis handling. A fenced block that
//! contains a blank line is cut in two like any other segment.

use std::borrow::Cow;

use lazy_regex::{Lazy, Regex, lazy_regex};
use serde::Serialize;

const FENCE: &str = "```";

static INLINE_CODE: Lazy<Regex> = lazy_regex!(r"`([^`]+)`");

/// One rendered segment of a post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Code {
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        code: String,
    },
    Paragraph {
        html: String,
    },
}

/// Render a post body into blocks.
pub fn render(content: &str) -> Vec<Block> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(render_segment)
        .collect()
}

fn render_segment(segment: &str) -> Block {
    if let Some(text) = segment.strip_prefix("## ") {
        Block::Heading {
            level: 2,
            text: text.to_string(),
        }
    } else if let Some(text) = segment.strip_prefix("### ") {
        Block::Heading {
            level: 3,
            text: text.to_string(),
        }
    } else if segment.starts_with(FENCE) {
        render_code(segment)
    } else {
        Block::Paragraph {
            html: inline_code(&escape_html(segment)).into_owned(),
        }
    }
}

fn render_code(segment: &str) -> Block {
    let body = &segment[FENCE.len()..];
    let (info, code) = match body.split_once('\n') {
        Some((info, rest)) => (info.trim(), rest),
        // A single-line fence carries no info string.
        None => ("", body),
    };
    let code = code.strip_suffix(FENCE).unwrap_or(code);
    let code = code.strip_suffix('\n').unwrap_or(code);

    Block::Code {
        language: (!info.is_empty()).then(|| info.to_string()),
        code: code.to_string(),
    }
}

/// Wrap backtick spans in `<code>` tags.
pub fn inline_code(text: &str) -> Cow<'_, str> {
    INLINE_CODE.replace_all(text, "<code>$1</code>")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
