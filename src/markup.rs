use std::{fs, path::Path};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static STANDARD_RULES: Lazy<MarkupRules> = Lazy::new(|| {
    MarkupRules {
        rules: vec![
            MarkupRule::pattern(r"\*(.*?)\*", "<i>$1</i>"),
            MarkupRule::pattern(r"``(.*?)``", r#"<FONT FACE="courier">$1</FONT>"#),
            MarkupRule::pattern(r"(.*?)\n==+\n+?", "<h2>$1</h2>"),
            MarkupRule::pattern(r"(.*?)\n--+\n+?", "<h3>$1</h3>"),
            MarkupRule::LiteralBlocks,
            MarkupRule::pattern(r"\n+", "</p><p>"),
        ],
    }
});

/// An ordered list of conversion steps turning lightweight markup into HTML.
///
/// Order matters: each rule runs over the output of the previous one.
#[derive(Debug)]
pub struct MarkupRules {
    rules: Vec<MarkupRule>,
}

#[derive(Debug)]
enum MarkupRule {
    /// A regex substitution applied across the whole buffer.
    Pattern {
        regex: Regex,
        replacement: &'static str,
    },
    /// Wraps the indented block after a `::` marker in `<pre>` tags. The
    /// continuation lines are identified by the indent prefix of the first
    /// indented line, which a single regex cannot express without an
    /// in-pattern backreference.
    LiteralBlocks,
}

impl MarkupRule {
    fn pattern(pattern: &str, replacement: &'static str) -> Self {
        MarkupRule::Pattern {
            regex: Regex::new(pattern).expect("markup rule pattern"),
            replacement,
        }
    }
}

impl MarkupRules {
    /// The standard rule set: `*italics*`, double-backtick monospace spans,
    /// `==`/`--` underlined headings, `::` literal blocks, and a final pass
    /// collapsing newline runs into paragraph breaks.
    #[must_use]
    pub fn standard() -> &'static MarkupRules {
        &STANDARD_RULES
    }

    /// Applies every rule in order and returns the converted buffer.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut buffer = text.to_string();
        for rule in &self.rules {
            buffer = match rule {
                MarkupRule::Pattern { regex, replacement } => {
                    regex.replace_all(&buffer, *replacement).into_owned()
                }
                MarkupRule::LiteralBlocks => wrap_literal_blocks(&buffer),
            };
        }
        buffer
    }
}

/// Reads a markup-formatted text file and converts it to HTML.
///
/// The intermediate result is logged at debug level for inspection; the
/// returned string is the contract. A missing or unreadable file propagates
/// the I/O error with the offending path attached.
pub fn html_from_markup_file<P: AsRef<Path>>(path: P, rules: &MarkupRules) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read markup file {}", path.display()))?;
    let html = rules.apply(&text);
    debug!(
        target: "help2html",
        path = %path.display(),
        html = %html,
        "converted markup file"
    );
    Ok(html)
}

fn wrap_literal_blocks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find("::") {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 2..];
        match take_literal_block(after) {
            Some((block, remainder)) => {
                out.push_str("<pre>");
                out.push_str(block);
                out.push_str("</pre>");
                rest = remainder;
            }
            None => {
                out.push_str("::");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Splits off the literal block following a `::` marker: the remainder of the
/// marker line (whitespace only), any blank lines, a first indented line that
/// fixes the indent prefix, then further lines sharing that prefix or blank.
/// Every consumed line must be newline-terminated. Returns `None` when no
/// block follows, leaving the marker untouched.
fn take_literal_block(input: &str) -> Option<(&str, &str)> {
    let (marker_rest, mut cursor) = terminated_line(input, 0)?;
    if !marker_rest.trim().is_empty() {
        return None;
    }

    let indent = loop {
        let (line, next) = terminated_line(input, cursor)?;
        if line.trim().is_empty() {
            cursor = next;
            continue;
        }
        let indent_len = line.len() - line.trim_start().len();
        if indent_len == 0 {
            return None;
        }
        cursor = next;
        break &line[..indent_len];
    };

    let mut end = cursor;
    while let Some((line, next)) = terminated_line(input, end) {
        if line.trim().is_empty() || line.starts_with(indent) {
            end = next;
        } else {
            break;
        }
    }

    Some((&input[..end], &input[end..]))
}

/// The newline-terminated line starting at `start`, without its newline, and
/// the index just past it. `None` when the remaining text has no newline.
fn terminated_line(input: &str, start: usize) -> Option<(&str, usize)> {
    let offset = input[start..].find('\n')?;
    Some((&input[start..start + offset], start + offset + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn italics_are_converted() {
        let html = MarkupRules::standard().apply("an *emphasized* word");
        assert_eq!(html, "an <i>emphasized</i> word");
    }

    #[test]
    fn double_backticks_become_monospace() {
        let html = MarkupRules::standard().apply("run ``gdalwarp`` first");
        assert_eq!(html, r#"run <FONT FACE="courier">gdalwarp</FONT> first"#);
    }

    #[test]
    fn equals_underline_becomes_h2() {
        let html = MarkupRules::standard().apply("Usage\n=====\nBody text\n");
        assert!(html.starts_with("<h2>Usage</h2>"));
        assert!(html.contains("Body text"));
    }

    #[test]
    fn dash_underline_becomes_h3() {
        let html = MarkupRules::standard().apply("Options\n-------\nBody text\n");
        assert!(html.starts_with("<h3>Options</h3>"));
    }

    #[test]
    fn newline_runs_collapse_into_paragraph_breaks() {
        let html = MarkupRules::standard().apply("first\n\nsecond\n");
        assert_eq!(html, "first</p><p>second</p><p>");
        assert!(!html.contains('\n'));
    }

    #[test]
    fn literal_block_is_wrapped_in_pre() {
        let text = "Example::\n\n   print(1)\n   print(2)\nAfter\n";
        let wrapped = wrap_literal_blocks(text);
        assert_eq!(
            wrapped,
            "Example<pre>\n\n   print(1)\n   print(2)\n</pre>After\n"
        );
    }

    #[test]
    fn literal_block_keeps_interior_blank_lines() {
        let text = "Code::\n\n  a\n\n  b\nEnd\n";
        let wrapped = wrap_literal_blocks(text);
        assert_eq!(wrapped, "Code<pre>\n\n  a\n\n  b\n</pre>End\n");
    }

    #[test]
    fn marker_without_indented_block_is_untouched() {
        let text = "see below::\nno indent here\n";
        assert_eq!(wrap_literal_blocks(text), text);
    }

    #[test]
    fn marker_with_trailing_text_is_untouched() {
        let text = "a::b\n";
        assert_eq!(wrap_literal_blocks(text), text);
    }

    #[test]
    fn literal_block_survives_the_full_pipeline() {
        let html = MarkupRules::standard().apply("Example::\n\n   code\nAfter\n");
        assert!(html.contains("<pre>"));
        assert!(html.contains("</pre>"));
        assert!(html.contains("code"));
    }

    #[test]
    fn heading_rule_runs_before_paragraph_collapse() {
        let html = MarkupRules::standard().apply("Title\n=====\n\nIntro paragraph\n");
        assert!(html.contains("<h2>Title</h2>"));
        assert!(!html.contains("====="));
    }

    #[test]
    fn markup_file_is_read_and_converted() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "a *styled* doc\n").expect("write fixture");

        let html =
            html_from_markup_file(file.path(), MarkupRules::standard()).expect("conversion");
        assert!(html.contains("<i>styled</i>"));
    }

    #[test]
    fn missing_markup_file_propagates_the_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.rst");

        let result = html_from_markup_file(&missing, MarkupRules::standard());
        assert!(result.is_err());
    }
}
