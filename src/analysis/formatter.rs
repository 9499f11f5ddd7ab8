//! Section text formatter
//!
//! Line-oriented, single-pass conversion of a section's text into HTML:
//! - lines starting with `- ` or `* ` become list items
//! - each contiguous run of items becomes one `<ul>`
//! - every other line break becomes `<br>`
//!
//! All text is HTML-escaped before it is wrapped in markup.

use serde::Serialize;

use super::NO_INFORMATION;

/// A unit of formatted section text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum FormattedBlock {
    /// Consecutive bullet lines, bullets stripped
    List(Vec<String>),
    /// Any other line, kept verbatim (may be empty)
    Line(String),
}

/// Split section text into list runs and plain lines.
pub fn format_blocks(text: &str) -> Vec<FormattedBlock> {
    let mut blocks: Vec<FormattedBlock> = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match bullet_item(line) {
            Some(item) => match blocks.last_mut() {
                Some(FormattedBlock::List(items)) => items.push(item.to_string()),
                _ => blocks.push(FormattedBlock::List(vec![item.to_string()])),
            },
            None => blocks.push(FormattedBlock::Line(line.to_string())),
        }
    }

    blocks
}

/// Render blocks as an HTML fragment. Adjacent blocks are separated by `<br>`.
pub fn blocks_to_html(blocks: &[FormattedBlock]) -> String {
    let mut html = String::new();

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            html.push_str("<br>");
        }
        match block {
            FormattedBlock::List(items) => {
                html.push_str("<ul>");
                for item in items {
                    html.push_str("<li>");
                    html.push_str(&html_escape::encode_text(item));
                    html.push_str("</li>");
                }
                html.push_str("</ul>");
            }
            FormattedBlock::Line(line) => html.push_str(&html_escape::encode_text(line)),
        }
    }

    html
}

/// Format one section for display.
///
/// Absent, empty, or sentinel input yields the sentinel unchanged.
/// Whitespace-only text is formatted like any other text.
pub fn format_section(text: Option<&str>) -> String {
    match text {
        Some(text) if !text.is_empty() && text != NO_INFORMATION => {
            blocks_to_html(&format_blocks(text))
        }
        _ => NO_INFORMATION.to_string(),
    }
}

fn bullet_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_inputs() {
        assert_eq!(format_section(None), NO_INFORMATION);
        assert_eq!(format_section(Some("")), NO_INFORMATION);
        assert_eq!(format_section(Some(NO_INFORMATION)), NO_INFORMATION);
    }

    #[test]
    fn test_whitespace_only_is_formatted() {
        assert_eq!(format_section(Some("  \n ")), "  <br> ");
    }

    #[test]
    fn test_list_then_plain_line() {
        assert_eq!(
            format_section(Some("- a\n- b\nplain")),
            "<ul><li>a</li><li>b</li></ul><br>plain"
        );
        assert_eq!(
            format_blocks("- a\n- b\nplain"),
            vec![
                FormattedBlock::List(vec!["a".into(), "b".into()]),
                FormattedBlock::Line("plain".into()),
            ]
        );
    }

    #[test]
    fn test_star_bullets() {
        assert_eq!(format_section(Some("* one\n* two")), "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn test_mixed_bullets_share_a_run() {
        assert_eq!(format_blocks("- a\n* b").len(), 1);
    }

    #[test]
    fn test_separate_runs_get_separate_lists() {
        assert_eq!(
            format_section(Some("- a\nbreak\n- b")),
            "<ul><li>a</li></ul><br>break<br><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_plain_text_keeps_line_breaks() {
        assert_eq!(format_section(Some("Low risk.\n\nSign it.")), "Low risk.<br><br>Sign it.");
        assert_eq!(format_section(Some("single line")), "single line");
    }

    #[test]
    fn test_bullet_needs_space() {
        let blocks = format_blocks("-no space\n-\n-- double");
        assert!(blocks.iter().all(|b| matches!(b, FormattedBlock::Line(_))));
    }

    #[test]
    fn test_bare_bullet_is_empty_item() {
        assert_eq!(
            format_blocks("- \n- a"),
            vec![FormattedBlock::List(vec![String::new(), "a".into()])]
        );
        assert_eq!(format_section(Some("* \n* a")), "<ul><li></li><li>a</li></ul>");
    }

    #[test]
    fn test_indented_bullet_is_plain() {
        assert_eq!(format_section(Some("  - nested")), "  - nested");
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(format_section(Some("- a\r\n- b")), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_escapes_markup() {
        let html = format_section(Some("- <script>alert(1)</script>\nA & B"));
        assert_eq!(
            html,
            "<ul><li>&lt;script&gt;alert(1)&lt;/script&gt;</li></ul><br>A &amp; B"
        );
    }
}
