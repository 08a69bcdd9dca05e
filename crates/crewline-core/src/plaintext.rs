//! Markdown-to-plain-text normalization.
//!
//! Generated output is lightly marked up; everything human-facing (terminal
//! rendering, email bodies) goes through [`to_plain_text`] first. The rewrite
//! order matters: code fences before inline backticks, images before links,
//! bold before italics.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n]*\n?(.*?)\n?```").expect("static regex"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("static regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("static regex"));
static BOLD_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("static regex"));
static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("static regex"));
static BOLD_UNDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(.*?)__").expect("static regex"));
static ITALIC_UNDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(.*?)_").expect("static regex"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s*").expect("static regex"));
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^>\s?").expect("static regex"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").expect("static regex"));
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*_]{3,}\s*$").expect("static regex"));
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));

/// Rewrite lightly-marked-up text into plain text.
///
/// Inputs with no markup pass through unchanged modulo trimming; the
/// function is idempotent on its own output for already-plain text.
pub fn to_plain_text(markup: &str) -> String {
    let text = FENCED_CODE.replace_all(markup, "$1");
    let text = text.replace('`', "");
    let text = IMAGE.replace_all(&text, "$1 ($2)");
    let text = LINK.replace_all(&text, "$1 ($2)");
    let text = BOLD_STAR.replace_all(&text, "$1");
    let text = ITALIC_STAR.replace_all(&text, "$1");
    let text = BOLD_UNDER.replace_all(&text, "$1");
    let text = ITALIC_UNDER.replace_all(&text, "$1");
    let text = HEADING.replace_all(&text, "");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = BULLET.replace_all(&text, "- ");
    let text = HORIZONTAL_RULE.replace_all(&text, "");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through_modulo_trim() {
        assert_eq!(to_plain_text("  just words  "), "just words");
        assert_eq!(to_plain_text("two\nlines"), "two\nlines");
    }

    #[test]
    fn test_idempotent_on_plain_text() {
        let once = to_plain_text("# Title\n\nSome **bold** text with a [link](https://x.dev).");
        assert_eq!(to_plain_text(&once), once);
    }

    #[test]
    fn test_links_and_images_become_label_url() {
        assert_eq!(
            to_plain_text("see [docs](https://docs.rs) and ![logo](https://x.dev/l.png)"),
            "see docs (https://docs.rs) and logo (https://x.dev/l.png)"
        );
    }

    #[test]
    fn test_headings_and_emphasis_are_stripped() {
        assert_eq!(
            to_plain_text("## Heading\n**bold** and *italic* and __strong__ and _em_"),
            "Heading\nbold and italic and strong and em"
        );
    }

    #[test]
    fn test_code_fences_keep_inner_text() {
        let input = "before\n```rust\nlet x = 1;\n```\nafter";
        assert_eq!(to_plain_text(input), "before\nlet x = 1;\nafter");
    }

    #[test]
    fn test_bullets_normalized_and_rules_dropped() {
        let input = "* one\n+ two\n- three\n---\nend";
        assert_eq!(to_plain_text(input), "- one\n- two\n- three\n\nend");
    }

    #[test]
    fn test_blank_runs_collapse() {
        assert_eq!(to_plain_text("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_blockquotes_stripped() {
        assert_eq!(to_plain_text("> quoted line\nplain"), "quoted line\nplain");
    }
}
