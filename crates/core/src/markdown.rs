//! Markdown conversion for generated article bodies.
//!
//! The text-generation API returns plain text following a small
//! prompt-specified Markdown subset: `##`/`###` headings, `- ` bullets,
//! `N. ` ordered items, blank-line paragraph breaks. This module converts
//! that text into the editor document tree, tolerating arbitrary text that
//! ignores the conventions: anything unrecognised is paragraph prose, and
//! conversion never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Node;

static ORDERED_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s").unwrap());

static HEADING2_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##\s+").unwrap());
static HEADING3_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^###\s+").unwrap());
static BULLET_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[-*]\s+").unwrap());
static ORDERED_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s+").unwrap());

/// Converts Markdown-subset text into a `doc` node.
///
/// Single left-to-right pass over the lines. Each line is classified by its
/// trimmed prefix, in priority order: `## ` heading, `### ` heading, `- `
/// bullet item, `N. ` ordered item, blank, prose. Structural lines flush
/// the paragraph accumulated so far; consecutive list markers of the same
/// kind extend one open list node, while a non-list line (blank included)
/// closes it. Prose lines are buffered untrimmed and joined with newlines
/// when flushed.
///
/// A source that yields no blocks at all comes back as one paragraph
/// holding the input verbatim, so the result is never an empty document.
pub fn markdown_to_doc(markdown: &str) -> Node {
    let mut blocks: Vec<Node> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for line in markdown.split('\n') {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("## ") {
            flush_paragraph(&mut pending, &mut blocks);
            blocks.push(Node::heading(2, rest));
        } else if let Some(rest) = trimmed.strip_prefix("### ") {
            flush_paragraph(&mut pending, &mut blocks);
            blocks.push(Node::heading(3, rest));
        } else if let Some(rest) = trimmed.strip_prefix("- ") {
            flush_paragraph(&mut pending, &mut blocks);
            if !matches!(blocks.last(), Some(Node::BulletList { .. })) {
                blocks.push(Node::BulletList {
                    content: Vec::new(),
                });
            }
            if let Some(Node::BulletList { content }) = blocks.last_mut() {
                content.push(Node::list_item(rest));
            }
        } else if ORDERED_ITEM_RE.is_match(trimmed) {
            flush_paragraph(&mut pending, &mut blocks);
            if !matches!(blocks.last(), Some(Node::OrderedList { .. })) {
                blocks.push(Node::OrderedList {
                    content: Vec::new(),
                });
            }
            let rest = ORDERED_ITEM_RE.replace(trimmed, "").into_owned();
            if let Some(Node::OrderedList { content }) = blocks.last_mut() {
                content.push(Node::list_item(rest));
            }
        } else if trimmed.is_empty() {
            flush_paragraph(&mut pending, &mut blocks);
        } else {
            pending.push(line);
        }
    }

    flush_paragraph(&mut pending, &mut blocks);

    if blocks.is_empty() {
        blocks.push(Node::paragraph(markdown));
    }

    Node::Doc { content: blocks }
}

/// Joins the buffered prose lines and emits a paragraph if anything is left
/// after trimming; empty accumulations are dropped, never emitted.
fn flush_paragraph(pending: &mut Vec<&str>, blocks: &mut Vec<Node>) {
    if pending.is_empty() {
        return;
    }
    let joined = pending.join("\n");
    let text = joined.trim();
    if !text.is_empty() {
        blocks.push(Node::paragraph(text));
    }
    pending.clear();
}

/// Derives a plain-text excerpt from generated Markdown: line-leading
/// structure markers are stripped, the remainder trimmed and cut to
/// `max_chars` characters.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let text = HEADING2_MARKER_RE.replace_all(markdown, "");
    let text = HEADING3_MARKER_RE.replace_all(&text, "");
    let text = BULLET_MARKER_RE.replace_all(&text, "");
    let text = ORDERED_MARKER_RE.replace_all(&text, "");
    text.trim().chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blocks(doc: Node) -> Vec<Node> {
        match doc {
            Node::Doc { content } => content,
            other => panic!("expected a doc node, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_falls_back_to_one_empty_paragraph() {
        let content = blocks(markdown_to_doc(""));
        assert_eq!(content, vec![Node::paragraph("")]);
    }

    #[test]
    fn whitespace_only_input_is_wrapped_verbatim() {
        let content = blocks(markdown_to_doc("  \n\t\n"));
        assert_eq!(content, vec![Node::paragraph("  \n\t\n")]);
    }

    #[test]
    fn plain_text_becomes_a_single_paragraph() {
        let content = blocks(markdown_to_doc("plain text only"));
        assert_eq!(content, vec![Node::paragraph("plain text only")]);
    }

    #[test]
    fn heading_then_body() {
        let content = blocks(markdown_to_doc("## Title\nbody line"));
        assert_eq!(
            content,
            vec![Node::heading(2, "Title"), Node::paragraph("body line")]
        );
    }

    #[test]
    fn level_three_heading() {
        let content = blocks(markdown_to_doc("### Detail"));
        assert_eq!(content, vec![Node::heading(3, "Detail")]);
    }

    #[test]
    fn contiguous_bullets_merge_into_one_list() {
        let content = blocks(markdown_to_doc("- a\n- b\n- c"));
        assert_eq!(
            content,
            vec![Node::BulletList {
                content: vec![
                    Node::list_item("a"),
                    Node::list_item("b"),
                    Node::list_item("c"),
                ],
            }]
        );
    }

    #[test]
    fn blank_line_breaks_list_continuity() {
        let content = blocks(markdown_to_doc("- a\n\n- b"));
        assert_eq!(
            content,
            vec![
                Node::BulletList {
                    content: vec![Node::list_item("a")],
                },
                Node::BulletList {
                    content: vec![Node::list_item("b")],
                },
            ]
        );
    }

    #[test]
    fn ordered_items_strip_the_numeral_and_separator() {
        let content = blocks(markdown_to_doc("1. first\n2. second"));
        assert_eq!(
            content,
            vec![Node::OrderedList {
                content: vec![Node::list_item("first"), Node::list_item("second")],
            }]
        );
    }

    #[test]
    fn switching_list_kinds_opens_a_new_list() {
        let content = blocks(markdown_to_doc("- a\n1. b"));
        assert_eq!(
            content,
            vec![
                Node::BulletList {
                    content: vec![Node::list_item("a")],
                },
                Node::OrderedList {
                    content: vec![Node::list_item("b")],
                },
            ]
        );
    }

    #[test]
    fn bullet_marker_wins_over_heading_marker_inside_it() {
        let content = blocks(markdown_to_doc("- ### text"));
        assert_eq!(
            content,
            vec![Node::BulletList {
                content: vec![Node::list_item("### text")],
            }]
        );
    }

    #[test]
    fn decimal_number_prose_is_not_an_ordered_item() {
        // `^\d+\.\s` requires whitespace after the dot, so "3.5" stays prose.
        let content = blocks(markdown_to_doc("3.5 is a constant"));
        assert_eq!(content, vec![Node::paragraph("3.5 is a constant")]);
    }

    #[test]
    fn ordered_marker_consumes_a_single_whitespace_character() {
        let content = blocks(markdown_to_doc("1.  double spaced"));
        assert_eq!(
            content,
            vec![Node::OrderedList {
                content: vec![Node::list_item(" double spaced")],
            }]
        );
    }

    #[test]
    fn consecutive_prose_lines_join_with_newlines_untrimmed() {
        let content = blocks(markdown_to_doc("first line\n  second line"));
        assert_eq!(content, vec![Node::paragraph("first line\n  second line")]);
    }

    #[test]
    fn blank_lines_split_paragraphs() {
        let content = blocks(markdown_to_doc("one\n\ntwo"));
        assert_eq!(content, vec![Node::paragraph("one"), Node::paragraph("two")]);
    }

    #[test]
    fn leading_and_trailing_blank_lines_produce_nothing() {
        let content = blocks(markdown_to_doc("\n\nplain\n\n"));
        assert_eq!(content, vec![Node::paragraph("plain")]);
    }

    #[test]
    fn every_input_yields_at_least_one_block() {
        for input in ["", "\n", "## ", "- ", "text", "\n\n\n", "1. "] {
            let content = blocks(markdown_to_doc(input));
            assert!(!content.is_empty(), "no blocks for {input:?}");
        }
    }

    #[test]
    fn full_document_matches_the_editor_json_shape() {
        let doc = markdown_to_doc("## Review\nIt holds up.\n\n- light\n- fast");
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "type": "doc",
                "content": [
                    {
                        "type": "heading",
                        "attrs": { "level": 2 },
                        "content": [{ "type": "text", "text": "Review" }]
                    },
                    {
                        "type": "paragraph",
                        "content": [{ "type": "text", "text": "It holds up." }]
                    },
                    {
                        "type": "bulletList",
                        "content": [
                            {
                                "type": "listItem",
                                "content": [{
                                    "type": "paragraph",
                                    "content": [{ "type": "text", "text": "light" }]
                                }]
                            },
                            {
                                "type": "listItem",
                                "content": [{
                                    "type": "paragraph",
                                    "content": [{ "type": "text", "text": "fast" }]
                                }]
                            }
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn excerpt_strips_structure_markers() {
        let text = "## Intro\nBody text.\n- point one\n1. step one\n### Sub";
        assert_eq!(
            excerpt(text, 200),
            "Intro\nBody text.\npoint one\nstep one\nSub"
        );
    }

    #[test]
    fn excerpt_truncates_on_character_boundaries() {
        let text = "äöü".repeat(100);
        let cut = excerpt(&text, 5);
        assert_eq!(cut.chars().count(), 5);
        assert_eq!(cut, "äöüäö");
    }

    #[test]
    fn excerpt_of_empty_input_is_empty() {
        assert_eq!(excerpt("", 200), "");
    }
}
