//! The rich-text document tree shared with the editor.
//!
//! Articles store their body as a node tree in the shape the editor
//! component consumes: a root `doc` node owning an ordered sequence of
//! block nodes, leaf text carried in `{ "type": "text", "text": ... }`
//! runs, heading levels in `attrs`. Anything in this backend that produces
//! article content must emit this shape exactly; the database stores it
//! opaque.

use serde::{Deserialize, Serialize};

/// Attributes carried by a heading node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    pub level: u8,
}

/// One node of the editor document tree.
///
/// The tag set is the subset of the editor schema this backend produces:
/// paragraphs, level 2/3 headings, and flat bullet/ordered lists whose
/// items each wrap a single paragraph. Serialized internally tagged on
/// `type` with camelCase names to match the editor exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Doc { content: Vec<Node> },
    Paragraph { content: Vec<Node> },
    Heading { attrs: HeadingAttrs, content: Vec<Node> },
    BulletList { content: Vec<Node> },
    OrderedList { content: Vec<Node> },
    ListItem { content: Vec<Node> },
    Text { text: String },
}

impl Node {
    /// A leaf text run.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    /// A paragraph holding a single text run.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph {
            content: vec![Node::text(text)],
        }
    }

    /// A heading holding a single text run.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Node::Heading {
            attrs: HeadingAttrs { level },
            content: vec![Node::text(text)],
        }
    }

    /// A list item wrapping one paragraph, as the editor expects.
    pub fn list_item(text: impl Into<String>) -> Self {
        Node::ListItem {
            content: vec![Node::paragraph(text)],
        }
    }
}
