//! Category tree assembly.

use std::collections::HashMap;
use std::sync::LazyLock;

use media_types::Category;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

static ASCII_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// A category with its children attached.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// Builds the category forest from rows already sorted by their `order`
/// column.
///
/// Roots are rows without a parent; children attach under their parent in
/// input order. A row pointing at a parent that is not in the input is
/// dropped.
pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    let mut by_parent: HashMap<Option<Uuid>, Vec<Category>> = HashMap::new();
    for category in categories {
        by_parent.entry(category.parent_id).or_default().push(category);
    }
    attach(&mut by_parent, None)
}

fn attach(
    by_parent: &mut HashMap<Option<Uuid>, Vec<Category>>,
    parent: Option<Uuid>,
) -> Vec<CategoryNode> {
    by_parent
        .remove(&parent)
        .unwrap_or_default()
        .into_iter()
        .map(|category| {
            let id = category.id;
            CategoryNode {
                children: attach(by_parent, Some(id)),
                category,
            }
        })
        .collect()
}

/// Root categories with ASCII slugs, capped at `limit`.
///
/// Legacy rows carry non-ASCII slugs; the public pages only link the ASCII
/// ones.
pub fn ascii_roots(categories: &[Category], limit: usize) -> Vec<&Category> {
    categories
        .iter()
        .filter(|c| c.parent_id.is_none())
        .filter(|c| ASCII_SLUG_RE.is_match(&c.slug))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: u128, slug: &str, parent: Option<u128>, order: i32) -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::from_u128(id),
            name: slug.to_owned(),
            slug: slug.to_owned(),
            description: None,
            parent_id: parent.map(Uuid::from_u128),
            order,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn roots_keep_input_order() {
        let tree = build_tree(vec![
            category(1, "gadget", None, 0),
            category(2, "technology", None, 1),
            category(3, "lifestyle", None, 2),
        ]);
        let slugs: Vec<&str> = tree.iter().map(|n| n.category.slug.as_str()).collect();
        assert_eq!(slugs, ["gadget", "technology", "lifestyle"]);
        assert!(tree.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn children_attach_under_their_parent() {
        let tree = build_tree(vec![
            category(1, "gadget", None, 0),
            category(2, "phones", Some(1), 0),
            category(3, "laptops", Some(1), 1),
            category(4, "keyboards", Some(3), 0),
        ]);
        assert_eq!(tree.len(), 1);
        let gadget = &tree[0];
        assert_eq!(gadget.children.len(), 2);
        assert_eq!(gadget.children[0].category.slug, "phones");
        assert_eq!(gadget.children[1].category.slug, "laptops");
        assert_eq!(gadget.children[1].children[0].category.slug, "keyboards");
    }

    #[test]
    fn orphaned_children_are_dropped() {
        let tree = build_tree(vec![
            category(1, "gadget", None, 0),
            category(2, "stray", Some(99), 0),
        ]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].category.slug, "gadget");
    }

    #[test]
    fn ascii_roots_filters_non_ascii_slugs_and_non_roots() {
        let rows = vec![
            category(1, "gadget", None, 0),
            category(2, "ガジェット", None, 1),
            category(3, "phones", Some(1), 0),
            category(4, "creative", None, 2),
        ];
        let roots = ascii_roots(&rows, 8);
        let slugs: Vec<&str> = roots.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, ["gadget", "creative"]);
    }

    #[test]
    fn ascii_roots_respects_the_limit() {
        let rows: Vec<Category> = (0..12)
            .map(|i| category(i as u128 + 1, "cat", None, i))
            .collect();
        assert_eq!(ascii_roots(&rows, 8).len(), 8);
    }
}
