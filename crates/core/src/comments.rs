//! Comment threading.

use std::collections::HashMap;

use media_types::Comment;
use serde::Serialize;
use uuid::Uuid;

/// A comment with its direct replies attached.
#[derive(Debug, Clone, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

/// Threads flat comment rows into a reply forest.
///
/// Input is expected sorted by `created_at` ascending; roots and replies
/// both keep that order. A reply whose parent is missing (deleted, or
/// filtered out upstream) is dropped.
pub fn thread_comments(comments: Vec<Comment>) -> Vec<CommentNode> {
    let mut by_parent: HashMap<Option<Uuid>, Vec<Comment>> = HashMap::new();
    for comment in comments {
        by_parent.entry(comment.parent_id).or_default().push(comment);
    }
    attach(&mut by_parent, None)
}

fn attach(
    by_parent: &mut HashMap<Option<Uuid>, Vec<Comment>>,
    parent: Option<Uuid>,
) -> Vec<CommentNode> {
    by_parent
        .remove(&parent)
        .unwrap_or_default()
        .into_iter()
        .map(|comment| {
            let id = comment.id;
            CommentNode {
                replies: attach(by_parent, Some(id)),
                comment,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: u128, parent: Option<u128>, content: &str) -> Comment {
        let now = Utc::now();
        Comment {
            id: Uuid::from_u128(id),
            article_id: Uuid::from_u128(1000),
            user_id: Uuid::from_u128(2000),
            parent_id: parent.map(Uuid::from_u128),
            content: content.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn replies_nest_under_their_parent() {
        let threaded = thread_comments(vec![
            comment(1, None, "first"),
            comment(2, None, "second"),
            comment(3, Some(1), "reply to first"),
            comment(4, Some(3), "reply to reply"),
        ]);
        assert_eq!(threaded.len(), 2);
        assert_eq!(threaded[0].comment.content, "first");
        assert_eq!(threaded[0].replies.len(), 1);
        assert_eq!(threaded[0].replies[0].replies[0].comment.content, "reply to reply");
        assert!(threaded[1].replies.is_empty());
    }

    #[test]
    fn reply_order_follows_input_order() {
        let threaded = thread_comments(vec![
            comment(1, None, "root"),
            comment(2, Some(1), "older"),
            comment(3, Some(1), "newer"),
        ]);
        let replies: Vec<&str> = threaded[0]
            .replies
            .iter()
            .map(|r| r.comment.content.as_str())
            .collect();
        assert_eq!(replies, ["older", "newer"]);
    }

    #[test]
    fn replies_to_missing_parents_are_dropped() {
        let threaded = thread_comments(vec![
            comment(1, None, "root"),
            comment(2, Some(99), "orphan"),
        ]);
        assert_eq!(threaded.len(), 1);
        assert!(threaded[0].replies.is_empty());
    }

    #[test]
    fn empty_input_threads_to_nothing() {
        assert!(thread_comments(Vec::new()).is_empty());
    }
}
