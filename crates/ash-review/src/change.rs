//! Semantic changes between two snapshots of a review.

use crate::model::{Anchor, Comment};
use serde_json::{json, Map, Value};
use std::fmt;

/// One change found by [`Review::compare`](crate::Review::compare).
///
/// Every variant owns a snapshot of the comments involved, so changes outlive
/// the reviews they were computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewChange {
    /// New comment under a diff line.
    LineCommentAdded(Comment),
    /// New comment on a whole file.
    FileCommentAdded(Comment),
    /// New comment on the review itself.
    ReviewCommentAdded(Comment),
    /// New reply to an existing comment.
    ReplyAdded { comment: Comment, parent: Comment },
    /// Existing comment with edited text. Carries the new text and the
    /// version of the original.
    CommentModified(Comment),
    /// Existing comment that disappeared from the document.
    CommentRemoved(Comment),
}

impl ReviewChange {
    /// The comment this change is about.
    pub fn comment(&self) -> &Comment {
        match self {
            ReviewChange::LineCommentAdded(comment)
            | ReviewChange::FileCommentAdded(comment)
            | ReviewChange::ReviewCommentAdded(comment)
            | ReviewChange::CommentModified(comment)
            | ReviewChange::CommentRemoved(comment) => comment,
            ReviewChange::ReplyAdded { comment, .. } => comment,
        }
    }

    /// Wire name of the change kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewChange::LineCommentAdded(_) => "LINE_COMMENT_ADDED",
            ReviewChange::FileCommentAdded(_) => "FILE_COMMENT_ADDED",
            ReviewChange::ReviewCommentAdded(_) => "REVIEW_COMMENT_ADDED",
            ReviewChange::ReplyAdded { .. } => "REPLY_ADDED",
            ReviewChange::CommentModified(_) => "COMMENT_MODIFIED",
            ReviewChange::CommentRemoved(_) => "COMMENT_REMOVED",
        }
    }

    /// Request body for the comments API.
    pub fn payload(&self) -> Value {
        match self {
            ReviewChange::LineCommentAdded(comment) => {
                let mut anchor = Map::new();
                if let Anchor::Line(line) = &comment.anchor {
                    anchor.insert("line".into(), json!(line.line));
                    anchor.insert("lineType".into(), json!(line.line_type));
                    anchor.insert("path".into(), json!(line.path));
                    insert_some(&mut anchor, "srcPath", &line.src_path);
                    insert_some(&mut anchor, "fromHash", &line.from_hash);
                    insert_some(&mut anchor, "toHash", &line.to_hash);
                }
                json!({ "text": comment.text, "anchor": anchor })
            }
            ReviewChange::FileCommentAdded(comment) => {
                let mut anchor = Map::new();
                if let Anchor::File(file) = &comment.anchor {
                    anchor.insert("path".into(), json!(file.path));
                    insert_some(&mut anchor, "srcPath", &file.src_path);
                }
                json!({ "text": comment.text, "anchor": anchor })
            }
            ReviewChange::ReviewCommentAdded(comment) => json!({ "text": comment.text }),
            ReviewChange::ReplyAdded { comment, parent } => json!({
                "text": comment.text,
                "parent": { "id": parent.id },
            }),
            ReviewChange::CommentModified(comment) => json!({
                "text": comment.text,
                "id": comment.id,
                "version": comment.version,
            }),
            ReviewChange::CommentRemoved(comment) => json!({
                "id": comment.id,
                "version": comment.version,
            }),
        }
    }
}

fn insert_some(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), json!(value));
    }
}

impl fmt::Display for ReviewChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewChange::LineCommentAdded(comment) => match comment.anchor.as_line() {
                Some(anchor) => write!(
                    f,
                    "add comment on {}:{} ({}): {}",
                    anchor.path,
                    anchor.line,
                    anchor.line_type.as_str(),
                    summary(&comment.text)
                ),
                None => write!(f, "add line comment: {}", summary(&comment.text)),
            },
            ReviewChange::FileCommentAdded(comment) => match comment.anchor.as_file() {
                Some(anchor) => write!(
                    f,
                    "add comment on {}: {}",
                    anchor.path,
                    summary(&comment.text)
                ),
                None => write!(f, "add file comment: {}", summary(&comment.text)),
            },
            ReviewChange::ReviewCommentAdded(comment) => {
                write!(f, "add review comment: {}", summary(&comment.text))
            }
            ReviewChange::ReplyAdded { comment, parent } => write!(
                f,
                "reply to [{}] {}: {}",
                parent.id,
                parent.author,
                summary(&comment.text)
            ),
            ReviewChange::CommentModified(comment) => {
                write!(f, "edit [{}]: {}", comment.id, summary(&comment.text))
            }
            ReviewChange::CommentRemoved(comment) => {
                write!(f, "remove [{}]: {}", comment.id, summary(&comment.text))
            }
        }
    }
}

/// First line of a comment, shortened for one-line display.
fn summary(text: &str) -> String {
    const MAX_CHARS: usize = 60;

    let first = text.lines().next().unwrap_or_default();
    let more = text.lines().nth(1).is_some();
    if first.chars().count() > MAX_CHARS {
        let short: String = first.chars().take(MAX_CHARS).collect();
        format!("{}...", short)
    } else if more {
        format!("{}...", first)
    } else {
        first.to_string()
    }
}
