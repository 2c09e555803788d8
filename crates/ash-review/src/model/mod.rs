//! Data models for review documents.

mod comment;
mod diff;

pub use comment::{Anchor, Comment, CommentRef, FileAnchor, LineAnchor};
pub use diff::{Changeset, Diff, Hunk, Line, Segment, SegmentType};
