//! Comment-related data structures for reviews.

use super::SegmentType;
use chrono::{DateTime, Utc};

/// Handle of a comment inside the comment arena of its [`Diff`](super::Diff).
///
/// Lines and parent comments store handles, never copies, so the arena is the
/// single owner of every comment of a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentRef(pub(crate) usize);

impl CommentRef {
    /// Position of the comment in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A review comment or a reply to one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    /// Server-side identifier. Zero means the comment has not been saved yet.
    pub id: u64,
    /// Server-side version, required to edit or delete the comment.
    pub version: u32,
    /// Comment body.
    pub text: String,
    /// Author display name.
    pub author: String,
    /// When the comment was last updated.
    pub updated: Option<DateTime<Utc>>,
    /// Where the comment is attached.
    pub anchor: Anchor,
    /// Replies, in thread order.
    pub replies: Vec<CommentRef>,
}

impl Comment {
    /// Create a new, unsaved comment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Create a comment that already exists on the server.
    pub fn saved(id: u64, version: u32, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            version,
            text: text.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Set the update timestamp.
    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = Some(updated);
        self
    }

    /// Set the anchor.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Whether this comment still has to be created on the server.
    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

/// Where a comment is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Attached to one line of a file diff.
    Line(LineAnchor),
    /// Attached to a whole file.
    File(FileAnchor),
    /// Attached to the review itself (overview comments).
    #[default]
    Review,
}

impl Anchor {
    /// The line anchor, if the comment is attached to a line.
    pub fn as_line(&self) -> Option<&LineAnchor> {
        match self {
            Anchor::Line(anchor) => Some(anchor),
            _ => None,
        }
    }

    /// The file anchor, if the comment is attached to a file.
    pub fn as_file(&self) -> Option<&FileAnchor> {
        match self {
            Anchor::File(anchor) => Some(anchor),
            _ => None,
        }
    }
}

/// Line position of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAnchor {
    /// Line number: source side for context and removed lines, destination
    /// side for added lines.
    pub line: u32,
    /// Type of the segment holding the line.
    pub line_type: SegmentType,
    /// File path (destination side, or source side for deleted files).
    pub path: String,
    /// Source path when the file existed before the change.
    pub src_path: Option<String>,
    /// Revision the diff starts from.
    pub from_hash: Option<String>,
    /// Revision the diff ends at.
    pub to_hash: Option<String>,
}

impl LineAnchor {
    /// Create a line anchor without path information.
    pub fn new(line: u32, line_type: SegmentType) -> Self {
        Self {
            line,
            line_type,
            path: String::new(),
            src_path: None,
            from_hash: None,
            to_hash: None,
        }
    }
}

/// File position of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnchor {
    /// File path (destination side, or source side for deleted files).
    pub path: String,
    /// Source path when the file existed before the change.
    pub src_path: Option<String>,
}
