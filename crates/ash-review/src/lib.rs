//! # ash-review
//!
//! Review pull-request diffs and their comment threads as plain text.
//!
//! A [`Changeset`] is rendered to a diff-like document in which comments are
//! `#`-prefixed blocks under the lines they belong to. The user edits the
//! document in any text editor, it is parsed back, and [`Review::compare`]
//! turns the two snapshots into [`ReviewChange`]s that can be sent to the
//! service through a [`ChangeApplier`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ash_review::{apply_changes, Review};
//!
//! let original = Review::new(changeset);
//! std::fs::write(&path, original.render())?;
//!
//! // ... the user edits the file ...
//!
//! let edited = Review::parse(&std::fs::read_to_string(&path)?)?;
//! let changes = original.compare(&edited);
//! let report = apply_changes(&applier, &changes).await;
//! ```

pub mod change;
pub mod model;
pub mod parser;
pub mod review;
pub mod traits;
pub mod writer;

// Re-export commonly used types
pub use change::ReviewChange;
pub use model::{
    Anchor, Changeset, Comment, CommentRef, Diff, FileAnchor, Hunk, Line, LineAnchor, Segment,
    SegmentType,
};
pub use parser::{parse_changeset, read_changeset, ErrorKind, ParseError, ReviewParser};
pub use review::Review;
pub use traits::{apply_changes, ApplyError, ApplyReport, ChangeApplier, NoOpApplier};
pub use writer::{render_changeset, write_changeset};
