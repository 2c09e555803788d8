//! Diff data structures representing a changeset under review.

use super::comment::{Comment, CommentRef, FileAnchor, LineAnchor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every entry of one review document: file diffs and synthetic notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    /// Path the changeset was requested for (empty for overview documents).
    pub path: String,
    /// Revision the changes start from.
    pub from_hash: Option<String>,
    /// Revision the changes end at.
    pub to_hash: Option<String>,
    /// Whether whitespace-only changes were ignored when the diff was built.
    pub ignore_whitespace: bool,
    /// Entries in document order.
    pub diffs: Vec<Diff>,
}

impl Changeset {
    /// Create an empty changeset for a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Visit every line of every hunk of every diff, in document order.
    pub fn for_each_line<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a Diff, &'a Hunk, &'a Segment, &'a Line),
    {
        for diff in &self.diffs {
            for hunk in &diff.hunks {
                for segment in &hunk.segments {
                    for line in &segment.lines {
                        visit(diff, hunk, segment, line);
                    }
                }
            }
        }
    }

    /// Visit every comment, replies included, depth-first in document order.
    ///
    /// The callback receives the owning diff, the comment and its parent
    /// (`None` for top-level comments). The order matches the order in which
    /// the writer renders comments.
    pub fn for_each_comment<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a Diff, &'a Comment, Option<&'a Comment>),
    {
        for diff in &self.diffs {
            diff.walk_comments(&mut visit);
        }
    }

    /// Attach comments to lines by the raw ids the API reported per line.
    ///
    /// Ids that are not present in the diff's comment arena are skipped.
    pub fn resolve_comment_ids(&mut self) {
        for diff in &mut self.diffs {
            diff.resolve_comment_ids();
        }
    }

    /// Total number of comments, replies included.
    pub fn comment_count(&self) -> usize {
        self.diffs.iter().map(|d| d.comments.len()).sum()
    }

    /// Entries that describe a real file.
    pub fn file_diffs(&self) -> impl Iterator<Item = &Diff> {
        self.diffs.iter().filter(|d| d.is_file())
    }

    /// File anchor for comments that are not tied to a specific entry.
    ///
    /// Uses the first file diff, falling back to the changeset path.
    pub fn file_anchor(&self) -> Option<FileAnchor> {
        if let Some(anchor) = self.file_diffs().find_map(Diff::file_anchor) {
            return Some(anchor);
        }

        if self.path.is_empty() {
            None
        } else {
            Some(FileAnchor {
                path: self.path.clone(),
                src_path: None,
            })
        }
    }
}

/// One entry of a changeset.
///
/// A real file diff has paths and hunks. An entry without hunks that only
/// carries a note is synthetic (usage banner, activity narration, modeline);
/// one that only carries `file_comments` holds review-level comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Source path, `None` for added files and synthetic entries.
    pub source: Option<String>,
    /// Destination path, `None` for deleted files and synthetic entries.
    pub destination: Option<String>,
    /// Change hunks.
    pub hunks: Vec<Hunk>,
    /// Arena owning every comment of this diff, replies included.
    pub comments: Vec<Comment>,
    /// Top-level comments not attached to a line.
    pub file_comments: Vec<CommentRef>,
    /// Free-form text of a synthetic entry.
    pub note: Option<String>,
}

impl Diff {
    /// Create a file diff.
    pub fn new(source: Option<String>, destination: Option<String>) -> Self {
        Self {
            source,
            destination,
            ..Self::default()
        }
    }

    /// Create a synthetic note entry.
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            note: Some(text.into()),
            ..Self::default()
        }
    }

    /// Whether the entry describes a real file.
    pub fn is_file(&self) -> bool {
        self.source.is_some() || self.destination.is_some()
    }

    /// Whether the entry is a synthetic note.
    pub fn is_note(&self) -> bool {
        self.note.is_some()
    }

    /// Path of the file (destination side, or source side for deletions).
    pub fn path(&self) -> Option<&str> {
        self.destination.as_deref().or(self.source.as_deref())
    }

    /// File anchor for file-level comments of this diff.
    pub fn file_anchor(&self) -> Option<FileAnchor> {
        let path = self.path()?;
        Some(FileAnchor {
            path: path.to_string(),
            src_path: self.source.clone(),
        })
    }

    /// Line anchor for a comment placed under `line` of a segment of `line_type`.
    pub fn line_anchor(&self, line: &Line, line_type: SegmentType) -> LineAnchor {
        LineAnchor {
            line: line.anchor_number(line_type),
            line_type,
            path: self.path().unwrap_or_default().to_string(),
            src_path: self.source.clone(),
            from_hash: None,
            to_hash: None,
        }
    }

    /// Move a comment into the arena and return its handle.
    pub fn add_comment(&mut self, comment: Comment) -> CommentRef {
        self.comments.push(comment);
        CommentRef(self.comments.len() - 1)
    }

    /// Look up a comment by handle.
    pub fn comment(&self, handle: CommentRef) -> &Comment {
        &self.comments[handle.0]
    }

    /// Look up a comment by handle, mutably.
    pub fn comment_mut(&mut self, handle: CommentRef) -> &mut Comment {
        &mut self.comments[handle.0]
    }

    /// Find a saved comment by its server id.
    pub fn find_comment_by_id(&self, id: u64) -> Option<CommentRef> {
        if id == 0 {
            return None;
        }
        self.comments
            .iter()
            .position(|c| c.id == id)
            .map(CommentRef)
    }

    /// Register `reply` as the last reply of `parent`.
    pub fn attach_reply(&mut self, parent: CommentRef, reply: CommentRef) {
        self.comment_mut(parent).replies.push(reply);
    }

    /// All lines of all hunks, mutably.
    pub fn lines_mut(&mut self) -> impl Iterator<Item = &mut Line> {
        self.hunks
            .iter_mut()
            .flat_map(|h| h.segments.iter_mut())
            .flat_map(|s| s.lines.iter_mut())
    }

    fn resolve_comment_ids(&mut self) {
        let by_id: HashMap<u64, CommentRef> = self
            .comments
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_new())
            .map(|(index, c)| (c.id, CommentRef(index)))
            .collect();

        for line in self.lines_mut() {
            for id in &line.comment_ids {
                match by_id.get(id) {
                    Some(handle) if !line.comments.contains(handle) => line.comments.push(*handle),
                    Some(_) => {}
                    None => log::debug!("line references unknown comment {}", id),
                }
            }
        }
    }

    fn walk_comments<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Diff, &'a Comment, Option<&'a Comment>),
    {
        for &handle in &self.file_comments {
            self.walk_thread(handle, None, visit);
        }

        for hunk in &self.hunks {
            for line in hunk.lines() {
                for &handle in &line.comments {
                    self.walk_thread(handle, None, visit);
                }
            }
        }
    }

    fn walk_thread<'a, F>(&'a self, handle: CommentRef, parent: Option<&'a Comment>, visit: &mut F)
    where
        F: FnMut(&'a Diff, &'a Comment, Option<&'a Comment>),
    {
        let comment = self.comment(handle);
        visit(self, comment, parent);
        for &reply in &comment.replies {
            self.walk_thread(reply, Some(comment), visit);
        }
    }
}

/// A contiguous region of changes (hunk).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hunk {
    /// Source file starting line (1-based).
    pub source_line: u32,
    /// Number of source lines covered.
    pub source_span: u32,
    /// Destination file starting line (1-based).
    pub destination_line: u32,
    /// Number of destination lines covered.
    pub destination_span: u32,
    /// Section text following the closing `@@`, usually a function signature.
    pub context: Option<String>,
    /// Runs of same-type lines.
    pub segments: Vec<Segment>,
}

impl Hunk {
    /// Create an empty hunk with the given ranges.
    pub fn new(
        source_line: u32,
        source_span: u32,
        destination_line: u32,
        destination_span: u32,
    ) -> Self {
        Self {
            source_line,
            source_span,
            destination_line,
            destination_span,
            context: None,
            segments: Vec::new(),
        }
    }

    /// Header line, e.g. `@@ -10,5 +10,7 @@ fn example()`.
    pub fn header(&self) -> String {
        let header = format!(
            "@@ -{},{} +{},{} @@",
            self.source_line, self.source_span, self.destination_line, self.destination_span
        );
        match &self.context {
            Some(context) => format!("{} {}", header, context),
            None => header,
        }
    }

    /// All lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.segments.iter().flat_map(|s| s.lines.iter())
    }

    /// Append a line, opening a new segment when the line type changes.
    ///
    /// Line numbers are derived from the hunk start for the first segment and
    /// from the last line of the previous segment afterwards. Context lines
    /// advance both sides, added lines only the destination side and removed
    /// lines only the source side.
    pub fn push_line(&mut self, line_type: SegmentType, text: impl Into<String>) -> &mut Line {
        if self.segments.last().map(|s| s.line_type) != Some(line_type) {
            self.segments.push(Segment::new(line_type));
        }

        let index = self.segments.len() - 1;
        let (source_offset, destination_offset) = match index {
            0 => self.start_offsets(),
            _ => self.segments[index - 1]
                .lines
                .last()
                .map(|l| (l.source, l.destination))
                .unwrap_or_else(|| self.start_offsets()),
        };

        let segment = &mut self.segments[index];
        let position = segment.lines.len() as u32 + 1;
        let (source, destination) = match line_type {
            SegmentType::Context => (
                source_offset.saturating_add(position),
                destination_offset.saturating_add(position),
            ),
            SegmentType::Added => (source_offset, destination_offset.saturating_add(position)),
            SegmentType::Removed => (source_offset.saturating_add(position), destination_offset),
        };

        segment.lines.push(Line {
            source,
            destination,
            text: text.into(),
            comment_ids: Vec::new(),
            comments: Vec::new(),
        });
        let last = segment.lines.len() - 1;
        &mut segment.lines[last]
    }

    /// Whether every line announced by the header has been seen.
    pub fn is_complete(&self) -> bool {
        let (mut source, mut destination) = (0u32, 0u32);
        for segment in &self.segments {
            let count = segment.lines.len() as u32;
            match segment.line_type {
                SegmentType::Context => {
                    source += count;
                    destination += count;
                }
                SegmentType::Added => destination += count,
                SegmentType::Removed => source += count,
            }
        }
        source >= self.source_span && destination >= self.destination_span
    }

    fn start_offsets(&self) -> (u32, u32) {
        (
            self.source_line.saturating_sub(1),
            self.destination_line.saturating_sub(1),
        )
    }
}

/// A run of lines sharing one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Type of every line in the run.
    pub line_type: SegmentType,
    /// Lines in order.
    pub lines: Vec<Line>,
}

impl Segment {
    /// Create an empty segment.
    pub fn new(line_type: SegmentType) -> Self {
        Self {
            line_type,
            lines: Vec::new(),
        }
    }
}

/// Line type in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentType {
    /// Unchanged line.
    Context,
    /// Added line (+).
    Added,
    /// Removed line (-).
    Removed,
}

impl SegmentType {
    /// Get the prefix character for this line type.
    pub fn prefix(&self) -> char {
        match self {
            SegmentType::Context => ' ',
            SegmentType::Added => '+',
            SegmentType::Removed => '-',
        }
    }

    /// Line type for a prefix character.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            ' ' => Some(SegmentType::Context),
            '+' => Some(SegmentType::Added),
            '-' => Some(SegmentType::Removed),
            _ => None,
        }
    }

    /// Wire name used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Context => "CONTEXT",
            SegmentType::Added => "ADDED",
            SegmentType::Removed => "REMOVED",
        }
    }
}

/// A single line in the diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// Line number on the source side.
    pub source: u32,
    /// Line number on the destination side.
    pub destination: u32,
    /// Line content (without the type prefix).
    pub text: String,
    /// Raw comment ids reported by the API for this line.
    pub comment_ids: Vec<u64>,
    /// Top-level comments attached to this line.
    pub comments: Vec<CommentRef>,
}

impl Line {
    /// Number used to anchor comments on a line of the given type.
    pub fn anchor_number(&self, line_type: SegmentType) -> u32 {
        match line_type {
            SegmentType::Added => self.destination,
            SegmentType::Context | SegmentType::Removed => self.source,
        }
    }
}
