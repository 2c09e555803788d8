//! Line-by-line state machine reading the review text format.

use super::{parse_timestamp, ParseError};
use crate::model::{Anchor, Changeset, Comment, CommentRef, Diff, Hunk, LineAnchor, SegmentType};
use crate::writer::{NOTE_PREFIX, NULL_PATH};
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn from_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^--- (.+?)(?:\t(.*))?$").unwrap())
}

fn to_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+\+\+ (.+?)(?:\t(.*))?$").unwrap())
}

fn hunk_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@ ?(.*)$").unwrap())
}

fn comment_delim_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\s+---").unwrap())
}

fn comment_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#(\s+)\[(\d+)\]\s+\|([^|]+)\|(.*)$").unwrap())
}

fn comment_text_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#(\s*)(.*)$").unwrap())
}

/// Parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    StartOfFile,
    DiffHeader,
    HunkHeader,
    HunkBody,
    Comment,
    CommentDelim,
    CommentHeader,
}

/// Result of a finished parse.
#[derive(Debug)]
pub struct ParsedReview {
    pub changeset: Changeset,
    /// Non-fatal problems that were replaced by defaults.
    pub diagnostics: Vec<ParseError>,
}

/// Comment block currently receiving text lines.
#[derive(Debug, Clone, Copy)]
struct OpenComment {
    diff: usize,
    handle: CommentRef,
    indent: usize,
}

/// Incremental parser for review documents.
///
/// Feed it one line at a time with [`feed`](Self::feed), then call
/// [`finish`](Self::finish). Every node is appended to the end of the
/// changeset under construction, so the node being built is always the last
/// one of its kind.
#[derive(Debug)]
pub struct ReviewParser {
    state: State,
    line_number: usize,
    strict: bool,
    changeset: Changeset,
    /// The last diff is a file section whose hunks are being read.
    in_file: bool,
    /// Index of the synthetic diff collecting comments outside file sections.
    loose: Option<usize>,
    /// A body line of the last hunk is current.
    has_line: bool,
    comment: Option<OpenComment>,
    /// Comments registered under the current line, innermost last, with
    /// their indentation.
    thread: Vec<(usize, CommentRef)>,
    diagnostics: Vec<ParseError>,
}

impl Default for ReviewParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewParser {
    pub fn new() -> Self {
        Self {
            state: State::StartOfFile,
            line_number: 0,
            strict: false,
            changeset: Changeset::default(),
            in_file: false,
            loose: None,
            has_line: false,
            comment: None,
            thread: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Abort on malformed numeric fields instead of defaulting them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Consume one line (a trailing newline is ignored).
    pub fn feed(&mut self, line: &str) -> Result<(), ParseError> {
        self.line_number += 1;
        let line = line.trim_end_matches(['\n', '\r']);

        if line.starts_with(NOTE_PREFIX) {
            self.close_section();
            return Ok(());
        }

        match self.state {
            State::StartOfFile => self.feed_outside_file(line),
            State::DiffHeader if line.starts_with('@') => self.start_hunk(line),
            State::DiffHeader => self.parse_diff_header(line),
            State::HunkHeader
            | State::HunkBody
            | State::Comment
            | State::CommentDelim
            | State::CommentHeader => {
                if self.in_file {
                    self.feed_body(line)
                } else {
                    self.feed_outside_file(line)
                }
            }
        }
    }

    /// Finish parsing: normalize comment texts and return the changeset.
    pub fn finish(mut self) -> ParsedReview {
        for diff in &mut self.changeset.diffs {
            for comment in &mut diff.comments {
                comment.text = comment.text.trim().to_string();
            }
        }

        if self.changeset.path.is_empty() {
            let path = self.changeset.file_diffs().find_map(Diff::path).map(str::to_string);
            if let Some(path) = path {
                self.changeset.path = path;
            }
        }

        ParsedReview {
            changeset: self.changeset,
            diagnostics: self.diagnostics,
        }
    }

    fn feed_outside_file(&mut self, line: &str) -> Result<(), ParseError> {
        match line.chars().next() {
            Some('-') => self.start_diff(line),
            Some('#') => self.feed_comment(line),
            _ => Ok(()),
        }
    }

    fn feed_body(&mut self, line: &str) -> Result<(), ParseError> {
        let Some(first) = line.chars().next() else {
            return Ok(());
        };

        match first {
            '#' => self.feed_comment(line),
            '@' => self.start_hunk(line),
            _ => match SegmentType::from_prefix(first) {
                Some(SegmentType::Removed)
                    if line.starts_with("--- ") && self.current_hunk_complete() =>
                {
                    self.start_diff(line)
                }
                Some(line_type) => {
                    self.push_body_line(line_type, &line[1..]);
                    Ok(())
                }
                None => Ok(()),
            },
        }
    }

    fn close_section(&mut self) {
        self.state = State::StartOfFile;
        self.in_file = false;
        self.loose = None;
        self.reset_line();
    }

    fn reset_line(&mut self) {
        self.has_line = false;
        self.comment = None;
        self.thread.clear();
    }

    fn start_diff(&mut self, line: &str) -> Result<(), ParseError> {
        // Comments written right above a file header belong to that file.
        let reuse = self
            .loose
            .is_some_and(|index| index + 1 == self.changeset.diffs.len());
        if !reuse {
            self.changeset.diffs.push(Diff::default());
        }

        self.loose = None;
        self.in_file = true;
        self.reset_line();
        self.state = State::DiffHeader;
        self.parse_diff_header(line)
    }

    fn parse_diff_header(&mut self, line: &str) -> Result<(), ParseError> {
        if let Some(captures) = from_file_regex().captures(line) {
            let hash = header_hash(&captures);
            if self.changeset.from_hash.is_none() {
                self.changeset.from_hash = hash;
            }
            if let Some(diff) = self.changeset.diffs.last_mut() {
                diff.source = header_path(&captures[1]);
            }
            return Ok(());
        }

        if let Some(captures) = to_file_regex().captures(line) {
            let hash = header_hash(&captures);
            if self.changeset.to_hash.is_none() {
                self.changeset.to_hash = hash;
            }
            if let Some(diff) = self.changeset.diffs.last_mut() {
                diff.destination = header_path(&captures[1]);
            }
            return Ok(());
        }

        Err(ParseError::ExpectedDiffHeader {
            line: self.line_number,
            found: line.to_string(),
        })
    }

    fn start_hunk(&mut self, line: &str) -> Result<(), ParseError> {
        if !self.in_file {
            return Ok(());
        }

        let hunk = self.parse_hunk_header(line)?;
        if let Some(diff) = self.changeset.diffs.last_mut() {
            diff.hunks.push(hunk);
        }
        self.reset_line();
        self.state = State::HunkHeader;
        Ok(())
    }

    fn parse_hunk_header(&mut self, line: &str) -> Result<Hunk, ParseError> {
        let Some(captures) = hunk_regex().captures(line) else {
            self.malformed("hunk header", line)?;
            return Ok(Hunk::default());
        };

        let mut hunk = Hunk::new(
            self.number(&captures, 1, "hunk source start")?,
            self.span(&captures, 2, "hunk source length")?,
            self.number(&captures, 3, "hunk destination start")?,
            self.span(&captures, 4, "hunk destination length")?,
        );
        hunk.context = captures
            .get(5)
            .map(|m| m.as_str().trim())
            .filter(|context| !context.is_empty())
            .map(str::to_string);
        Ok(hunk)
    }

    fn number(&mut self, captures: &Captures, group: usize, field: &'static str) -> Result<u32, ParseError> {
        let value = captures.get(group).map_or("", |m| m.as_str());
        match value.parse() {
            Ok(number) => Ok(number),
            Err(_) => {
                self.malformed(field, value)?;
                Ok(0)
            }
        }
    }

    /// Hunk lengths may be omitted, meaning one line.
    fn span(&mut self, captures: &Captures, group: usize, field: &'static str) -> Result<u32, ParseError> {
        match captures.get(group) {
            Some(_) => self.number(captures, group, field),
            None => Ok(1),
        }
    }

    fn push_body_line(&mut self, line_type: SegmentType, text: &str) {
        let Some(hunk) = self
            .changeset
            .diffs
            .last_mut()
            .and_then(|diff| diff.hunks.last_mut())
        else {
            return;
        };

        hunk.push_line(line_type, text);
        self.reset_line();
        self.has_line = true;
        self.state = State::HunkBody;
    }

    fn current_hunk_complete(&self) -> bool {
        self.changeset
            .diffs
            .last()
            .and_then(|diff| diff.hunks.last())
            .map_or(true, Hunk::is_complete)
    }

    fn feed_comment(&mut self, line: &str) -> Result<(), ParseError> {
        if comment_delim_regex().is_match(line) {
            self.state = State::CommentDelim;
            self.comment = None;
            return Ok(());
        }

        if let Some(captures) = comment_header_regex().captures(line) {
            self.state = State::CommentHeader;
            return self.start_saved_comment(&captures);
        }

        if let Some(captures) = comment_text_regex().captures(line) {
            self.state = State::Comment;
            let indent = captures[1].chars().count();
            let blank = captures[2].trim().is_empty();

            let open = match self.comment {
                Some(open) => open,
                None if blank => return Ok(()),
                None => {
                    let open = self.register(Comment::default(), indent);
                    self.comment = Some(open);
                    open
                }
            };
            self.append_text(open, &line[1..]);
        }

        Ok(())
    }

    fn start_saved_comment(&mut self, captures: &Captures) -> Result<(), ParseError> {
        let indent = captures[1].chars().count();

        let id = match captures[2].parse::<u64>() {
            Ok(id) => id,
            Err(_) => {
                self.malformed("comment id", &captures[2])?;
                0
            }
        };

        let timestamp = captures[4].trim();
        let updated = if timestamp.is_empty() {
            None
        } else {
            let parsed = parse_timestamp(timestamp);
            if parsed.is_none() {
                self.malformed("comment timestamp", timestamp)?;
            }
            parsed
        };

        let comment = Comment {
            id,
            author: captures[3].trim().to_string(),
            updated,
            ..Comment::default()
        };
        self.comment = Some(self.register(comment, indent));
        Ok(())
    }

    /// Place a comment into the tree and the diff's arena.
    ///
    /// The parent is the nearest comment above with a smaller indentation;
    /// without one the comment attaches to the current line, or to the file
    /// when no line is current.
    fn register(&mut self, mut comment: Comment, indent: usize) -> OpenComment {
        let diff_index = if self.in_file {
            self.changeset.diffs.len() - 1
        } else {
            self.loose_diff()
        };

        comment.anchor = self.current_anchor(diff_index);

        while self.thread.last().is_some_and(|(depth, _)| *depth >= indent) {
            self.thread.pop();
        }
        let parent = self.thread.last().map(|(_, handle)| *handle);
        let on_line = self.in_file && self.has_line;

        let diff = &mut self.changeset.diffs[diff_index];
        let handle = diff.add_comment(comment);
        match parent {
            Some(parent) => diff.attach_reply(parent, handle),
            None if on_line => {
                if let Some(line) = diff
                    .hunks
                    .last_mut()
                    .and_then(|hunk| hunk.segments.last_mut())
                    .and_then(|segment| segment.lines.last_mut())
                {
                    line.comments.push(handle);
                }
            }
            None => diff.file_comments.push(handle),
        }

        self.thread.push((indent, handle));
        OpenComment {
            diff: diff_index,
            handle,
            indent,
        }
    }

    fn current_anchor(&self, diff_index: usize) -> Anchor {
        if !(self.in_file && self.has_line) {
            return Anchor::Review;
        }

        let diff = &self.changeset.diffs[diff_index];
        let current = diff
            .hunks
            .last()
            .and_then(|hunk| hunk.segments.last())
            .and_then(|segment| segment.lines.last().map(|line| (segment.line_type, line)));

        match current {
            Some((line_type, line)) => Anchor::Line(LineAnchor {
                from_hash: self.changeset.from_hash.clone(),
                to_hash: self.changeset.to_hash.clone(),
                ..diff.line_anchor(line, line_type)
            }),
            None => Anchor::Review,
        }
    }

    fn loose_diff(&mut self) -> usize {
        match self.loose {
            Some(index) => index,
            None => {
                self.changeset.diffs.push(Diff::default());
                let index = self.changeset.diffs.len() - 1;
                self.loose = Some(index);
                index
            }
        }
    }

    fn append_text(&mut self, open: OpenComment, raw: &str) {
        let piece = strip_indent(raw, open.indent).trim_end();
        let comment = self.changeset.diffs[open.diff].comment_mut(open.handle);

        if comment.text.is_empty() {
            comment.text.push_str(piece);
        } else {
            comment.text.push('\n');
            comment.text.push_str(piece);
        }
    }

    fn malformed(&mut self, field: &'static str, value: &str) -> Result<(), ParseError> {
        let error = ParseError::MalformedField {
            line: self.line_number,
            field,
            value: value.to_string(),
        };

        if self.strict {
            return Err(error);
        }

        log::warn!("{}", error);
        self.diagnostics.push(error);
        Ok(())
    }
}

fn header_path(path: &str) -> Option<String> {
    let path = path.trim();
    match path {
        "" | NULL_PATH => None,
        _ => Some(path.to_string()),
    }
}

fn header_hash(captures: &Captures) -> Option<String> {
    captures
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|hash| !hash.is_empty())
        .map(str::to_string)
}

/// Drop up to `indent` leading whitespace characters.
fn strip_indent(text: &str, indent: usize) -> &str {
    let mut rest = text;
    for _ in 0..indent {
        match rest.chars().next() {
            Some(c) if c.is_whitespace() => rest = &rest[c.len_utf8()..],
            _ => break,
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_changeset, ErrorKind};
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Changeset {
        parse_changeset(text).unwrap()
    }

    fn comments(changeset: &Changeset) -> Vec<(u64, Option<u64>, String, Anchor)> {
        let mut result = Vec::new();
        changeset.for_each_comment(|_, comment, parent| {
            result.push((
                comment.id,
                parent.map(|p| p.id),
                comment.text.clone(),
                comment.anchor.clone(),
            ));
        });
        result
    }

    fn line_anchor(line: u32, line_type: SegmentType, path: &str) -> Anchor {
        Anchor::Line(LineAnchor {
            path: path.to_string(),
            src_path: Some(path.to_string()),
            ..LineAnchor::new(line, line_type)
        })
    }

    const SEGMENTS: &str = "\
--- src/lib.rs
+++ src/lib.rs
@@ -10,3 +10,4 @@ fn example()
 first
-second
+second, changed
+inserted
 third
";

    #[test]
    fn test_segment_boundaries_and_numbers() {
        let changeset = parse(SEGMENTS);
        assert_eq!(changeset.path, "src/lib.rs");
        assert_eq!(changeset.diffs.len(), 1);

        let hunk = &changeset.diffs[0].hunks[0];
        assert_eq!(hunk.context.as_deref(), Some("fn example()"));

        let layout: Vec<(SegmentType, usize)> = hunk
            .segments
            .iter()
            .map(|s| (s.line_type, s.lines.len()))
            .collect();
        assert_eq!(
            layout,
            vec![
                (SegmentType::Context, 1),
                (SegmentType::Removed, 1),
                (SegmentType::Added, 2),
                (SegmentType::Context, 1),
            ]
        );

        let removed = &hunk.segments[1].lines[0];
        assert_eq!((removed.source, removed.text.as_str()), (11, "second"));

        let added: Vec<u32> = hunk.segments[2].lines.iter().map(|l| l.destination).collect();
        assert_eq!(added, vec![11, 12]);

        let last = &hunk.segments[3].lines[0];
        assert_eq!((last.source, last.destination), (12, 13));
    }

    #[test]
    fn test_new_comment_anchors() {
        let cases = [
            (
                "--- a\n+++ a\n@@ -1,2 +1,3 @@\n 1\n+2\n+3\n# hello\n 4\n",
                3,
                SegmentType::Added,
            ),
            (
                "--- a\n+++ a\n@@ -1,4 +1,2 @@\n 1\n-2\n-3\n# hello\n 4\n",
                3,
                SegmentType::Removed,
            ),
            (
                "--- a\n+++ a\n@@ -1,3 +1,4 @@\n 1\n+2\n 3\n 4\n# hello\n",
                3,
                SegmentType::Context,
            ),
            (
                "--- a\n+++ a\n@@ -1,5 +1,5 @@\n 1\n+2\n-3\n 4\n 5\n 6\n# hello\n",
                5,
                SegmentType::Context,
            ),
        ];

        for (text, line, line_type) in cases {
            let changeset = parse(text);
            let comment = &changeset.diffs[0].comments[0];
            assert!(comment.is_new());
            assert_eq!(comment.text, "hello");
            assert_eq!(comment.anchor, line_anchor(line, line_type, "a"), "{}", text);
        }
    }

    const THREAD: &str = "\
--- a.txt\tabc123
+++ a.txt\tdef456
@@ -1,2 +1,2 @@
 one
# ---
#
# [1234] | John Doe | Mon Jan  2 15:04:05 2006
#
# first line
#
# second paragraph
#
# ---
#
#     [1235] | Jane Roe | Mon Jan  2 16:04:05 2006
#
#     reply
#         indented code
#
#     ---
# [1236] | John Doe |
#
# sibling
#
# ---
-two
+three
";

    #[test]
    fn test_saved_thread_nesting() {
        let changeset = parse(THREAD);
        assert_eq!(changeset.from_hash.as_deref(), Some("abc123"));
        assert_eq!(changeset.to_hash.as_deref(), Some("def456"));

        let found: Vec<(u64, Option<u64>, String)> = comments(&changeset)
            .into_iter()
            .map(|(id, parent, text, _)| (id, parent, text))
            .collect();
        assert_eq!(
            found,
            vec![
                (1234, None, "first line\n\nsecond paragraph".to_string()),
                (1235, Some(1234), "reply\n    indented code".to_string()),
                (1236, None, "sibling".to_string()),
            ]
        );

        let diff = &changeset.diffs[0];
        assert_eq!(diff.comments.len(), 3);
        let first = &diff.comments[0];
        assert_eq!(first.author, "John Doe");
        assert!(first.updated.is_some());
        assert_eq!(diff.comments[2].updated, None);

        let anchor = first.anchor.as_line().unwrap();
        assert_eq!((anchor.line, anchor.line_type), (1, SegmentType::Context));
        assert_eq!(anchor.from_hash.as_deref(), Some("abc123"));
        assert_eq!(diff.comments[1].anchor, first.anchor);

        // the thread does not swallow the following diff lines
        let hunk = &diff.hunks[0];
        assert_eq!(hunk.segments.len(), 3);
        assert_eq!(hunk.segments[2].lines[0].text, "three");
    }

    #[test]
    fn test_header_less_reply_finds_enclosing_comment() {
        let text = "\
--- a\n+++ a\n@@ -1,1 +1,1 @@\n one
# ---
# [1234] | John | Mon Jan  2 15:04:05 2006
#
# bla
#
# ---
#     [1235] | Jane | Mon Jan  2 15:04:05 2006
#
#     deeper
#
#     ---
#     new reply
";
        let found: Vec<(u64, Option<u64>, String)> = comments(&parse(text))
            .into_iter()
            .map(|(id, parent, text, _)| (id, parent, text))
            .collect();
        assert_eq!(
            found,
            vec![
                (1234, None, "bla".to_string()),
                (1235, Some(1234), "deeper".to_string()),
                (0, Some(1234), "new reply".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_outside_file_sections() {
        let text = "\
### Oh, hello there!
###
# a review comment

### section break
# ---
# [17] | Ann | Mon Jan  2 15:04:05 2006
#
# about this file
#
# ---
--- a.rs
+++ a.rs
@@ -1,1 +1,1 @@
 x
### trailer
# after the trailer
";
        let changeset = parse(text);
        assert_eq!(changeset.diffs.len(), 3);

        let review_level = &changeset.diffs[0];
        assert!(!review_level.is_file());
        assert_eq!(review_level.comments[0].text, "a review comment");
        assert_eq!(review_level.comments[0].anchor, Anchor::Review);

        let file = &changeset.diffs[1];
        assert_eq!(file.path(), Some("a.rs"));
        assert_eq!(file.file_comments.len(), 1);
        assert_eq!(file.comment(file.file_comments[0]).id, 17);

        let trailing = &changeset.diffs[2];
        assert_eq!(trailing.comments[0].text, "after the trailer");
        assert_eq!(trailing.comments[0].anchor, Anchor::Review);
    }

    #[test]
    fn test_multiple_files_without_separator() {
        let text = "\
--- a.sql
+++ a.sql
@@ -1,2 +1,1 @@
--- dropped comment
 kept
--- b.sql
+++ b.sql
@@ -3,1 +3,2 @@
 x
+y
";
        let changeset = parse(text);
        let paths: Vec<Option<&str>> = changeset.diffs.iter().map(Diff::path).collect();
        assert_eq!(paths, vec![Some("a.sql"), Some("b.sql")]);

        let first = &changeset.diffs[0].hunks[0];
        assert_eq!(first.segments[0].line_type, SegmentType::Removed);
        assert_eq!(first.segments[0].lines[0].text, "-- dropped comment");
    }

    #[test]
    fn test_added_and_deleted_files() {
        let changeset = parse("--- /dev/null\n+++ new.rs\n@@ -0,0 +1,1 @@\n+fn main() {}\n");
        let diff = &changeset.diffs[0];
        assert_eq!(diff.source, None);
        assert_eq!(diff.destination.as_deref(), Some("new.rs"));
        assert_eq!(diff.hunks[0].segments[0].lines[0].destination, 1);
    }

    #[test]
    fn test_hunk_header_without_counts() {
        let changeset = parse("--- a\n+++ a\n@@ -5 +5 @@\n-x\n+y\n");
        let hunk = &changeset.diffs[0].hunks[0];
        assert_eq!(
            (hunk.source_line, hunk.source_span, hunk.destination_line, hunk.destination_span),
            (5, 1, 5, 1)
        );
    }

    #[test]
    fn test_hunk_start_at_largest_number() {
        let changeset = parse("--- a\n+++ a\n@@ -4294967295,2 +1,2 @@\n x\n y\n");
        let lines: Vec<(u32, u32)> = changeset.diffs[0].hunks[0]
            .lines()
            .map(|l| (l.source, l.destination))
            .collect();
        assert_eq!(lines, vec![(u32::MAX, 1), (u32::MAX, 2)]);
    }

    #[test]
    fn test_finish_takes_path_from_first_file() {
        let changeset = parse("# about\n### \n--- /dev/null\n+++ b.txt\n@@ -0,0 +1,1 @@\n+b\n");
        assert_eq!(changeset.path, "b.txt");
    }

    #[test]
    fn test_new_comment_indentation_reads_as_nesting() {
        // Header-less comments carry no depth marker other than their
        // leading whitespace.
        let text = "\
--- a
+++ a
@@ -1,1 +1,1 @@
 x
# ---
#
# [1234] | Ann |
#
# top
#
# ---
#     code block
";
        assert_eq!(
            comments(&parse(text))
                .into_iter()
                .map(|(id, parent, text, _)| (id, parent, text))
                .collect::<Vec<_>>(),
            vec![
                (1234, None, "top".to_string()),
                (0, Some(1234), "code block".to_string()),
            ]
        );
    }

    #[test]
    fn test_unrecognized_diff_header_fails() {
        let error = parse_changeset("--- a\nwhat is this\n@@ -1,1 +1,1 @@\n").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ExpectedDiffHeader);
        assert_eq!(error.line(), Some(2));

        let error = parse_changeset("-not a header\n").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ExpectedDiffHeader);
    }

    #[test]
    fn test_stray_lines_are_ignored() {
        let text = "stray text\n\n--- a\n+++ a\n@@ -1,2 +1,2 @@\n one\n\n??? garbage\n two\n";
        let changeset = parse(text);
        let texts: Vec<&str> = changeset.diffs[0].hunks[0]
            .lines()
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_malformed_fields_lenient_and_strict() {
        let text = "\
--- a\n+++ a\n@@ -1,1 +1,1 @@\n one
# ---
# [99999999999999999999999] | John | not a date
#
# text
";
        let mut parser = ReviewParser::new();
        for line in text.lines() {
            parser.feed(line).unwrap();
        }
        let parsed = parser.finish();
        assert_eq!(parsed.diagnostics.len(), 2);
        assert!(parsed
            .diagnostics
            .iter()
            .all(|e| e.kind() == ErrorKind::MalformedField));
        let comment = &parsed.changeset.diffs[0].comments[0];
        assert_eq!((comment.id, comment.updated), (0, None));
        assert_eq!(comment.text, "text");

        let mut parser = ReviewParser::new().strict(true);
        let error = text
            .lines()
            .map(|line| parser.feed(line))
            .find_map(Result::err)
            .unwrap();
        assert!(matches!(
            error,
            ParseError::MalformedField { line: 6, field: "comment id", .. }
        ));
    }

    #[test]
    fn test_state_transitions() {
        let mut parser = ReviewParser::new();
        let steps = [
            ("--- a", State::DiffHeader),
            ("+++ a", State::DiffHeader),
            ("@@ -1,1 +1,1 @@", State::HunkHeader),
            (" one", State::HunkBody),
            ("# ---", State::CommentDelim),
            ("# [1] | x | Mon Jan  2 15:04:05 2006", State::CommentHeader),
            ("# text", State::Comment),
            ("### note", State::StartOfFile),
        ];
        for (line, expected) in steps {
            parser.feed(line).unwrap();
            assert_eq!(parser.state(), expected, "after {:?}", line);
        }
    }

    #[test]
    fn test_strip_indent() {
        assert_eq!(strip_indent("     text", 5), "text");
        assert_eq!(strip_indent("         code", 5), "    code");
        assert_eq!(strip_indent(" x", 5), "x");
        assert_eq!(strip_indent("text", 1), "text");
    }
}
