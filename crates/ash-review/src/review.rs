//! A review document and the comparison of two of its snapshots.

use crate::change::ReviewChange;
use crate::model::{Anchor, Changeset, Comment, Diff};
use crate::parser::{parse_changeset, read_changeset, ParseError};
use crate::writer::{render_changeset, write_changeset};
use std::io;

const USAGE_TEXT: &str = "\
Oh, hello there!

Some points about using ash:
* Everything beginning with ### will be ignored.
* Use one # to start a comment.
* You can add line comments after specific lines.
* You can add file comments outside of the diff.
* You can add review comments outside of the diff (in the overview mode).
* If you want to delete a comment, remove all of its contents
  including the header.";

const VIM_MODELINE: &str = "vim: ft=diff";

/// A changeset under review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Review {
    pub changeset: Changeset,
    /// Overview documents hold review-level comments instead of file
    /// comments.
    pub is_overview: bool,
}

impl Review {
    pub fn new(changeset: Changeset) -> Self {
        Self {
            changeset,
            is_overview: false,
        }
    }

    pub fn overview(changeset: Changeset) -> Self {
        Self {
            changeset,
            is_overview: true,
        }
    }

    /// Parse a review document (lenient mode).
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(Self::new(parse_changeset(text)?))
    }

    /// Read a review document, logging non-fatal diagnostics.
    pub fn read(reader: impl io::Read, strict: bool) -> Result<Self, ParseError> {
        let parsed = read_changeset(reader, strict)?;
        if !parsed.diagnostics.is_empty() {
            log::info!(
                "review parsed with {} diagnostic(s)",
                parsed.diagnostics.len()
            );
        }
        Ok(Self::new(parsed.changeset))
    }

    pub fn render(&self) -> String {
        render_changeset(&self.changeset)
    }

    pub fn write(&self, writer: impl io::Write) -> io::Result<()> {
        write_changeset(&self.changeset, writer)
    }

    /// Prepend the usage banner.
    pub fn add_usage_banner(&mut self) {
        self.changeset.diffs.insert(0, Diff::note(USAGE_TEXT));
    }

    /// Append the modeline identifying the review and the file it shows.
    pub fn add_modeline(&mut self, url: &str) {
        let target = if self.is_overview {
            "overview".to_string()
        } else {
            let file = self
                .changeset
                .file_diffs()
                .next()
                .and_then(|diff| diff.source.as_deref().or(diff.destination.as_deref()))
                .unwrap_or(self.changeset.path.as_str());
            format!("file={}", file)
        };

        self.changeset.diffs.push(Diff::note(format!(
            "ash: review-url={} {}\n{}",
            url, target, VIM_MODELINE
        )));
    }

    /// Changes that turn `self` into `edited`.
    ///
    /// New comments, replies and edits are reported in document order of
    /// `edited`, removals last in document order of `self`. Comments that
    /// only moved are not reported.
    pub fn compare(&self, edited: &Review) -> Vec<ReviewChange> {
        let mut existing: Vec<Option<&Comment>> = Vec::new();
        self.changeset.for_each_comment(|_, comment, _| {
            if !comment.is_new() {
                existing.push(Some(comment));
            }
        });

        let mut changes = Vec::new();
        edited.changeset.for_each_comment(|diff, comment, parent| {
            let change = if comment.is_new() {
                Some(self.added(edited, diff, comment, parent))
            } else {
                match_existing(&mut existing, comment)
            };

            if let Some(change) = change {
                log::debug!("{}", change);
                changes.push(change);
            }
        });

        changes.extend(
            existing
                .into_iter()
                .flatten()
                .map(|comment| ReviewChange::CommentRemoved(comment.clone())),
        );
        changes
    }

    fn added(
        &self,
        edited: &Review,
        diff: &Diff,
        comment: &Comment,
        parent: Option<&Comment>,
    ) -> ReviewChange {
        if let Some(parent) = parent {
            return ReviewChange::ReplyAdded {
                comment: comment.clone(),
                parent: parent.clone(),
            };
        }

        match &comment.anchor {
            Anchor::Line(_) => ReviewChange::LineCommentAdded(comment.clone()),
            Anchor::File(_) => ReviewChange::FileCommentAdded(comment.clone()),
            Anchor::Review if self.is_overview => {
                ReviewChange::ReviewCommentAdded(comment.clone())
            }
            Anchor::Review => {
                let anchor = diff
                    .file_anchor()
                    .or_else(|| edited.changeset.file_anchor())
                    .or_else(|| self.changeset.file_anchor());

                match anchor {
                    Some(anchor) => ReviewChange::FileCommentAdded(
                        comment.clone().with_anchor(Anchor::File(anchor)),
                    ),
                    None => ReviewChange::ReviewCommentAdded(comment.clone()),
                }
            }
        }
    }
}

fn match_existing(existing: &mut [Option<&Comment>], comment: &Comment) -> Option<ReviewChange> {
    let slot = existing
        .iter_mut()
        .find(|slot| slot.is_some_and(|c| c.id == comment.id))?;
    let original = slot.take()?;

    if normalize(&original.text) == normalize(&comment.text) {
        return None;
    }

    Some(ReviewChange::CommentModified(Comment {
        text: comment.text.clone(),
        ..original.clone()
    }))
}

/// Comment text without trailing whitespace on any line and without
/// surrounding blank lines.
fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
