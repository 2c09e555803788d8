//! Conversion of API responses into review documents.

use crate::types::{ApiAnchor, ApiChangeset, ApiComment, ApiDiff, ApiHunk};
use crate::ApiError;
use ash_review::{Anchor, Changeset, Comment, CommentRef, Diff, FileAnchor, Hunk, LineAnchor};

/// Decode a diff response for `path`.
pub fn decode_changeset(json: &str, path: &str) -> Result<Changeset, ApiError> {
    let response: ApiChangeset = serde_json::from_str(json).map_err(|source| ApiError::Decode {
        what: "diff response",
        source,
    })?;
    Ok(response.into_changeset(path))
}

impl ApiChangeset {
    /// Convert into a changeset, attaching comments to their lines.
    pub fn into_changeset(self, path: impl Into<String>) -> Changeset {
        let mut changeset = Changeset::new(path);
        changeset.ignore_whitespace = self.whitespace.as_deref() == Some("IGNORE_ALL");
        changeset.diffs = self.diffs.into_iter().map(ApiDiff::into_diff).collect();
        changeset.from_hash = self.from_hash;
        changeset.to_hash = self.to_hash;
        changeset.resolve_comment_ids();
        changeset
    }
}

impl ApiDiff {
    /// Convert into a diff. Line comments are only placed in the arena; they
    /// reach their lines through [`Changeset::resolve_comment_ids`].
    pub fn into_diff(self) -> Diff {
        if self.truncated {
            log::warn!(
                "diff of {} is truncated",
                self.destination
                    .as_ref()
                    .or(self.source.as_ref())
                    .map_or("<unknown>", |p| p.to_string.as_str())
            );
        }

        let mut diff = Diff::new(
            self.source.map(|p| p.to_string),
            self.destination.map(|p| p.to_string),
        );
        diff.hunks = self.hunks.into_iter().map(ApiHunk::into_hunk).collect();

        for comment in self.line_comments {
            comment.flatten_into(&mut diff, None);
        }
        for comment in self.file_comments {
            let handle = comment.flatten_into(&mut diff, None);
            diff.file_comments.push(handle);
        }
        diff
    }
}

impl ApiHunk {
    pub fn into_hunk(self) -> Hunk {
        let mut hunk = Hunk::new(
            self.source_line,
            self.source_span,
            self.destination_line,
            self.destination_span,
        );
        hunk.context = self.context.filter(|c| !c.is_empty());

        // Line numbers come from the service as they are; segments are
        // rebuilt so that runs of one type are merged.
        for segment in self.segments {
            for api_line in segment.lines {
                let line = hunk.push_line(segment.line_type, api_line.line);
                line.source = api_line.source;
                line.destination = api_line.destination;
                line.comment_ids = api_line.comment_ids;
            }
        }
        hunk
    }
}

impl ApiComment {
    /// Move this comment and all of its replies into the diff's arena.
    ///
    /// Replies without an anchor of their own share the parent's.
    pub fn flatten_into(self, diff: &mut Diff, inherited: Option<&Anchor>) -> CommentRef {
        let anchor = match (&self.anchor, inherited) {
            (Some(anchor), _) => anchor.to_anchor(),
            (None, Some(inherited)) => inherited.clone(),
            (None, None) => Anchor::Review,
        };

        let mut comment = Comment::saved(self.id, self.version, self.author.label(), self.text)
            .with_anchor(anchor.clone());
        comment.updated = self.updated_date.or(self.created_date);

        let handle = diff.add_comment(comment);
        for reply in self.comments {
            let reply = reply.flatten_into(diff, Some(&anchor));
            diff.attach_reply(handle, reply);
        }
        handle
    }
}

impl ApiAnchor {
    /// Line anchor when a line is set, file anchor when only a path is.
    pub fn to_anchor(&self) -> Anchor {
        let path = self.path.clone().unwrap_or_default();

        match (self.line, self.line_type) {
            (Some(line), Some(line_type)) => Anchor::Line(LineAnchor {
                path,
                src_path: self.src_path.clone(),
                from_hash: self.from_hash.clone(),
                to_hash: self.to_hash.clone(),
                ..LineAnchor::new(line, line_type)
            }),
            _ if !path.is_empty() => Anchor::File(FileAnchor {
                path,
                src_path: self.src_path.clone(),
            }),
            _ => Anchor::Review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash_review::{render_changeset, SegmentType};
    use pretty_assertions::assert_eq;

    const DIFF_JSON: &str = r#"{
        "fromHash": "abc",
        "toHash": "def",
        "whitespace": "IGNORE_ALL",
        "diffs": [{
            "source": { "toString": "a.txt" },
            "destination": { "toString": "a.txt" },
            "hunks": [{
                "sourceLine": 1, "sourceSpan": 2,
                "destinationLine": 1, "destinationSpan": 2,
                "segments": [
                    { "type": "CONTEXT", "lines": [
                        { "source": 1, "destination": 1, "line": "one", "commentIds": [1234] }
                    ]},
                    { "type": "REMOVED", "lines": [
                        { "source": 2, "destination": 2, "line": "two" }
                    ]},
                    { "type": "ADDED", "lines": [
                        { "source": 3, "destination": 2, "line": "three" }
                    ]}
                ]
            }],
            "lineComments": [{
                "id": 1234, "version": 0, "text": "bla",
                "author": { "name": "jdoe", "displayName": "John Doe" },
                "updatedDate": 1136214245000,
                "anchor": { "line": 1, "lineType": "CONTEXT", "path": "a.txt", "srcPath": "a.txt" },
                "comments": [{
                    "id": 1235, "version": 1, "text": "reply",
                    "author": { "name": "jroe", "displayName": "Jane Roe" },
                    "updatedDate": 1136214245000
                }]
            }],
            "fileComments": [{
                "id": 17, "version": 0, "text": "file level",
                "author": { "name": "ann" },
                "anchor": { "path": "a.txt" }
            }]
        }]
    }"#;

    #[test]
    fn test_decode_changeset() {
        let changeset = decode_changeset(DIFF_JSON, "a.txt").unwrap();
        assert_eq!(changeset.path, "a.txt");
        assert_eq!(changeset.from_hash.as_deref(), Some("abc"));
        assert!(changeset.ignore_whitespace);

        let diff = &changeset.diffs[0];
        assert_eq!(diff.comments.len(), 3);
        assert_eq!(diff.comment(diff.file_comments[0]).id, 17);
        assert_eq!(
            diff.comment(diff.file_comments[0]).anchor,
            Anchor::File(FileAnchor {
                path: "a.txt".to_string(),
                src_path: None
            })
        );

        let mut found = Vec::new();
        changeset.for_each_comment(|_, comment, parent| {
            found.push((comment.id, parent.map(|p| p.id), comment.author.clone()));
        });
        assert_eq!(
            found,
            vec![
                (17, None, "ann".to_string()),
                (1234, None, "John Doe".to_string()),
                (1235, Some(1234), "Jane Roe".to_string()),
            ]
        );

        let reply = &diff.comments[1];
        assert_eq!(
            reply.anchor.as_line().map(|a| (a.line, a.line_type)),
            Some((1, SegmentType::Context))
        );
    }

    #[test]
    fn test_service_line_numbers_are_kept() {
        let changeset = decode_changeset(DIFF_JSON, "a.txt").unwrap();
        let added = &changeset.diffs[0].hunks[0].segments[2].lines[0];
        assert_eq!((added.source, added.destination), (3, 2));
    }

    #[test]
    fn test_rendered_response_contains_threads() {
        let changeset = decode_changeset(DIFF_JSON, "a.txt").unwrap();
        let text = render_changeset(&changeset);
        assert!(text.starts_with("# ---\n#\n# [17] | ann |\n"));
        assert!(text.contains(" one\n# ---\n#\n# [1234] | John Doe | Mon Jan  2 15:04:05 2006\n"));
        assert!(text.contains("#     [1235] | Jane Roe | Mon Jan  2 15:04:05 2006\n"));
    }

    #[test]
    fn test_decode_error() {
        let error = decode_changeset("{ not json", "a.txt").unwrap_err();
        assert!(error.to_string().starts_with("Failed to decode diff response"));
    }

    #[test]
    fn test_anchor_conversion() {
        let file = ApiAnchor {
            path: Some("b.rs".to_string()),
            ..ApiAnchor::default()
        };
        assert!(matches!(file.to_anchor(), Anchor::File(_)));
        assert_eq!(ApiAnchor::default().to_anchor(), Anchor::Review);
    }
}
