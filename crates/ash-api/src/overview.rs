//! Overview document built from the activity stream.

use crate::activity::{Activity, Commented, Commit, Rescoped};
use crate::types::ApiAnchor;
use ash_review::{Changeset, Diff};

/// Build the overview document of a pull request.
///
/// Activities keep their order. Comment activities become the commented
/// diff with the thread under its line (or as a file comment when the line
/// is not part of the diff); comments on the pull request itself become a
/// review-level entry. Everything else is narrated in notes.
pub fn overview_changeset(activities: &[Activity]) -> Changeset {
    let mut changeset = Changeset::default();

    for activity in activities {
        let entry = match activity {
            Activity::Opened(a) => Diff::note(format!("opened by {}", a.user.label())),
            Activity::Approved(a) => Diff::note(format!("approved by {}", a.user.label())),
            Activity::Unapproved(a) => Diff::note(format!("unapproved by {}", a.user.label())),
            Activity::Declined(a) => Diff::note(format!("declined by {}", a.user.label())),
            Activity::Merged(a) => Diff::note(format!("merged by {}", a.user.label())),
            Activity::Reviewed(a) => Diff::note(format!("reviewed by {}", a.user.label())),
            Activity::Rescoped(rescoped) => Diff::note(rescoped_note(rescoped)),
            Activity::Commented(commented) => {
                if let Some(anchor) = &commented.comment_anchor {
                    if changeset.from_hash.is_none() {
                        changeset.from_hash = anchor.from_hash.clone();
                    }
                    if changeset.to_hash.is_none() {
                        changeset.to_hash = anchor.to_hash.clone();
                    }
                }
                commented_diff(commented)
            }
        };
        changeset.diffs.push(entry);
    }

    changeset
}

fn rescoped_note(rescoped: &Rescoped) -> String {
    let mut sections = Vec::new();

    if !rescoped.added.changesets.is_empty() {
        sections.push(commit_section("New commits added:", &rescoped.added.changesets));
    }
    if !rescoped.removed.changesets.is_empty() {
        sections.push(commit_section("Commits removed:", &rescoped.removed.changesets));
    }

    if sections.is_empty() {
        "pull request rescoped".to_string()
    } else {
        sections.join("\n\n")
    }
}

fn commit_section(title: &str, commits: &[Commit]) -> String {
    let mut section = format!("{}\n", title);
    for commit in commits {
        let display_id = if commit.display_id.is_empty() {
            &commit.id
        } else {
            &commit.display_id
        };
        section.push_str(&format!(
            "\n{} | {} | {}",
            display_id,
            commit.author.label(),
            commit.message.lines().next().unwrap_or_default()
        ));
    }
    section
}

fn commented_diff(commented: &Commented) -> Diff {
    let Some(api_diff) = &commented.diff else {
        let mut diff = Diff::default();
        let handle = commented.comment.clone().flatten_into(&mut diff, None);
        diff.file_comments.push(handle);
        return diff;
    };

    let mut diff = api_diff.clone().into_diff();
    let inherited = commented.comment_anchor.as_ref().map(ApiAnchor::to_anchor);
    let handle = commented
        .comment
        .clone()
        .flatten_into(&mut diff, inherited.as_ref());

    let target = commented
        .comment_anchor
        .as_ref()
        .and_then(|anchor| Some((anchor.line?, anchor.line_type?)));

    let line = match target {
        Some((number, line_type)) => diff
            .hunks
            .iter_mut()
            .flat_map(|hunk| hunk.segments.iter_mut())
            .filter(|segment| segment.line_type == line_type)
            .flat_map(|segment| segment.lines.iter_mut())
            .find(|line| line.anchor_number(line_type) == number),
        None => None,
    };

    match line {
        Some(line) => line.comments.push(handle),
        None => {
            log::debug!("comment {} has no matching line", commented.comment.id);
            diff.file_comments.push(handle);
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::decode_activities;
    use ash_review::{render_changeset, Review, SegmentType};
    use pretty_assertions::assert_eq;

    const ACTIVITIES_JSON: &str = r#"{
        "isLastPage": true,
        "values": [
            { "action": "APPROVED", "user": { "name": "jroe", "displayName": "Jane Roe" } },
            { "action": "COMMENTED",
              "comment": {
                  "id": 1234, "version": 0, "text": "bla",
                  "author": { "name": "jdoe", "displayName": "John Doe" },
                  "comments": [{ "id": 1235, "text": "reply", "author": { "name": "jroe", "displayName": "Jane Roe" } }]
              },
              "commentAnchor": { "line": 2, "lineType": "ADDED", "path": "a.txt", "srcPath": "a.txt",
                                 "fromHash": "abc", "toHash": "def" },
              "diff": {
                  "source": { "toString": "a.txt" },
                  "destination": { "toString": "a.txt" },
                  "hunks": [{
                      "sourceLine": 1, "sourceSpan": 1, "destinationLine": 1, "destinationSpan": 2,
                      "segments": [
                          { "type": "CONTEXT", "lines": [{ "source": 1, "destination": 1, "line": "one" }] },
                          { "type": "ADDED", "lines": [{ "source": 2, "destination": 2, "line": "two" }] }
                      ]
                  }]
              } },
            { "action": "RESCOPED",
              "added": { "changesets": [
                  { "id": "0123456789abcdef", "displayId": "0123456",
                    "author": { "name": "jdoe", "displayName": "John Doe" }, "message": "Fix tests\n\nDetails" }
              ] },
              "removed": { "changesets": [
                  { "id": "fedcba9876543210", "author": { "name": "jdoe" }, "message": "WIP" }
              ] } },
            { "action": "COMMENTED",
              "comment": { "id": 99, "text": "overall lgtm", "author": { "name": "ann" } } }
        ]
    }"#;

    fn overview() -> Changeset {
        overview_changeset(&decode_activities(ACTIVITIES_JSON).unwrap())
    }

    #[test]
    fn test_notes() {
        let changeset = overview();
        assert_eq!(changeset.diffs.len(), 4);
        assert_eq!(changeset.diffs[0].note.as_deref(), Some("approved by Jane Roe"));
        assert_eq!(
            changeset.diffs[2].note.as_deref(),
            Some(
                "New commits added:\n\n0123456 | John Doe | Fix tests\n\n\
                 Commits removed:\n\nfedcba9876543210 | jdoe | WIP"
            )
        );
    }

    #[test]
    fn test_comment_bound_to_anchored_line() {
        let changeset = overview();
        assert_eq!(changeset.from_hash.as_deref(), Some("abc"));

        let diff = &changeset.diffs[1];
        let line = &diff.hunks[0].segments[1].lines[0];
        assert_eq!(diff.hunks[0].segments[1].line_type, SegmentType::Added);
        assert_eq!(line.comments.len(), 1);

        let comment = diff.comment(line.comments[0]);
        assert_eq!(comment.id, 1234);
        assert_eq!(diff.comment(comment.replies[0]).id, 1235);
        assert_eq!(comment.anchor.as_line().map(|a| a.line), Some(2));
        assert!(diff.file_comments.is_empty());
    }

    #[test]
    fn test_review_level_comment() {
        let changeset = overview();
        let entry = &changeset.diffs[3];
        assert!(!entry.is_file());
        assert_eq!(entry.comment(entry.file_comments[0]).text, "overall lgtm");
    }

    #[test]
    fn test_overview_document_round_trip() {
        let original = Review::overview(overview());
        let mut edited = Review::parse(&render_changeset(&original.changeset)).unwrap();
        edited.is_overview = true;
        assert_eq!(original.compare(&edited), vec![]);
    }
}
