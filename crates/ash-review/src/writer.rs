//! Render a [`Changeset`] to the review text format.
//!
//! ```text
//! --- src/lib.rs	abc123
//! +++ src/lib.rs	def456
//! @@ -1,2 +1,2 @@ fn main()
//!  context line
//! -removed line
//! # ---
//! #
//! # [1234] | Author Name | Mon Jan  2 15:04:05 2006
//! #
//! # comment text
//! #
//! # ---
//! #
//! #     [1235] | Other Author | Mon Jan  2 15:04:05 2006
//! #
//! #     reply text
//! #
//! #     ---
//! +added line
//! ```
//!
//! Lines starting with [`NOTE_PREFIX`] are ignored by the parser and carry
//! the usage banner, activity narration and the modeline.

use crate::model::{Changeset, CommentRef, Diff, Hunk};
use crate::parser::format_timestamp;
use std::io;

/// Prefix of lines the parser ignores.
pub const NOTE_PREFIX: &str = "###";

/// Path written for the missing side of added and deleted files.
pub const NULL_PATH: &str = "/dev/null";

/// Extra indentation per reply level.
pub const REPLY_INDENT: &str = "    ";

/// Render a changeset to a string.
pub fn render_changeset(changeset: &Changeset) -> String {
    let mut renderer = Renderer {
        changeset,
        out: String::new(),
    };
    renderer.render();
    renderer.out
}

/// Render a changeset into a writer.
pub fn write_changeset(changeset: &Changeset, mut writer: impl io::Write) -> io::Result<()> {
    writer.write_all(render_changeset(changeset).as_bytes())?;
    writer.flush()
}

struct Renderer<'a> {
    changeset: &'a Changeset,
    out: String,
}

impl Renderer<'_> {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn render(&mut self) {
        // Comments placed before a file header would otherwise be read as
        // part of the previous file's last hunk.
        let mut after_entry = false;

        for diff in &self.changeset.diffs {
            if let Some(note) = &diff.note {
                self.note(note);
                after_entry = false;
                continue;
            }

            if !diff.is_file() && diff.file_comments.is_empty() {
                continue;
            }

            if after_entry {
                self.line(NOTE_PREFIX);
            }
            self.diff(diff);
            after_entry = true;
        }
    }

    fn note(&mut self, note: &str) {
        for text in note.lines() {
            if text.is_empty() {
                self.line(NOTE_PREFIX);
            } else {
                self.line(&format!("{} {}", NOTE_PREFIX, text));
            }
        }
        self.line("");
    }

    fn diff(&mut self, diff: &Diff) {
        self.comments(diff, &diff.file_comments);

        if !diff.is_file() {
            return;
        }

        let from = file_header("---", diff.source.as_deref(), &self.changeset.from_hash);
        let to = file_header("+++", diff.destination.as_deref(), &self.changeset.to_hash);
        self.line(&from);
        self.line(&to);

        for hunk in &diff.hunks {
            self.hunk(diff, hunk);
        }
    }

    fn hunk(&mut self, diff: &Diff, hunk: &Hunk) {
        self.line(&hunk.header());

        for segment in &hunk.segments {
            let prefix = segment.line_type.prefix();
            for line in &segment.lines {
                self.line(&format!("{}{}", prefix, line.text));
                self.comments(diff, &line.comments);
            }
        }
    }

    fn comments(&mut self, diff: &Diff, handles: &[CommentRef]) {
        if handles.is_empty() {
            return;
        }

        self.line("# ---");
        for &handle in handles {
            self.thread(diff, handle, 0);
        }
    }

    fn thread(&mut self, diff: &Diff, handle: CommentRef, depth: usize) {
        let comment = diff.comment(handle);
        let pad = format!(" {}", REPLY_INDENT.repeat(depth));

        self.line("#");
        if !comment.is_new() {
            let mut header = format!(
                "#{}[{}] | {} |",
                pad,
                comment.id,
                comment.author.replace('|', "/")
            );
            if let Some(updated) = &comment.updated {
                header.push(' ');
                header.push_str(&format_timestamp(updated));
            }
            self.line(&header);
            self.line("#");
        }

        for text in comment.text.lines() {
            let text = text.trim_end();
            if text.is_empty() {
                self.line("#");
            } else {
                self.line(&format!("#{}{}", pad, text));
            }
        }
        self.line("#");
        self.line(&format!("#{}---", pad));

        for &reply in &comment.replies {
            self.thread(diff, reply, depth + 1);
        }
    }
}

fn file_header(marker: &str, path: Option<&str>, hash: &Option<String>) -> String {
    let path = path.unwrap_or(NULL_PATH);
    match hash {
        Some(hash) => format!("{} {}\t{}", marker, path, hash),
        None => format!("{} {}", marker, path),
    }
}
