//! Review API data transfer objects
//!
//! These types mirror the JSON returned by the review service. They are kept
//! separate from the document model in `ash-review`; see [`crate::convert`].

use ash_review::SegmentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A paged response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub is_last_page: bool,
    #[serde(default)]
    pub next_page_start: Option<usize>,
    pub values: Vec<T>,
}

/// Response of the diff endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiChangeset {
    #[serde(default)]
    pub from_hash: Option<String>,
    #[serde(default)]
    pub to_hash: Option<String>,
    /// `IGNORE_ALL` when whitespace changes were hidden.
    #[serde(default)]
    pub whitespace: Option<String>,
    #[serde(default)]
    pub diffs: Vec<ApiDiff>,
}

/// A path as the API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPath {
    #[serde(rename = "toString")]
    pub to_string: String,
}

/// One file of a diff response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDiff {
    /// Missing for added files
    #[serde(default)]
    pub source: Option<ApiPath>,
    /// Missing for deleted files
    #[serde(default)]
    pub destination: Option<ApiPath>,
    #[serde(default)]
    pub hunks: Vec<ApiHunk>,
    /// Top-level comments on lines, with their replies nested.
    #[serde(default)]
    pub line_comments: Vec<ApiComment>,
    /// Top-level comments on the whole file.
    #[serde(default)]
    pub file_comments: Vec<ApiComment>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHunk {
    pub source_line: u32,
    pub source_span: u32,
    pub destination_line: u32,
    pub destination_span: u32,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub segments: Vec<ApiSegment>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSegment {
    #[serde(rename = "type")]
    pub line_type: SegmentType,
    #[serde(default)]
    pub lines: Vec<ApiLine>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLine {
    pub source: u32,
    pub destination: u32,
    /// Line content
    pub line: String,
    /// Ids of the top-level comments on this line
    #[serde(default)]
    pub comment_ids: Vec<u64>,
}

/// A comment with its replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiComment {
    pub id: u64,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: ApiUser,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub updated_date: Option<DateTime<Utc>>,
    /// Replies
    #[serde(default)]
    pub comments: Vec<ApiComment>,
    #[serde(default)]
    pub anchor: Option<ApiAnchor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: Option<String>,
}

impl ApiUser {
    /// Name to show: the display name, or the login when it is empty.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// Position of a comment as stored by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnchor {
    /// Missing for file comments
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub line_type: Option<SegmentType>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub src_path: Option<String>,
    #[serde(default)]
    pub from_hash: Option<String>,
    #[serde(default)]
    pub to_hash: Option<String>,
}
