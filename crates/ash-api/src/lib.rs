//! Code-review API data and its conversion into review documents
//!
//! This crate only knows the JSON shapes returned by the review service.
//! Fetching them is left to the caller; everything here works on strings
//! and values.
//!
//! # Example
//!
//! ```rust,ignore
//! use ash_api::{decode_activities, decode_changeset, overview_changeset};
//!
//! let changeset = decode_changeset(&diff_json, "src/lib.rs")?;
//! let overview = overview_changeset(&decode_activities(&activities_json)?);
//! ```

pub mod activity;
pub mod convert;
pub mod overview;
pub mod types;

use thiserror::Error;

pub use activity::{decode_activities, Activity, Commented, Rescoped, UserActivity};
pub use convert::decode_changeset;
pub use overview::overview_changeset;
pub use types::{
    ApiAnchor, ApiChangeset, ApiComment, ApiDiff, ApiHunk, ApiLine, ApiPath, ApiSegment, ApiUser,
    Page,
};

/// Errors that can occur while reading API responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The response is not the JSON we expect.
    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
