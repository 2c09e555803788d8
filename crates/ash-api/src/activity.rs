//! Pull-request activities and their decoding.

use crate::types::{ApiAnchor, ApiComment, ApiDiff, ApiUser, Page};
use crate::ApiError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One entry of the activity stream of a pull request.
#[derive(Debug, Clone)]
pub enum Activity {
    Opened(UserActivity),
    Approved(UserActivity),
    Unapproved(UserActivity),
    Declined(UserActivity),
    Merged(UserActivity),
    Reviewed(UserActivity),
    Rescoped(Rescoped),
    Commented(Commented),
}

/// An activity that only records who did it and when.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: ApiUser,
}

/// Commits were pushed to or removed from the pull request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rescoped {
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub from_hash: Option<String>,
    #[serde(default)]
    pub to_hash: Option<String>,
    #[serde(default)]
    pub previous_from_hash: Option<String>,
    #[serde(default)]
    pub previous_to_hash: Option<String>,
    #[serde(default)]
    pub added: CommitList,
    #[serde(default)]
    pub removed: CommitList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitList {
    #[serde(default)]
    pub changesets: Vec<Commit>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub display_id: String,
    #[serde(default)]
    pub author: ApiUser,
    #[serde(default)]
    pub message: String,
}

/// A comment was added, with the diff it refers to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commented {
    pub comment: ApiComment,
    #[serde(default)]
    pub comment_anchor: Option<ApiAnchor>,
    /// Missing for comments on the pull request itself
    #[serde(default)]
    pub diff: Option<ApiDiff>,
}

impl Activity {
    /// Wire name of the activity's action.
    pub fn action(&self) -> &'static str {
        match self {
            Activity::Opened(_) => "OPENED",
            Activity::Approved(_) => "APPROVED",
            Activity::Unapproved(_) => "UNAPPROVED",
            Activity::Declined(_) => "DECLINED",
            Activity::Merged(_) => "MERGED",
            Activity::Reviewed(_) => "REVIEWED",
            Activity::Rescoped(_) => "RESCOPED",
            Activity::Commented(_) => "COMMENTED",
        }
    }
}

type Decoder = fn(Value) -> Result<Activity, serde_json::Error>;

/// Decoders by `action` discriminator.
const DECODERS: &[(&str, Decoder)] = &[
    ("OPENED", |v| serde_json::from_value(v).map(Activity::Opened)),
    ("APPROVED", |v| serde_json::from_value(v).map(Activity::Approved)),
    ("UNAPPROVED", |v| serde_json::from_value(v).map(Activity::Unapproved)),
    ("DECLINED", |v| serde_json::from_value(v).map(Activity::Declined)),
    ("MERGED", |v| serde_json::from_value(v).map(Activity::Merged)),
    ("REVIEWED", |v| serde_json::from_value(v).map(Activity::Reviewed)),
    ("RESCOPED", |v| serde_json::from_value(v).map(Activity::Rescoped)),
    ("COMMENTED", |v| serde_json::from_value(v).map(Activity::Commented)),
];

/// Decode one raw activity.
///
/// Returns `None` (and logs why) for unknown actions and entries that do
/// not match the shape of their action.
pub fn decode_activity(value: Value) -> Option<Activity> {
    let Some(action) = value.get("action").and_then(Value::as_str).map(str::to_string) else {
        log::warn!("activity without action, skipping");
        return None;
    };

    let Some((_, decode)) = DECODERS.iter().find(|(name, _)| *name == action) else {
        log::warn!("unknown activity action: {}", action);
        return None;
    };

    match decode(value) {
        Ok(activity) => Some(activity),
        Err(e) => {
            log::warn!("malformed {} activity, skipping: {}", action, e);
            None
        }
    }
}

/// Decode an activities page.
pub fn decode_activities(json: &str) -> Result<Vec<Activity>, ApiError> {
    let page: Page<Value> = serde_json::from_str(json).map_err(|source| ApiError::Decode {
        what: "activities page",
        source,
    })?;

    if !page.is_last_page {
        log::debug!(
            "activities page is not the last one ({} entries read), next page starts at {:?}",
            page.values.len(),
            page.next_page_start
        );
    }

    Ok(page.values.into_iter().filter_map(decode_activity).collect())
}
