//! Trait for sending review changes to the code-hosting service.

use crate::change::ReviewChange;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while applying a change.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The service refused the change.
    #[error("Change rejected: {0}")]
    Rejected(String),

    /// The applier cannot be used.
    #[error("Change applier unavailable: {0}")]
    Unavailable(String),
}

/// Applies [`ReviewChange`]s to the remote review.
///
/// # Example
///
/// ```ignore
/// struct HttpApplier {
///     client: Client,
///     comments_url: String,
/// }
///
/// #[async_trait]
/// impl ChangeApplier for HttpApplier {
///     async fn apply(&self, change: &ReviewChange) -> Result<Option<u64>, ApplyError> {
///         let created = self
///             .client
///             .send(&self.comments_url, change.payload())
///             .await
///             .map_err(|e| ApplyError::Rejected(e.to_string()))?;
///         Ok(created.id)
///     }
///
///     fn is_available(&self) -> bool {
///         true
///     }
/// }
/// ```
#[async_trait]
pub trait ChangeApplier: Send + Sync {
    /// Apply one change.
    ///
    /// # Returns
    /// The id of the created comment, if the change created one.
    async fn apply(&self, change: &ReviewChange) -> Result<Option<u64>, ApplyError>;

    /// Check if the applier is available.
    fn is_available(&self) -> bool;
}

/// An applier that refuses everything, for read-only sessions.
pub struct NoOpApplier;

#[async_trait]
impl ChangeApplier for NoOpApplier {
    async fn apply(&self, _change: &ReviewChange) -> Result<Option<u64>, ApplyError> {
        Err(ApplyError::Unavailable(
            "Applying changes is disabled".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Outcome of [`apply_changes`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Number of changes accepted.
    pub applied: usize,
    /// Ids of the comments created, in order.
    pub created: Vec<u64>,
    /// Failed changes with the error message, in order.
    pub failed: Vec<(usize, String)>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Apply changes one after another.
///
/// A failing change is logged and skipped; the remaining changes are still
/// applied.
pub async fn apply_changes(applier: &dyn ChangeApplier, changes: &[ReviewChange]) -> ApplyReport {
    let mut report = ApplyReport::default();

    if !applier.is_available() {
        log::warn!("change applier is unavailable, {} change(s) will fail", changes.len());
    }

    for (index, change) in changes.iter().enumerate() {
        log::debug!("applying {}: {}", change, change.payload());

        match applier.apply(change).await {
            Ok(created) => {
                report.applied += 1;
                report.created.extend(created);
            }
            Err(e) => {
                log::error!("failed to apply \"{}\": {}", change, e);
                report.failed.push((index, e.to_string()));
            }
        }
    }

    report
}
