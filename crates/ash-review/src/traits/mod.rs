//! Extension traits for plugging review sessions into a service.

mod change_applier;

pub use change_applier::{apply_changes, ApplyError, ApplyReport, ChangeApplier, NoOpApplier};
