//! Change applier that writes each change as one JSON line.

use ash_review::{ApplyError, ChangeApplier, ReviewChange};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Mutex;

/// JSON object describing one change: its kind and its API payload.
pub fn change_line(change: &ReviewChange) -> Value {
    json!({
        "change": change.kind(),
        "payload": change.payload(),
    })
}

/// Writes changes to an output instead of sending them to the service.
pub struct JsonLinesApplier<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesApplier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send> ChangeApplier for JsonLinesApplier<W> {
    async fn apply(&self, change: &ReviewChange) -> Result<Option<u64>, ApplyError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ApplyError::Unavailable("output is poisoned".to_string()))?;

        writeln!(out, "{}", change_line(change))
            .and_then(|_| out.flush())
            .map_err(|e| ApplyError::Rejected(e.to_string()))?;
        Ok(None)
    }

    fn is_available(&self) -> bool {
        true
    }
}
