//! Per-device allocation accounting

use crate::error::{Result, ScullError};

/// Tracks bytes allocated by one device against an optional ceiling
#[derive(Debug, Clone)]
pub(crate) struct MemoryBudget {
    allocated: usize,
    limit: Option<usize>,
}

impl MemoryBudget {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self { allocated: 0, limit }
    }

    pub(crate) fn allocated(&self) -> usize {
        self.allocated
    }

    /// Reserve `bytes` for `what`, failing with OutOfMemory past the limit
    pub(crate) fn charge(&mut self, bytes: usize, what: &str) -> Result<()> {
        let total = self.allocated.checked_add(bytes);
        match (total, self.limit) {
            (Some(total), Some(limit)) if total <= limit => {
                self.allocated = total;
                Ok(())
            }
            (Some(total), None) => {
                self.allocated = total;
                Ok(())
            }
            _ => {
                tracing::warn!(
                    what,
                    bytes,
                    allocated = self.allocated,
                    limit = ?self.limit,
                    "allocation refused"
                );
                Err(ScullError::OutOfMemory(format!(
                    "{} of {} bytes exceeds the device memory limit",
                    what, bytes
                )))
            }
        }
    }

    /// Give back a charge whose allocation did not happen
    pub(crate) fn refund(&mut self, bytes: usize) {
        self.allocated = self.allocated.saturating_sub(bytes);
    }

    /// Forget all charges (the chain was freed)
    pub(crate) fn clear(&mut self) {
        self.allocated = 0;
    }
}
