//! Memory report
//!
//! Per-device allocation summary, rendered one device per paragraph:
//!
//! ```text
//! scull0: qset 2, q 4, sz 10, 2 segments, 3 blocks, 52 bytes allocated
//!   segment 0: slots [0, 1]
//!   segment 1: slots [0]
//! ```

use std::fmt;

/// Allocation snapshot of one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    pub index: usize,
    pub quantum: usize,
    pub qset: usize,

    /// Logical size in bytes
    pub size: u64,

    /// Segments in the chain, including empty placeholders
    pub segment_count: usize,

    pub block_count: usize,
    pub allocated_bytes: usize,

    /// Segments that own a slot array, in chain order
    pub segments: Vec<SegmentReport>,
}

/// Occupied slots of one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentReport {
    pub position: usize,
    pub slots: Vec<usize>,
}

impl fmt::Display for DeviceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scull{}: qset {}, q {}, sz {}, {} segments, {} blocks, {} bytes allocated",
            self.index,
            self.qset,
            self.quantum,
            self.size,
            self.segment_count,
            self.block_count,
            self.allocated_bytes
        )?;
        for segment in &self.segments {
            write!(f, "\n  segment {}: slots {:?}", segment.position, segment.slots)?;
        }
        Ok(())
    }
}
