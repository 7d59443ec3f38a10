//! Address translation
//!
//! Maps a byte offset to its storage coordinates for a given quantum/qset.

use crate::error::{Result, ScullError};

/// Block size and blocks-per-segment of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    quantum: usize,
    qset: usize,
}

/// Storage coordinates of one byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Chain position of the segment
    pub segment: usize,

    /// Block slot within the segment
    pub slot: usize,

    /// Byte offset within the block
    pub offset: usize,
}

impl Geometry {
    /// Create a geometry, rejecting zero sizes and an overflowing item size
    pub fn new(quantum: usize, qset: usize) -> Result<Self> {
        if quantum == 0 || qset == 0 {
            return Err(ScullError::InvalidArgument(format!(
                "quantum and qset must be non-zero (got quantum={}, qset={})",
                quantum, qset
            )));
        }
        (quantum as u64).checked_mul(qset as u64).ok_or_else(|| {
            ScullError::InvalidArgument(format!(
                "quantum * qset overflows (quantum={}, qset={})",
                quantum, qset
            ))
        })?;
        Ok(Self { quantum, qset })
    }

    pub fn quantum(&self) -> usize {
        self.quantum
    }

    pub fn qset(&self) -> usize {
        self.qset
    }

    /// Bytes covered by one segment
    pub fn item_size(&self) -> u64 {
        self.quantum as u64 * self.qset as u64
    }

    /// Translate a byte offset into storage coordinates
    ///
    /// An offset on a block or segment boundary maps to the start of the next
    /// unit. Segment indices beyond `usize` saturate; such a segment can never
    /// be allocated, so writes there fail and reads see a hole.
    pub fn locate(&self, offset: u64) -> Position {
        let item_size = self.item_size();
        let quantum = self.quantum as u64;
        let rest = offset % item_size;

        Position {
            segment: usize::try_from(offset / item_size).unwrap_or(usize::MAX),
            slot: (rest / quantum) as usize,
            offset: (rest % quantum) as usize,
        }
    }

    /// Bytes left in the block containing `pos`
    pub fn remaining_in_block(&self, pos: &Position) -> usize {
        self.quantum - pos.offset
    }
}
