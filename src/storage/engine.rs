//! Storage Engine
//!
//! Owns the segment chain of one device and implements the read and write
//! paths against it. Callers are expected to hold the device lock; nothing
//! in here synchronizes on its own.

use crate::error::{Result, ScullError};
use crate::uaccess::{UserSink, UserSource};

use super::budget::MemoryBudget;
use super::{Geometry, Position, Segment};

/// Sparse, lazily grown storage for one device
///
/// ## Growth rules
/// - Writes call [`Storage::follow`], which appends every missing segment up
///   to the target position, then allocate the slot array and block on demand
/// - Reads walk the chain read-only; a missing segment, slot array or block
///   is a hole and yields zero bytes
/// - Nothing shrinks until [`Storage::trim`]
#[derive(Debug)]
pub struct Storage {
    /// Segment arena; the segment after `chain[i]` is `chain[i + 1]`
    chain: Vec<Segment>,

    /// Geometry in effect until the next trim
    geometry: Geometry,

    /// Geometry restored by trim
    defaults: Geometry,

    /// Logical length: one past the highest byte ever written
    size: u64,

    /// Bytes allocated for segments, slot arrays and blocks
    budget: MemoryBudget,
}

impl Storage {
    /// Create an empty storage engine
    pub fn new(defaults: Geometry, memory_limit: Option<usize>) -> Self {
        Self {
            chain: Vec::new(),
            geometry: defaults,
            defaults,
            size: 0,
            budget: MemoryBudget::new(memory_limit),
        }
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Copy bytes starting at `offset` into `dst`
    ///
    /// Returns the number of bytes transferred, clamped by the logical size
    /// and by the end of the block holding `offset`. Zero means end of data
    /// or a hole.
    pub fn read<B: UserSink + ?Sized>(&self, offset: u64, dst: &mut B) -> Result<usize> {
        if offset >= self.size {
            return Ok(0);
        }
        let available = self.size - offset;
        let wanted = (dst.capacity() as u64).min(available);

        let pos = self.geometry.locate(offset);
        let block = match self.lookup(&pos) {
            Some(block) => block,
            None => {
                tracing::trace!(offset, ?pos, "read hit a hole");
                return Ok(0);
            }
        };

        let count = wanted.min(self.geometry.remaining_in_block(&pos) as u64) as usize;
        dst.copy_to_user(&block[pos.offset..pos.offset + count])?;
        Ok(count)
    }

    /// Read-only walk to the block holding `pos`; never allocates
    pub fn lookup(&self, pos: &Position) -> Option<&[u8]> {
        self.chain.get(pos.segment)?.block(pos.slot)
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Copy bytes from `src` into the device starting at `offset`
    ///
    /// Stores at most the bytes left in the target block and returns that
    /// count. `size` grows only after the transfer succeeded.
    pub fn write<B: UserSource + ?Sized>(&mut self, offset: u64, src: &B) -> Result<usize> {
        if src.is_empty() {
            return Ok(0);
        }
        let geometry = self.geometry;
        let pos = geometry.locate(offset);
        let count = src.len().min(geometry.remaining_in_block(&pos));
        let end = offset.checked_add(count as u64).ok_or_else(|| {
            ScullError::InvalidArgument(format!(
                "write of {} bytes at offset {} overflows",
                count, offset
            ))
        })?;

        let segment = Self::follow_in(&mut self.chain, &mut self.budget, pos.segment)?;
        let block = segment.block_or_allocate(pos.slot, geometry, &mut self.budget)?;
        src.copy_from_user(&mut block[pos.offset..pos.offset + count])?;

        if end > self.size {
            self.size = end;
        }
        Ok(count)
    }

    /// Return the segment at chain position `index`, appending it and every
    /// missing predecessor
    pub fn follow(&mut self, index: usize) -> Result<&mut Segment> {
        Self::follow_in(&mut self.chain, &mut self.budget, index)
    }

    fn follow_in<'a>(
        chain: &'a mut Vec<Segment>,
        budget: &mut MemoryBudget,
        index: usize,
    ) -> Result<&'a mut Segment> {
        if index >= chain.len() {
            let missing = index
                .checked_add(1)
                .map(|len| len - chain.len())
                .ok_or_else(|| {
                    ScullError::OutOfMemory(format!("segment index {} is unreachable", index))
                })?;
            let cost = missing.checked_mul(Segment::NODE_COST).ok_or_else(|| {
                ScullError::OutOfMemory(format!("{} segments overflow the address space", missing))
            })?;

            budget.charge(cost, "segments")?;
            chain.try_reserve_exact(missing).map_err(|e| {
                budget.refund(cost);
                ScullError::OutOfMemory(format!("{} segments: {}", missing, e))
            })?;
            chain.resize_with(index + 1, Segment::new);
            tracing::trace!(index, missing, "extended segment chain");
        }
        Ok(&mut chain[index])
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Free every block and segment, zero the size and restore the default
    /// geometry. Trimming empty storage only restores the defaults.
    pub fn trim(&mut self) {
        let segments = self.chain.len();
        let blocks = self.block_count();

        self.chain = Vec::new();
        self.size = 0;
        self.budget.clear();
        self.geometry = self.defaults;

        if segments > 0 {
            tracing::debug!(segments, blocks, "trimmed storage");
        }
    }

    /// Change quantum/qset; only allowed while no data is held
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<()> {
        if !self.is_empty() {
            return Err(ScullError::Busy(format!(
                "cannot change geometry while {} bytes are stored",
                self.size
            )));
        }
        self.geometry = geometry;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn default_geometry(&self) -> Geometry {
        self.defaults
    }

    /// Logical size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// True when nothing has been written since the last trim
    pub fn is_empty(&self) -> bool {
        self.size == 0 && self.chain.is_empty()
    }

    /// Segments in chain order
    pub fn segments(&self) -> &[Segment] {
        &self.chain
    }

    pub fn segment_count(&self) -> usize {
        self.chain.len()
    }

    /// Total allocated blocks across the chain
    pub fn block_count(&self) -> usize {
        self.chain.iter().map(Segment::block_count).sum()
    }

    /// Bytes charged for segments, slot arrays and blocks
    pub fn allocated_bytes(&self) -> usize {
        self.budget.allocated()
    }
}
