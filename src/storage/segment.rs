//! Segment and Block
//!
//! A segment owns a lazily allocated array of `qset` block slots. Each slot
//! is empty until the first write lands in its region.

use std::mem::size_of;

use crate::error::{Result, ScullError};

use super::budget::MemoryBudget;
use super::Geometry;

/// One `quantum`-byte storage block
pub type Block = Box<[u8]>;

/// A node of the storage chain
#[derive(Debug, Default)]
pub struct Segment {
    /// Block slots; `None` until a write first targets this segment
    slots: Option<Vec<Option<Block>>>,
}

impl Segment {
    /// Bytes charged against the budget for the segment node itself
    pub const NODE_COST: usize = size_of::<Segment>();

    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes charged for a slot array of `qset` entries
    pub fn slots_cost(qset: usize) -> usize {
        qset.saturating_mul(size_of::<Option<Block>>())
    }

    /// Whether the block slot array has been allocated
    pub fn has_slots(&self) -> bool {
        self.slots.is_some()
    }

    /// Read-only lookup of the block at `slot`
    pub fn block(&self, slot: usize) -> Option<&[u8]> {
        self.slots.as_ref()?.get(slot)?.as_deref()
    }

    /// Number of allocated blocks in this segment
    pub fn block_count(&self) -> usize {
        self.slots
            .as_ref()
            .map(|slots| slots.iter().filter(|b| b.is_some()).count())
            .unwrap_or(0)
    }

    /// Slot indices that currently hold a block, in order
    pub fn occupied_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .flat_map(|slots| slots.iter().enumerate())
            .filter_map(|(i, b)| b.as_ref().map(|_| i))
    }

    /// Return the block at `slot`, allocating the slot array and the block
    /// itself if either is missing.
    ///
    /// A slot array allocated here stays attached even if the block
    /// allocation that follows fails.
    pub(crate) fn block_or_allocate(
        &mut self,
        slot: usize,
        geometry: Geometry,
        budget: &mut MemoryBudget,
    ) -> Result<&mut [u8]> {
        let slots = match self.slots.take() {
            Some(slots) => slots,
            None => {
                let cost = Self::slots_cost(geometry.qset());
                budget.charge(cost, "block array")?;
                allocate_slots(geometry.qset()).map_err(|e| {
                    budget.refund(cost);
                    e
                })?
            }
        };
        let slots = self.slots.insert(slots);

        let qset = slots.len();
        let cell = slots.get_mut(slot).ok_or_else(|| {
            ScullError::InvalidArgument(format!("slot {} outside qset {}", slot, qset))
        })?;

        let block = match cell.take() {
            Some(block) => block,
            None => {
                let quantum = geometry.quantum();
                budget.charge(quantum, "block")?;
                let block = allocate_block(quantum).map_err(|e| {
                    budget.refund(quantum);
                    e
                })?;
                tracing::trace!(slot, quantum, "allocated block");
                block
            }
        };

        Ok(&mut cell.insert(block)[..])
    }
}

/// Allocate a zeroed block without aborting on allocator failure
fn allocate_block(quantum: usize) -> Result<Block> {
    let mut data = Vec::new();
    data.try_reserve_exact(quantum).map_err(|e| {
        ScullError::OutOfMemory(format!("block of {} bytes: {}", quantum, e))
    })?;
    data.resize(quantum, 0);
    Ok(data.into_boxed_slice())
}

/// Allocate an all-empty slot array without aborting on allocator failure
fn allocate_slots(qset: usize) -> Result<Vec<Option<Block>>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(qset).map_err(|e| {
        ScullError::OutOfMemory(format!("block array of {} slots: {}", qset, e))
    })?;
    slots.resize_with(qset, || None);
    Ok(slots)
}
