//! Device
//!
//! One independently addressable unit: a storage engine behind its own
//! interruptible lock.

use crate::error::Result;
use crate::storage::{Geometry, Storage};
use crate::uaccess::{UserSink, UserSource};

use super::lock::{CancelToken, InterruptibleMutex, LockGuard};
use super::report::{DeviceReport, SegmentReport};

/// A single scull device
///
/// Every operation, including a trim triggered by opening for write, takes
/// the device lock for its whole duration. Operations on different devices
/// never contend.
pub struct Device {
    /// Position in the registry
    index: usize,

    /// Segment chain, size and geometry; only touched under the lock
    storage: InterruptibleMutex<Storage>,
}

impl Device {
    /// Create an empty device with the given default geometry
    pub fn new(index: usize, geometry: Geometry, memory_limit: Option<usize>) -> Self {
        Self {
            index,
            storage: InterruptibleMutex::new(Storage::new(geometry, memory_limit)),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Lock the device storage
    ///
    /// Blocks while another operation holds it; returns `Interrupted` if
    /// `cancel` fires first.
    pub fn lock(&self, cancel: Option<&CancelToken>) -> Result<LockGuard<'_, Storage>> {
        self.storage.lock(cancel)
    }

    /// Read at an explicit offset (see [`Storage::read`])
    pub fn read_at<B: UserSink + ?Sized>(
        &self,
        offset: u64,
        dst: &mut B,
        cancel: Option<&CancelToken>,
    ) -> Result<usize> {
        let storage = self.lock(cancel)?;
        let count = storage.read(offset, dst)?;
        tracing::trace!(device = self.index, offset, count, "read");
        Ok(count)
    }

    /// Write at an explicit offset (see [`Storage::write`])
    pub fn write_at<B: UserSource + ?Sized>(
        &self,
        offset: u64,
        src: &B,
        cancel: Option<&CancelToken>,
    ) -> Result<usize> {
        let mut storage = self.lock(cancel)?;
        let count = storage.write(offset, src)?;
        tracing::trace!(device = self.index, offset, count, size = storage.size(), "write");
        Ok(count)
    }

    /// Free all storage and restore the default geometry
    pub fn trim(&self, cancel: Option<&CancelToken>) -> Result<()> {
        let mut storage = self.lock(cancel)?;
        storage.trim();
        tracing::debug!(device = self.index, "device trimmed");
        Ok(())
    }

    /// Current logical size in bytes
    pub fn size(&self, cancel: Option<&CancelToken>) -> Result<u64> {
        Ok(self.lock(cancel)?.size())
    }

    pub fn geometry(&self, cancel: Option<&CancelToken>) -> Result<Geometry> {
        Ok(self.lock(cancel)?.geometry())
    }

    /// Change quantum/qset; fails with `Busy` unless the device is empty
    pub fn set_geometry(&self, geometry: Geometry, cancel: Option<&CancelToken>) -> Result<()> {
        self.lock(cancel)?.set_geometry(geometry)?;
        tracing::debug!(
            device = self.index,
            quantum = geometry.quantum(),
            qset = geometry.qset(),
            "geometry changed"
        );
        Ok(())
    }

    /// Snapshot of the device's allocation state
    pub fn report(&self, cancel: Option<&CancelToken>) -> Result<DeviceReport> {
        let storage = self.lock(cancel)?;
        let geometry = storage.geometry();

        let segments = storage
            .segments()
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.has_slots())
            .map(|(position, segment)| SegmentReport {
                position,
                slots: segment.occupied_slots().collect(),
            })
            .collect();

        Ok(DeviceReport {
            index: self.index,
            quantum: geometry.quantum(),
            qset: geometry.qset(),
            size: storage.size(),
            segment_count: storage.segment_count(),
            block_count: storage.block_count(),
            allocated_bytes: storage.allocated_bytes(),
            segments,
        })
    }
}
