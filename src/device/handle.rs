//! Open device handle
//!
//! A handle binds a caller to one device and carries the caller's cursor,
//! like an open file description.

use std::fmt;
use std::io::SeekFrom;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, ScullError};
use crate::storage::Geometry;
use crate::uaccess::{UserSink, UserSource};

use super::dev::Device;
use super::lock::CancelToken;
use super::report::DeviceReport;

/// Access mode requested at open
///
/// The mode only decides whether the open truncates; handles are not
/// restricted to reading or writing by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    /// Exclusive write: the device is trimmed before the handle is returned
    WriteOnly,
    ReadWrite,
}

impl OpenMode {
    /// Whether opening in this mode truncates the device
    pub fn truncates(&self) -> bool {
        matches!(self, OpenMode::WriteOnly)
    }
}

impl FromStr for OpenMode {
    type Err = ScullError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "r" => Ok(OpenMode::ReadOnly),
            "w" => Ok(OpenMode::WriteOnly),
            "rw" => Ok(OpenMode::ReadWrite),
            other => Err(ScullError::Parse(format!(
                "unknown open mode '{}' (expected r, w or rw)",
                other
            ))),
        }
    }
}

/// An open device
///
/// Reads and writes move at most one block per call and advance the cursor
/// by the count they return. Errors leave the cursor where it was.
pub struct Handle {
    device: Arc<Device>,

    /// Only decides truncation at open; reads and writes are not checked
    /// against it
    mode: OpenMode,

    /// Byte offset of the next read or write
    pos: u64,

    /// Signal that interrupts this handle's lock waits
    cancel: Option<CancelToken>,
}

impl Handle {
    /// Bind a handle to `device`, trimming it first for an exclusive write
    pub(crate) fn open(
        device: Arc<Device>,
        mode: OpenMode,
        cancel: Option<CancelToken>,
    ) -> Result<Self> {
        if mode.truncates() {
            device.trim(cancel.as_ref())?;
        }
        tracing::debug!(device = device.index(), ?mode, "device opened");

        Ok(Self {
            device,
            mode,
            pos: 0,
            cancel,
        })
    }

    /// Read from the cursor into `dst`; 0 means end of data or a hole
    pub fn read<B: UserSink + ?Sized>(&mut self, dst: &mut B) -> Result<usize> {
        let count = self.device.read_at(self.pos, dst, self.cancel.as_ref())?;
        self.pos += count as u64;
        Ok(count)
    }

    /// Write `src` at the cursor; stores at most the rest of the current block
    pub fn write<B: UserSource + ?Sized>(&mut self, src: &B) -> Result<usize> {
        let count = self.device.write_at(self.pos, src, self.cancel.as_ref())?;
        self.pos += count as u64;
        Ok(count)
    }

    /// Move the cursor; `End` is relative to the device size
    ///
    /// Positions past the end are allowed. A negative or overflowing target
    /// fails with `InvalidArgument` and leaves the cursor unchanged.
    pub fn seek(&mut self, target: SeekFrom) -> Result<u64> {
        let (base, delta) = match target {
            SeekFrom::Start(offset) => (offset, 0),
            SeekFrom::Current(delta) => (self.pos, delta),
            SeekFrom::End(delta) => (self.device.size(self.cancel.as_ref())?, delta),
        };

        let pos = base.checked_add_signed(delta).ok_or_else(|| {
            ScullError::InvalidArgument(format!("seek to {} {:+} is out of range", base, delta))
        })?;
        self.pos = pos;
        Ok(pos)
    }

    /// Free all device storage; the cursor is left alone
    pub fn trim(&mut self) -> Result<()> {
        self.device.trim(self.cancel.as_ref())
    }

    /// Current device geometry
    pub fn geometry(&self) -> Result<Geometry> {
        self.device.geometry(self.cancel.as_ref())
    }

    /// Change the device geometry; the device must be empty
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<()> {
        self.device.set_geometry(geometry, self.cancel.as_ref())
    }

    /// Current device size
    pub fn size(&self) -> Result<u64> {
        self.device.size(self.cancel.as_ref())
    }

    pub fn report(&self) -> Result<DeviceReport> {
        self.device.report(self.cancel.as_ref())
    }

    /// Close the handle; device storage is not touched
    pub fn release(self) {
        tracing::debug!(device = self.device.index(), mode = ?self.mode, "device released");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn device_index(&self) -> usize {
        self.device.index()
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    pub fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }

    /// Replace the signal that interrupts this handle's lock waits
    pub fn set_cancel_token(&mut self, cancel: Option<CancelToken>) {
        self.cancel = cancel;
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("device", &self.device.index())
            .field("mode", &self.mode)
            .field("pos", &self.pos)
            .finish()
    }
}
