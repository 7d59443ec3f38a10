//! Device Registry
//!
//! The fixed set of devices created at startup.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, ScullError};

use super::dev::Device;
use super::handle::{Handle, OpenMode};
use super::lock::CancelToken;
use super::report::DeviceReport;

/// Fixed-size table of devices, addressed by index
///
/// Devices are created once in [`Registry::new`] and live until the registry
/// is dropped, which frees all of their storage. Share it with `Arc`.
pub struct Registry {
    config: Config,
    devices: Vec<Arc<Device>>,
}

impl Registry {
    /// Create `config.device_count` empty devices with the configured geometry
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let geometry = config.geometry()?;

        let devices = (0..config.device_count)
            .map(|index| Arc::new(Device::new(index, geometry, config.memory_limit)))
            .collect();

        tracing::debug!(
            devices = config.device_count,
            quantum = config.quantum,
            qset = config.qset,
            "registry initialized"
        );

        Ok(Self { config, devices })
    }

    /// Look up a device by index
    pub fn device(&self, index: usize) -> Result<&Arc<Device>> {
        self.devices.get(index).ok_or(ScullError::InvalidHandle {
            index,
            count: self.devices.len(),
        })
    }

    /// Open device `index`
    ///
    /// `OpenMode::WriteOnly` trims the device before returning.
    pub fn open(&self, index: usize, mode: OpenMode) -> Result<Handle> {
        Handle::open(Arc::clone(self.device(index)?), mode, None)
    }

    /// Open device `index` with lock waits interruptible by `cancel`
    pub fn open_with_cancel(
        &self,
        index: usize,
        mode: OpenMode,
        cancel: CancelToken,
    ) -> Result<Handle> {
        Handle::open(Arc::clone(self.device(index)?), mode, Some(cancel))
    }

    /// Allocation snapshot of every device, in index order
    pub fn report(&self) -> Result<Vec<DeviceReport>> {
        self.devices.iter().map(|device| device.report(None)).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn devices(&self) -> impl Iterator<Item = &Arc<Device>> {
        self.devices.iter()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
