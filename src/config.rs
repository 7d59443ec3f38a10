//! Configuration for scull
//!
//! Centralized configuration with sensible defaults. Every value here is
//! applied to each device when the registry is built, and `quantum`/`qset`
//! are restored from it whenever a device is trimmed.

use crate::error::{Result, ScullError};
use crate::storage::Geometry;

/// Default block size in bytes
pub const DEFAULT_QUANTUM: usize = 4000;

/// Default number of blocks per segment
pub const DEFAULT_QSET: usize = 1000;

/// Default number of devices in the registry
pub const DEFAULT_DEVICE_COUNT: usize = 4;

/// Main configuration for a scull registry
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------
    /// Size of one storage block in bytes
    pub quantum: usize,

    /// Number of block slots held by one segment
    pub qset: usize,

    // -------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------
    /// Number of devices created at startup
    pub device_count: usize,

    /// Per-device ceiling on allocated bytes (blocks, slot arrays, segments).
    /// `None` leaves allocation bounded only by the host allocator.
    pub memory_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            qset: DEFAULT_QSET,
            device_count: DEFAULT_DEVICE_COUNT,
            memory_limit: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default geometry applied to every device
    pub fn geometry(&self) -> Result<Geometry> {
        Geometry::new(self.quantum, self.qset)
            .map_err(|e| ScullError::Config(e.to_string()))
    }

    /// Check that the configuration describes a usable registry
    pub fn validate(&self) -> Result<()> {
        if self.device_count == 0 {
            return Err(ScullError::Config(
                "device_count must be at least 1".to_string(),
            ));
        }
        self.geometry()?;
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the block size (in bytes)
    pub fn quantum(mut self, quantum: usize) -> Self {
        self.config.quantum = quantum;
        self
    }

    /// Set the number of blocks per segment
    pub fn qset(mut self, qset: usize) -> Self {
        self.config.qset = qset;
        self
    }

    /// Set the number of devices
    pub fn device_count(mut self, count: usize) -> Self {
        self.config.device_count = count;
        self
    }

    /// Cap the bytes each device may allocate
    pub fn memory_limit(mut self, limit: Option<usize>) -> Self {
        self.config.memory_limit = limit;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
