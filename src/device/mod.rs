//! Device Module
//!
//! Devices, their handles and the registry that owns them.
//!
//! ## Responsibilities
//! - One interruptible lock per device around its storage engine
//! - Open/release/trim semantics (write-only open truncates)
//! - Per-handle cursor and seek
//! - Fixed registry of devices addressed by index
//!
//! ## Concurrency Model
//! Every read, write, trim and report holds the device lock for the whole
//! call. Different devices have different locks and never block each other.
//! A lock wait ends early with `Interrupted` when the handle's
//! [`CancelToken`] fires.

mod dev;
mod handle;
mod lock;
mod registry;
mod report;

pub use dev::Device;
pub use handle::{Handle, OpenMode};
pub use lock::{CancelToken, InterruptibleMutex, LockGuard};
pub use registry::Registry;
pub use report::{DeviceReport, SegmentReport};
