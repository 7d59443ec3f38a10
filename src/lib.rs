//! # scull
//!
//! An in-memory, block-oriented character device emulator with:
//! - Sparse storage grown lazily in fixed-size blocks
//! - A fixed registry of independent devices
//! - Per-device mutual exclusion with interruptible lock waits
//! - A line-oriented shell for driving devices by hand
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Registry                              │
//! │               (fixed devices, by index)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ open(index, mode) → Handle (cursor)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Device                               │
//! │          (interruptible lock around the storage)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!                ┌─────────────┐      ┌─────────┐
//!                │   Storage   │ ───▶ │ Segment │ ───▶ Segment ───▶ …
//!                │  (engine)   │      └────┬────┘
//!                └─────────────┘           ▼
//!                                   Block  Block  (hole)  …
//! ```
//!
//! ## Example
//!
//! ```
//! use scull::{Config, OpenMode, Registry};
//!
//! let registry = Registry::new(Config::builder().quantum(4).qset(2).build()).unwrap();
//! let mut handle = registry.open(0, OpenMode::ReadWrite).unwrap();
//!
//! // A single call never crosses a block boundary.
//! assert_eq!(handle.write(b"ABCDEF").unwrap(), 4);
//! assert_eq!(handle.size().unwrap(), 4);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod uaccess;
pub mod storage;
pub mod device;
pub mod shell;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ScullError, Result};
pub use config::Config;
pub use device::{CancelToken, Device, Handle, OpenMode, Registry};
pub use storage::Geometry;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of scull
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
