//! Storage Module
//!
//! The storage-addressing engine behind every device.
//!
//! ## Responsibilities
//! - Translate a linear byte offset into (segment, slot, in-block offset)
//! - Grow the segment chain and allocate blocks lazily on write
//! - Serve reads from a read-only walk that never allocates
//! - Free the whole chain on trim
//!
//! ## Layout
//! ```text
//!  chain position:   0                    1                    2
//!                ┌──────────┐        ┌──────────┐        ┌──────────┐
//!   Segment      │ slots[Q] │ ─────▶ │ slots[Q] │ ─────▶ │   None   │
//!                └──┬──┬────┘        └──┬───────┘        └──────────┘
//!                   │  │                │
//!                   ▼  ▼                ▼
//!   Block         [q] [q]              [q]         (absent slot = hole)
//! ```
//!
//! One segment covers `quantum * qset` bytes. The chain is an arena indexed
//! by position, so "next" is simply the following element.

mod budget;
mod geometry;
mod segment;
mod engine;

pub use geometry::{Geometry, Position};
pub use segment::{Block, Segment};
pub use engine::Storage;
