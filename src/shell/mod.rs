//! Shell Module
//!
//! Line-oriented command language for poking at devices by hand or from a
//! script.
//!
//! ## Architecture
//! - `command`: parse one line into a [`Command`]
//! - `session`: own open descriptors, execute commands against a
//!   [`Registry`](crate::device::Registry)
//! - `response`: printable outcome of a command
//!
//! `write` and `read` loop over single-block calls until the request is
//! satisfied or a call moves zero bytes, so a read stops at the first hole.

mod command;
mod response;
mod session;

pub use command::{Command, Fd};
pub use response::{Response, Status};
pub use session::{Session, HELP};
