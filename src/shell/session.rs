//! Shell session
//!
//! Holds the open descriptors of one shell and routes commands to them.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;

use crate::device::{Handle, Registry};
use crate::error::{Result, ScullError};
use crate::storage::Geometry;

use super::command::{Command, Fd};
use super::response::Response;

/// Text printed for `help`
pub const HELP: &str = "\
commands:
  open <device> [r|w|rw]           open a device (w truncates), prints fd
  close <fd>                       release a descriptor
  write <fd> <text>                write text at the cursor
  read <fd> <count>                read up to count bytes from the cursor
  seek <fd> <set|cur|end> <n>      move the cursor
  trim <fd>                        free all storage of the device
  geometry <fd> [<quantum> <qset>] show or change block geometry
  mem                              memory report for every device
  quit                             leave the shell";

/// An interactive session over a shared registry
pub struct Session {
    registry: Arc<Registry>,

    /// Open descriptors
    handles: BTreeMap<Fd, Handle>,

    next_fd: Fd,
}

impl Session {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            handles: BTreeMap::new(),
            next_fd: 3,
        }
    }

    /// Execute a command and return a response
    pub fn execute(&mut self, command: Command) -> Response {
        tracing::trace!(command = command.name(), "executing");
        match self.dispatch(command) {
            Ok(message) => Response::ok(message),
            Err(e) => {
                tracing::debug!(error = %e, "command failed");
                Response::error(&e.to_string())
            }
        }
    }

    /// Run commands from `input` until it ends or `quit` is read, printing
    /// one response per command to `output`
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let response = match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command),
                Ok(None) => continue,
                Err(e) => Response::error(&e.to_string()),
            };
            writeln!(output, "{}", response)?;
        }
        output.flush()?;
        Ok(())
    }

    /// Run a script file (see [`Session::run`])
    pub fn run_path<W: Write>(&mut self, path: &Path, output: W) -> Result<()> {
        let file = File::open(path)?;
        self.run(BufReader::new(file), output)
    }

    /// Number of open descriptors
    pub fn open_handles(&self) -> usize {
        self.handles.len()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    // =========================================================================
    // Command Handlers
    // =========================================================================

    fn dispatch(&mut self, command: Command) -> Result<Option<String>> {
        match command {
            Command::Open { device, mode } => {
                let handle = self.registry.open(device, mode)?;
                let fd = self.next_fd;
                self.next_fd += 1;
                self.handles.insert(fd, handle);
                Ok(Some(format!("fd {}", fd)))
            }
            Command::Close { fd } => {
                let handle = self.handles.remove(&fd).ok_or_else(|| bad_fd(fd))?;
                handle.release();
                Ok(None)
            }
            Command::Write { fd, data } => {
                let handle = self.handle_mut(fd)?;
                let mut written = 0;
                while written < data.len() {
                    let count = match handle.write(&data[written..]) {
                        Ok(count) => count,
                        // a short write still reports what was stored
                        Err(e) if written > 0 => {
                            tracing::debug!(error = %e, written, "write stopped early");
                            break;
                        }
                        Err(e) => return Err(e),
                    };
                    if count == 0 {
                        break;
                    }
                    written += count;
                }
                Ok(Some(format!("wrote {} bytes", written)))
            }
            Command::Read { fd, count } => {
                let handle = self.handle_mut(fd)?;
                // Buffer one block at a time; `count` is only an upper bound.
                let chunk = handle.geometry()?.quantum().min(count);
                let mut buf = vec![0u8; chunk];
                let mut data = Vec::new();
                while data.len() < count {
                    let wanted = chunk.min(count - data.len());
                    let n = match handle.read(&mut buf[..wanted]) {
                        Ok(n) => n,
                        Err(e) if !data.is_empty() => {
                            tracing::debug!(error = %e, read = data.len(), "read stopped early");
                            break;
                        }
                        Err(e) => return Err(e),
                    };
                    if n == 0 {
                        break;
                    }
                    data.extend_from_slice(&buf[..n]);
                }
                let text = String::from_utf8_lossy(&data);
                Ok(Some(format!("{} bytes: {:?}", data.len(), text)))
            }
            Command::Seek { fd, target } => {
                let pos = self.handle_mut(fd)?.seek(target)?;
                Ok(Some(format!("position {}", pos)))
            }
            Command::Trim { fd } => {
                self.handle_mut(fd)?.trim()?;
                Ok(None)
            }
            Command::Geometry { fd, set } => {
                let handle = self.handle_mut(fd)?;
                if let Some((quantum, qset)) = set {
                    handle.set_geometry(Geometry::new(quantum, qset)?)?;
                }
                let geometry = handle.geometry()?;
                Ok(Some(format!(
                    "quantum {}, qset {}",
                    geometry.quantum(),
                    geometry.qset()
                )))
            }
            Command::Mem => {
                let lines: Vec<String> = self
                    .registry
                    .report()?
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                Ok(Some(lines.join("\n")))
            }
            Command::Help => Ok(Some(HELP.to_string())),
            Command::Quit => Ok(None),
        }
    }

    fn handle_mut(&mut self, fd: Fd) -> Result<&mut Handle> {
        self.handles.get_mut(&fd).ok_or_else(|| bad_fd(fd))
    }
}

fn bad_fd(fd: Fd) -> ScullError {
    ScullError::InvalidArgument(format!("bad file descriptor {}", fd))
}
