//! Shell command definitions
//!
//! One command per input line. Blank lines and lines starting with `#` are
//! ignored.
//!
//! ```text
//! open <device> [r|w|rw]      -> fd
//! close <fd>
//! write <fd> <text...>        text is the rest of the line, spaces kept
//! read <fd> <count>
//! seek <fd> <set|cur|end> <offset>
//! trim <fd>
//! geometry <fd> [<quantum> <qset>]
//! mem
//! help
//! quit
//! ```

use std::io::SeekFrom;
use std::str::FromStr;

use crate::device::OpenMode;
use crate::error::{Result, ScullError};

/// Shell file descriptor
pub type Fd = u32;

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a device and allocate a descriptor for it
    Open { device: usize, mode: OpenMode },

    /// Release a descriptor
    Close { fd: Fd },

    /// Write the bytes of `data` at the cursor
    Write { fd: Fd, data: Vec<u8> },

    /// Read up to `count` bytes from the cursor
    Read { fd: Fd, count: usize },

    /// Move the cursor
    Seek { fd: Fd, target: SeekFrom },

    /// Free all storage of the device behind `fd`
    Trim { fd: Fd },

    /// Show, or with `set` change, quantum and qset
    Geometry { fd: Fd, set: Option<(usize, usize)> },

    /// Print the memory report for every device
    Mem,

    Help,

    Quit,
}

impl Command {
    /// Parse one input line; `Ok(None)` for blank lines and comments
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = split_word(line);
        let command = match word {
            "open" => {
                let (device, rest) = split_word(rest);
                let (mode, rest) = split_word(rest);
                expect_end(rest)?;
                Command::Open {
                    device: parse_number(device, "device")?,
                    mode: if mode.is_empty() {
                        OpenMode::ReadWrite
                    } else {
                        mode.parse()?
                    },
                }
            }
            "close" => Command::Close { fd: parse_fd_only(rest)? },
            "write" => {
                let (fd, data) = split_word(rest);
                Command::Write {
                    fd: parse_number(fd, "fd")?,
                    data: data.as_bytes().to_vec(),
                }
            }
            "read" => {
                let (fd, rest) = split_word(rest);
                let (count, rest) = split_word(rest);
                expect_end(rest)?;
                Command::Read {
                    fd: parse_number(fd, "fd")?,
                    count: parse_number(count, "count")?,
                }
            }
            "seek" => {
                let (fd, rest) = split_word(rest);
                let (whence, rest) = split_word(rest);
                let (offset, rest) = split_word(rest);
                expect_end(rest)?;
                Command::Seek {
                    fd: parse_number(fd, "fd")?,
                    target: parse_seek(whence, offset)?,
                }
            }
            "trim" => Command::Trim { fd: parse_fd_only(rest)? },
            "geometry" => {
                let (fd, rest) = split_word(rest);
                let (quantum, rest) = split_word(rest);
                let (qset, rest) = split_word(rest);
                expect_end(rest)?;
                let set = match (quantum.is_empty(), qset.is_empty()) {
                    (true, true) => None,
                    (false, false) => Some((
                        parse_number(quantum, "quantum")?,
                        parse_number(qset, "qset")?,
                    )),
                    _ => {
                        return Err(ScullError::Parse(
                            "geometry takes both quantum and qset, or neither".to_string(),
                        ))
                    }
                };
                Command::Geometry {
                    fd: parse_number(fd, "fd")?,
                    set,
                }
            }
            "mem" => {
                expect_end(rest)?;
                Command::Mem
            }
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(ScullError::Parse(format!(
                    "unknown command '{}' (try 'help')",
                    other
                )))
            }
        };

        Ok(Some(command))
    }

    /// Command keyword, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Open { .. } => "open",
            Command::Close { .. } => "close",
            Command::Write { .. } => "write",
            Command::Read { .. } => "read",
            Command::Seek { .. } => "seek",
            Command::Trim { .. } => "trim",
            Command::Geometry { .. } => "geometry",
            Command::Mem => "mem",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

// =============================================================================
// Parsing Helpers
// =============================================================================

/// Split off the first whitespace-delimited word
fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn expect_end(rest: &str) -> Result<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ScullError::Parse(format!("unexpected trailing input '{}'", rest)))
    }
}

fn parse_number<T: FromStr>(word: &str, what: &str) -> Result<T> {
    if word.is_empty() {
        return Err(ScullError::Parse(format!("missing {}", what)));
    }
    word.parse()
        .map_err(|_| ScullError::Parse(format!("invalid {} '{}'", what, word)))
}

fn parse_fd_only(rest: &str) -> Result<Fd> {
    let (fd, rest) = split_word(rest);
    expect_end(rest)?;
    parse_number(fd, "fd")
}

fn parse_seek(whence: &str, offset: &str) -> Result<SeekFrom> {
    match whence {
        "set" => Ok(SeekFrom::Start(parse_number(offset, "offset")?)),
        "cur" => Ok(SeekFrom::Current(parse_number(offset, "offset")?)),
        "end" => Ok(SeekFrom::End(parse_number(offset, "offset")?)),
        "" => Err(ScullError::Parse("missing seek origin".to_string())),
        other => Err(ScullError::Parse(format!(
            "unknown seek origin '{}' (expected set, cur or end)",
            other
        ))),
    }
}
