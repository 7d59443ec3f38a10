//! Tests for shell command parsing
//!
//! These tests verify:
//! - Every command form parses to the right variant
//! - Blank lines and comments are skipped
//! - Malformed input yields parse errors

use std::io::SeekFrom;

use scull::shell::Command;
use scull::{OpenMode, ScullError};

// =============================================================================
// Helper Functions
// =============================================================================

fn parse(line: &str) -> Command {
    Command::parse(line).unwrap().unwrap()
}

fn parse_err(line: &str) -> ScullError {
    Command::parse(line).unwrap_err()
}

// =============================================================================
// Valid Commands
// =============================================================================

#[test]
fn test_parse_open_default_mode() {
    assert_eq!(
        parse("open 2"),
        Command::Open {
            device: 2,
            mode: OpenMode::ReadWrite
        }
    );
}

#[test]
fn test_parse_open_with_mode() {
    assert_eq!(
        parse("open 0 w"),
        Command::Open {
            device: 0,
            mode: OpenMode::WriteOnly
        }
    );
    assert_eq!(
        parse("  open   1   r  "),
        Command::Open {
            device: 1,
            mode: OpenMode::ReadOnly
        }
    );
}

#[test]
fn test_parse_write_keeps_inner_spaces() {
    assert_eq!(
        parse("write 3 hello  big world"),
        Command::Write {
            fd: 3,
            data: b"hello  big world".to_vec()
        }
    );
}

#[test]
fn test_parse_read() {
    assert_eq!(parse("read 3 10"), Command::Read { fd: 3, count: 10 });
}

#[test]
fn test_parse_seek() {
    assert_eq!(
        parse("seek 3 set 8"),
        Command::Seek {
            fd: 3,
            target: SeekFrom::Start(8)
        }
    );
    assert_eq!(
        parse("seek 3 cur -2"),
        Command::Seek {
            fd: 3,
            target: SeekFrom::Current(-2)
        }
    );
    assert_eq!(
        parse("seek 3 end 0"),
        Command::Seek {
            fd: 3,
            target: SeekFrom::End(0)
        }
    );
}

#[test]
fn test_parse_geometry() {
    assert_eq!(parse("geometry 4"), Command::Geometry { fd: 4, set: None });
    assert_eq!(
        parse("geometry 4 16 8"),
        Command::Geometry {
            fd: 4,
            set: Some((16, 8))
        }
    );
}

#[test]
fn test_parse_simple_commands() {
    assert_eq!(parse("close 3"), Command::Close { fd: 3 });
    assert_eq!(parse("trim 3"), Command::Trim { fd: 3 });
    assert_eq!(parse("mem"), Command::Mem);
    assert_eq!(parse("help"), Command::Help);
    assert_eq!(parse("quit"), Command::Quit);
    assert_eq!(parse("exit"), Command::Quit);
}

#[test]
fn test_blank_and_comment_lines() {
    assert_eq!(Command::parse("").unwrap(), None);
    assert_eq!(Command::parse("   ").unwrap(), None);
    assert_eq!(Command::parse("# open 0").unwrap(), None);
}

#[test]
fn test_command_names() {
    assert_eq!(parse("read 3 1").name(), "read");
    assert_eq!(parse("mem").name(), "mem");
}

// =============================================================================
// Malformed Commands
// =============================================================================

#[test]
fn test_unknown_command() {
    assert!(matches!(parse_err("format 0"), ScullError::Parse(_)));
}

#[test]
fn test_missing_arguments() {
    assert!(matches!(parse_err("open"), ScullError::Parse(_)));
    assert!(matches!(parse_err("read 3"), ScullError::Parse(_)));
    assert!(matches!(parse_err("seek 3 set"), ScullError::Parse(_)));
    assert!(matches!(parse_err("seek 3"), ScullError::Parse(_)));
}

#[test]
fn test_invalid_numbers() {
    assert!(matches!(parse_err("open zero"), ScullError::Parse(_)));
    assert!(matches!(parse_err("read 3 -1"), ScullError::Parse(_)));
    assert!(matches!(parse_err("seek 3 set -1"), ScullError::Parse(_)));
}

#[test]
fn test_bad_mode_and_origin() {
    assert!(matches!(parse_err("open 0 a"), ScullError::Parse(_)));
    assert!(matches!(parse_err("seek 3 middle 4"), ScullError::Parse(_)));
}

#[test]
fn test_trailing_input_rejected() {
    assert!(matches!(parse_err("close 3 4"), ScullError::Parse(_)));
    assert!(matches!(parse_err("mem now"), ScullError::Parse(_)));
}

#[test]
fn test_geometry_needs_both_values() {
    assert!(matches!(parse_err("geometry 3 16"), ScullError::Parse(_)));
}
