//! Corewar Log Reader
//!
//! Turns the text output of a Corewar VM into typed race events.
//! Only two statement shapes matter to the race:
//!
//! ```text
//! The player 1(alice) is alive.
//! The player 1(alice) has won.
//! ```
//!
//! Every other line is ignored. Lines are trimmed and blank lines dropped
//! when the log is loaded, so the reader only ever hands out meaningful text.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Pattern for "The player N(NAME) is alive."
const ALIVE_PATTERN: &str = r"^The player \d+\(([^)]+)\) is alive\.";
/// Pattern for "The player N(NAME) has won."
const WON_PATTERN: &str = r"^The player \d+\(([^)]+)\) has won\.";

/// A race event recognised in one log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// The named contender reported a live instruction.
    Alive(String),
    /// The named contender won the match.
    Won(String),
}

impl LogEvent {
    /// Name of the contender this event refers to.
    pub fn name(&self) -> &str {
        match self {
            LogEvent::Alive(name) | LogEvent::Won(name) => name,
        }
    }
}

fn alive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ALIVE_PATTERN).expect("alive pattern is valid"))
}

fn won_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(WON_PATTERN).expect("won pattern is valid"))
}

/// Parse a single log line.
///
/// Returns `None` for anything that is not an alive or win statement,
/// including blank lines. The contender name is returned verbatim.
pub fn parse_line(line: &str) -> Option<LogEvent> {
    if let Some(caps) = alive_regex().captures(line) {
        return Some(LogEvent::Alive(caps[1].to_string()));
    }
    if let Some(caps) = won_regex().captures(line) {
        return Some(LogEvent::Won(caps[1].to_string()));
    }
    None
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors raised while loading a log file.
#[derive(Debug)]
pub enum LogFileError {
    /// The path does not point at a regular file.
    NotFound(PathBuf),
    /// The file exists but could not be read (includes invalid UTF-8).
    Io(std::io::Error),
}

impl std::fmt::Display for LogFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFileError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            LogFileError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for LogFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogFileError::NotFound(_) => None,
            LogFileError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LogFileError {
    fn from(e: std::io::Error) -> Self {
        LogFileError::Io(e)
    }
}

// ============================================================================
// READER
// ============================================================================

/// Sequential cursor over the non-blank lines of a log.
#[derive(Debug, Clone, Default)]
pub struct LogReader {
    lines: Vec<String>,
    cursor: usize,
}

impl LogReader {
    /// Build a reader from in-memory log text.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Build a reader from an iterator of raw lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self { lines, cursor: 0 }
    }

    /// Load a UTF-8 log file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogFileError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LogFileError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    /// Hand out the next retained line, or `None` at end of log.
    pub fn next_line(&mut self) -> Option<&str> {
        let line = self.lines.get(self.cursor)?;
        self.cursor += 1;
        Some(line.as_str())
    }

    /// Number of lines handed out so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    /// Number of lines not yet handed out.
    pub fn remaining(&self) -> usize {
        self.lines.len() - self.cursor
    }

    /// Total number of retained (non-blank) lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alive() {
        assert_eq!(
            parse_line("The player 1(alice) is alive."),
            Some(LogEvent::Alive("alice".to_string()))
        );
    }

    #[test]
    fn test_parse_won() {
        assert_eq!(
            parse_line("The player 3(zork) has won."),
            Some(LogEvent::Won("zork".to_string()))
        );
    }

    #[test]
    fn test_name_taken_verbatim() {
        // Spaces and punctuation inside the parentheses are preserved
        assert_eq!(
            parse_line("The player 12( Big Bot v2.0 ) is alive."),
            Some(LogEvent::Alive(" Big Bot v2.0 ".to_string()))
        );
    }

    #[test]
    fn test_multi_digit_player_number() {
        assert_eq!(
            parse_line("The player 42(x) has won."),
            Some(LogEvent::Won("x".to_string()))
        );
    }

    #[test]
    fn test_anchored_at_line_start() {
        assert_eq!(parse_line("> The player 1(alice) is alive."), None);
        assert_eq!(parse_line(" The player 1(alice) is alive."), None);
    }

    #[test]
    fn test_trailing_text_still_matches() {
        assert_eq!(
            parse_line("The player 1(alice) is alive. (cycle 1536)"),
            Some(LogEvent::Alive("alice".to_string()))
        );
    }

    #[test]
    fn test_unrecognised_lines() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("Warning: low cycles"), None);
        assert_eq!(parse_line("The player (alice) is alive."), None);
        assert_eq!(parse_line("The player 1() is alive."), None);
        assert_eq!(parse_line("The player 1(alice) is dead."), None);
        assert_eq!(parse_line("The player 1(alice) is alive"), None);
    }

    #[test]
    fn test_event_name() {
        assert_eq!(LogEvent::Alive("a".into()).name(), "a");
        assert_eq!(LogEvent::Won("b".into()).name(), "b");
    }

    #[test]
    fn test_reader_skips_blank_lines_and_trims() {
        let mut reader = LogReader::from_text("  first  \n\n   \n\tsecond\n");
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.next_line(), Some("first"));
        assert_eq!(reader.next_line(), Some("second"));
        assert_eq!(reader.next_line(), None);
        assert_eq!(reader.consumed(), 2);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_empty() {
        let mut reader = LogReader::from_text("");
        assert!(reader.is_empty());
        assert_eq!(reader.next_line(), None);
        assert_eq!(reader.consumed(), 0);
    }

    #[test]
    fn test_open_missing_file() {
        let path = std::env::temp_dir().join("corewar_marbles_definitely_missing.log");
        let _ = std::fs::remove_file(&path);
        match LogReader::open(&path) {
            Err(LogFileError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_open_directory_is_not_found() {
        let dir = std::env::temp_dir();
        assert!(matches!(LogReader::open(&dir), Err(LogFileError::NotFound(_))));
    }

    #[test]
    fn test_open_reads_file() {
        let dir = std::env::temp_dir().join("corewar_marbles_log_reader_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("match.log");
        std::fs::write(&path, "The player 1(a) is alive.\n\nThe player 1(a) has won.\n").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.next_line(), Some("The player 1(a) is alive."));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_open_rejects_invalid_utf8() {
        let dir = std::env::temp_dir().join("corewar_marbles_log_reader_utf8");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("bad.log");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        assert!(matches!(LogReader::open(&path), Err(LogFileError::Io(_))));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_not_found_message() {
        let err = LogFileError::NotFound(PathBuf::from("nope.log"));
        assert_eq!(err.to_string(), "File not found: nope.log");
    }
}
