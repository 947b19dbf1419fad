//! Append-only leaderboard log
//!
//! Every finished game appends one comma-separated record:
//!
//! ```text
//! score,profile,seed,cols,rows,wrap,speed,preset,name,timestamp
//! ```
//!
//! The log is never rewritten. Loading parses each record on its own, skips
//! the ones that do not parse, ranks the rest and keeps a bounded view.

use std::fs::OpenOptions;
use std::io::Write as IoWrite;
use std::path::Path;

use tracing::{debug, info};

use super::StoreError;
use crate::game::Session;

/// Entries kept in a loaded view; the file itself is not truncated
pub const VIEW_LIMIT: usize = 2000;

const FIELD_COUNT: usize = 10;

/// One finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub score: u32,
    pub profile: u32,
    pub seed: u32,
    pub cols: u32,
    pub rows: u32,
    pub wrap: bool,
    /// Starting tick interval in milliseconds
    pub speed: u32,
    pub preset: u32,
    pub name: String,
    /// Unix time in seconds
    pub timestamp: u64,
}

impl LeaderboardEntry {
    /// Summarize a finished session
    pub fn from_session(session: &Session, name: &str, timestamp: u64) -> Self {
        let config = &session.config;
        Self {
            score: session.score,
            profile: config.profile,
            seed: config.seed,
            cols: config.cols,
            rows: config.rows,
            wrap: config.wrap,
            speed: config.speed_ms,
            preset: config.preset,
            name: sanitize_name(name),
            timestamp,
        }
    }

    /// Record line, without the trailing newline
    pub fn to_record(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            self.score,
            self.profile,
            self.seed,
            self.cols,
            self.rows,
            u8::from(self.wrap),
            self.speed,
            self.preset,
            sanitize_name(&self.name),
            self.timestamp
        )
    }

    /// Parse one record; `None` on a wrong field count or a non-numeric field.
    ///
    /// The name field is not quoted, so a name containing a comma shifts the
    /// fields after it and the record is rejected.
    pub fn parse_record(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if fields.len() != FIELD_COUNT {
            return None;
        }
        Some(Self {
            score: fields[0].trim().parse().ok()?,
            profile: fields[1].trim().parse().ok()?,
            seed: fields[2].trim().parse().ok()?,
            cols: fields[3].trim().parse().ok()?,
            rows: fields[4].trim().parse().ok()?,
            wrap: fields[5].trim().parse::<i32>().ok()? != 0,
            speed: fields[6].trim().parse().ok()?,
            preset: fields[7].trim().parse().ok()?,
            name: fields[8].to_string(),
            timestamp: fields[9].trim().parse().ok()?,
        })
    }
}

/// Names are written unquoted, so separators are replaced before writing
fn sanitize_name(name: &str) -> String {
    name.replace([',', '\n', '\r'], " ")
}

/// Ranked view of the log: score descending, earlier finish first on ties,
/// capped at [`VIEW_LIMIT`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    /// Records that failed to parse
    pub skipped: usize,
}

impl Leaderboard {
    /// Build the ranked view from raw log bytes. Names are free text, so a
    /// record that is not valid UTF-8 is decoded lossily and parsed like any
    /// other; it never affects the records around it.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut entries = Vec::new();
        let mut skipped = 0;

        for raw in bytes.split(|b| *b == b'\n') {
            let line = String::from_utf8_lossy(raw);
            if line.trim().is_empty() {
                continue;
            }
            match LeaderboardEntry::parse_record(&line) {
                Some(entry) => entries.push(entry),
                None => {
                    skipped += 1;
                    debug!(record = %line, "skipping malformed leaderboard record");
                }
            }
        }

        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.timestamp.cmp(&b.timestamp)));
        entries.truncate(VIEW_LIMIT);

        Self { entries, skipped }
    }

    /// Load the log at `path`; a missing file is an empty leaderboard
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read(path) {
            Ok(bytes) => {
                let board = Self::from_bytes(&bytes);
                debug!(
                    path = %path.display(),
                    entries = board.entries.len(),
                    skipped = board.skipped,
                    "loaded leaderboard"
                );
                Ok(board)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Append one record to the log, creating it (and its directory) if needed
pub fn append_entry(path: &Path, entry: &LeaderboardEntry) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    writeln!(file, "{}", entry.to_record()).map_err(|e| StoreError::io(path, e))?;

    info!(score = entry.score, profile = entry.profile, "appended leaderboard entry");
    Ok(())
}
