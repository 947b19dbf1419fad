use std::path::Path;

use super::{StoreError, write_file};

/// Stored best score; a missing or unreadable file counts as 0
pub fn load_highscore(path: &Path) -> u32 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|text| text.trim().parse().ok())
        .unwrap_or(0)
}

pub fn save_highscore(path: &Path, score: u32) -> Result<(), StoreError> {
    write_file(path, &score.to_string())
}
