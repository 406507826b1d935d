//! Save-game encoding
//!
//! A save is two bytes: a format byte followed by the highest level reached.

use std::path::{Path, PathBuf};

/// Format byte of the current save encoding
pub const SAVE_FORMAT: u8 = 0x01;

/// Local progress file name inside the files directory
pub const PROGRESS_FILE: &str = "progress.dat";

/// Save-game errors
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Failed to read or write the progress file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The host has not provided a files directory
    #[error("Save directory not available")]
    NoSaveDirectory,

    /// Data was written by an unknown encoding
    #[error("Wrong save format byte: {0:#04x}")]
    WrongFormat(u8),

    /// Data is shorter than an encoded level
    #[error("Save data truncated: {0} bytes")]
    Truncated(usize),
}

/// Encode a level
///
/// Levels above 255 saturate.
pub fn encode_level(level: u32) -> [u8; 2] {
    [SAVE_FORMAT, level.min(u8::MAX as u32) as u8]
}

/// Decode a level
pub fn decode_level(data: &[u8]) -> Result<u32, SaveError> {
    match data {
        [SAVE_FORMAT, level, ..] => Ok(u32::from(*level)),
        [format, _, ..] => Err(SaveError::WrongFormat(*format)),
        _ => Err(SaveError::Truncated(data.len())),
    }
}

/// Pick the level to keep when local and remote saves disagree
///
/// The higher level wins; negative values count as zero.
pub fn resolve_conflict(local: i32, remote: i32) -> u32 {
    local.max(remote).max(0) as u32
}

/// Path of the local progress file
pub fn progress_path(files_dir: &Path) -> PathBuf {
    files_dir.join(PROGRESS_FILE)
}

/// Write a level to the local progress file
pub fn write_progress(files_dir: &Path, level: u32) -> Result<(), SaveError> {
    std::fs::create_dir_all(files_dir)?;
    std::fs::write(progress_path(files_dir), encode_level(level))?;
    Ok(())
}

/// Read the local progress file
///
/// # Returns
/// `Ok(None)` if no progress has been saved yet
pub fn read_progress(files_dir: &Path) -> Result<Option<u32>, SaveError> {
    match std::fs::read(progress_path(files_dir)) {
        Ok(data) => decode_level(&data).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
