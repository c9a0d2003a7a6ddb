use std::path::PathBuf;

/// Errors the control surface can report back to a command's caller (§7).
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("commands must be exactly one byte, got {0}")]
    InvalidCommandLength(usize),

    #[error("unrecognized command byte {0:#04x}")]
    UnknownCommand(u8),

    #[error("failed to open rule file {path}: {source}")]
    RuleFileIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    LogFileIo {
        path: PathBuf,
        source: std::io::Error,
    },
}
