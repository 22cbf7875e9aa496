//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (unspecified)                      |
//! | 2    | Usage error (bad arguments, bad delimiter)       |
//! | 3    | Records file missing, unreadable or malformed    |
//! | 4    | Intent file missing or invalid                   |
//! | 5    | Output could not be written                      |
//!
//! An unanswered question is not an error: `ask` exits 0 with the
//! fallback answer.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid delimiter spec.
pub const EXIT_USAGE: u8 = 2;

/// The records CSV could not be opened, decoded or parsed.
pub const EXIT_DATA: u8 = 3;

/// The intent override file could not be read or failed validation.
pub const EXIT_INTENTS: u8 = 4;

/// Writing export/settings output failed.
pub const EXIT_WRITE: u8 = 5;
