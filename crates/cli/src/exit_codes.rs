//! CLI Exit Code Registry
//!
//! Single source of truth for `tsrecon` exit codes. Scripts and CI jobs
//! branch on these, so they are part of the shell contract.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success; for `run`, every trade matched perfectly  |
//! | 1    | General error (unspecified)                        |
//! | 2    | Usage error (bad arguments or flag values)         |
//! | 3    | Reconciliation finished with mismatches            |
//! | 4    | Invalid settings file                              |
//! | 5    | Term sheet or booking file could not be loaded     |
//! | 6    | Report could not be written                        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above

/// Success - command completed; `run` found no mismatches.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or out-of-range flag values.
pub const EXIT_USAGE: u8 = 2;

/// At least one reconciled trade is not a perfect match.
/// Like `diff(1)`, a completed comparison that found differences.
pub const EXIT_MISMATCHES: u8 = 3;

/// Settings file missing (when named explicitly), malformed or invalid.
pub const EXIT_SETTINGS: u8 = 4;

/// Term sheet or booking file missing, unreadable or malformed.
pub const EXIT_LOAD: u8 = 5;

/// Report directory or file could not be written.
pub const EXIT_REPORT: u8 = 6;
