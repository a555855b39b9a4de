//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args)                           |
//! | 3    | I/O error (read, write, rename)                      |
//! | 4    | Parse error (member JSON or config TOML)             |
//! | 5    | Name listed in two groups under `collision_policy = "fail"` |
//!
//! Malformed group blocks and unmatched members are not errors; they are
//! reported in the run summary and the exit code stays 0.

use rostermerge_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, conflicting options.
pub const EXIT_USAGE: u8 = 2;

/// File could not be read or written.
pub const EXIT_IO: u8 = 3;

/// Member collection or config file could not be parsed or failed validation.
pub const EXIT_PARSE: u8 = 4;

/// Two groups list the same person and the config forbids it.
pub const EXIT_COLLISION: u8 = 5;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::MemberParse(_) => EXIT_PARSE,
        ReconError::NameCollision { .. } => EXIT_COLLISION,
        ReconError::Serialize(_) => EXIT_ERROR,
    }
}
