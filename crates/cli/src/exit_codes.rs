//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, bad count)    |
//! | 50-59   | fetch            | Page loader failures                     |

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (terminal setup, output write).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, page 0, non-positive or non-integer count.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Fetch (50-59)
// =============================================================================

/// Transport failure reaching the API.
pub const EXIT_FETCH_NETWORK: u8 = 50;

/// API answered with a non-success HTTP status.
pub const EXIT_FETCH_HTTP: u8 = 51;

/// API answered with a body that is not a page of artworks.
pub const EXIT_FETCH_PARSE: u8 = 52;

/// Map a fetch error to its exit code.
pub fn fetch_exit_code(err: &artview_core::FetchError) -> u8 {
    use artview_core::FetchError;
    match err {
        FetchError::Network(_) => EXIT_FETCH_NETWORK,
        FetchError::Http { .. } => EXIT_FETCH_HTTP,
        FetchError::Parse(_) => EXIT_FETCH_PARSE,
    }
}
