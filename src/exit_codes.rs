//! Exit code constants for the mlrelease CLI.
//!
//! CI steps only distinguish "go" from "stop":
//! - 0: Success, including acceptable no-ops (nothing to bump, nothing to deploy)
//! - 1: Usage error or hard failure (failed gate, failed API call, failed deployment)

/// Successful execution or acceptable no-op.
pub const SUCCESS: i32 = 0;

/// Usage error or hard failure.
pub const FAILURE: i32 = 1;
