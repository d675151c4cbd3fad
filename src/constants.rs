//! # Constants
//!
//! Shared constants used throughout the tool.
//!
//! These values represent reasonable defaults and can be overridden via
//! command-line flags or environment variables where applicable.

/// Default IAM path for uploaded server certificates
pub const DEFAULT_CERTIFICATE_PATH: &str = "/";

/// IAM is a global service; signing still needs a region when none resolves
pub const DEFAULT_REGION: &str = "us-east-1";

/// Session name used when assuming a role before the run
pub const ASSUME_ROLE_SESSION_NAME: &str = "iam-cert";

/// Maximum length of a server certificate name
pub const MAX_CERTIFICATE_NAME_LEN: usize = 128;

/// Maximum length of a server certificate path
pub const MAX_CERTIFICATE_PATH_LEN: usize = 512;

/// Number of hex characters of the body fingerprint written to logs
pub const FINGERPRINT_LOG_LEN: usize = 16;

/// Default global log level
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Default log format (text, json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Process exit codes reported by the CLI
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const INVALID_PARAMETERS: u8 = 2;
    pub const CONFLICT: u8 = 3;
    pub const DUPLICATE_CONTENT: u8 = 4;
    pub const REMOTE_SERVICE: u8 = 5;
    pub const MISSING_CREDENTIALS: u8 = 6;
}
