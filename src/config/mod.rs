//! # Configuration
//!
//! - `tool`: process-level settings from environment variables
//! - `connection`: AWS connection context
//! - `params`: the declarative certificate parameter set

pub mod connection;
pub mod params;
pub mod tool;

pub use connection::ConnectionConfig;
pub use params::CertificateParams;
pub use tool::ToolConfig;
