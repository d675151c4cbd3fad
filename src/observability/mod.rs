//! # Observability
//!
//! - `logging`: tracing subscriber configured from `ToolConfig`

pub mod logging;

pub use logging::init_tracing;
