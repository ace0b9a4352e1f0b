//! Infrastructure adapters and runtime bootstrap.

pub mod content_file;
pub mod error;
pub mod http;
pub mod store;
pub mod telemetry;
