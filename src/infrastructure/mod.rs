//! Infrastructure layer: filesystem scanning
//!
//! This layer turns a project directory into an entity tree.

pub mod error;
pub mod scanner;

pub use error::{InfraError, InfraResult};
pub use scanner::{scan_directory, ScanOptions};
