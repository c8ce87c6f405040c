//! Domain layer: the documented entity hierarchy
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod node;

pub use entities::EntityKind;
pub use error::{DomainError, DomainResult};
pub use node::{EntityIter, EntityNode};
