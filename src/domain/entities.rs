//! Domain entities: kinds of documented code constructs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Tag describing what a documented entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Package,
    Module,
    Class,
    Other,
}

impl EntityKind {
    /// Stable tag used in the serialized tree.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Package => "package",
            EntityKind::Module => "module",
            EntityKind::Class => "class",
            EntityKind::Other => "other",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "package" => Ok(EntityKind::Package),
            "module" => Ok(EntityKind::Module),
            "class" => Ok(EntityKind::Class),
            "other" => Ok(EntityKind::Other),
            other => Err(DomainError::UnknownKind(other.to_string())),
        }
    }
}
