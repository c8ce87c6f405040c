//! Documentation build helpers.
//!
//! - [`domain::EntityNode`]: nested hierarchy of documented entities with
//!   `classes()` and `json()` views for template rendering
//! - [`logging::ColorLogFormatter`]: severity-colored log lines, installable
//!   on a `tracing-subscriber` pipeline via [`logging::ColorEventFormat`]
//!
//! The `autodoc` binary scans a project directory into an entity tree and
//! prints it as a tree or as JSON.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod logging;
pub mod util;
