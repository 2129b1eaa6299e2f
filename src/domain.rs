//! Domain models for test definitions.
//!
//! This module contains the typed tree shared by the outline and XML
//! formats, the tag vocabulary of bullet lines, and configuration.

/// Test definition tree.
pub mod node;
pub use node::{Case, Comment, Description, Group, Kind, Node, Step, TestDefinition, Unknown};

/// Bullet line tags.
pub mod tag;
pub use tag::{Tag, Tags};

mod config;
pub use config::{Config, ConfigError};
