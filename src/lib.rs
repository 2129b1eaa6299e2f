//! Outline test plans and XML test definitions
//!
//! Test plans are written as nested bullet outlines (suites, sets, cases and
//! steps) and stored as `testdefinition` XML documents. This crate converts
//! between the two.

pub mod domain;
pub use domain::{Case, Config, Group, Kind, Node, Step, Tag, Tags, TestDefinition};

/// Outline text parsing and emission.
pub mod outline;
pub use outline::ParseError;

/// XML storage for test definitions.
pub mod storage;
pub use storage::xml::{LoadError, SaveError};
