/// `testdefinition` XML serialization.
pub mod xml;

pub use xml::{LoadError, SaveError, XmlOptions};
