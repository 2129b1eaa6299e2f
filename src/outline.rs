//! Outline notation for test definitions
//!
//! An outline is a list of lines. Bullets (`*`, `**`, `***`, `****`) open a
//! suite, set, case or step; plain lines following a bullet describe it, and
//! `#` lines are comments:
//!
//! ```text
//! * Suite1
//! ** Set1
//! *** Case1                                            :AUTO:
//!     Some description.
//! **** Press the button
//! # reviewed
//! ```

pub mod emitter;
mod line;
pub mod parser;

pub use emitter::{EmitOptions, emit, emit_lines, to_string};
pub use parser::{ParseError, Parser, parse, parse_lines};
