//! Concrete file parts recognized by the layout loader.
mod file;
mod variable;

pub use file::{FileReference, companion_extensions};
pub use variable::{ModelVariable, VARIABLE_CATEGORY};
