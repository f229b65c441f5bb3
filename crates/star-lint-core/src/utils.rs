//! Utility functions for rule implementations.

pub mod noqa;
pub mod paths;

#[doc(inline)]
pub use noqa::{check_noqa, NoqaDirective};
#[doc(inline)]
pub use paths::base_file_name;
