//! Error types produced by the flag registry and its helpers.

mod conversions;
mod helpers;
mod types;

pub use helpers::{is_display_request, write_parse_failure};
pub use types::{FlagError, FlagResult};

#[cfg(test)]
mod tests;
