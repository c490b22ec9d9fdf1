//! Reusable flag groups.
//!
//! Each `define_*` function registers one group of related flags and returns
//! the names of the flags it considers *key*. The functions here only define
//! flags; the wrappers re-exported at the crate root additionally declare the
//! returned key flags for [`CORE_MODULE`](crate::CORE_MODULE) so entry points
//! can adopt them in one call.
//!
//! Every group takes an options struct whose fields select which optional
//! flags are defined. All fields default to `true`.

mod base;
mod benchmark;
mod conventions;
mod example;
mod image;
mod performance;

pub use base::{BaseFlags, define_base};
pub use benchmark::{BENCHMARK_LOGGERS, BenchmarkFlags, define_benchmark};
pub use conventions::{HELP_WIDTH, INDENT_MARKER, help_wrap, to_choices_str};
pub use example::{ExampleFlags, bar_choices, define_example};
pub use image::{DATA_FORMATS, ImageFlags, define_image};
pub use performance::{Dtype, PerformanceFlags, define_performance, get_dtype, get_loss_scale};

use crate::{FlagRegistry, FlagResult, FlagSpec};

/// Defines flags into a registry while recording them as key flags.
pub(crate) struct GroupBuilder<'r> {
    registry: &'r mut FlagRegistry,
    key_flags: Vec<String>,
}

impl<'r> GroupBuilder<'r> {
    pub(crate) const fn new(registry: &'r mut FlagRegistry) -> Self {
        Self {
            registry,
            key_flags: Vec::new(),
        }
    }

    /// Defines `spec` and records it as a key flag of the group.
    pub(crate) fn key_flag(&mut self, spec: FlagSpec) -> FlagResult<()> {
        let name = spec.name().to_owned();
        self.registry.define(spec)?;
        self.key_flags.push(name);
        Ok(())
    }

    pub(crate) const fn registry(&mut self) -> &mut FlagRegistry {
        self.registry
    }

    pub(crate) fn finish(self) -> Vec<String> {
        self.key_flags
    }
}
