//! Reusable command-line flag groups for model training entry points.
//!
//! The crate keeps a [`FlagRegistry`] of typed flags, parses argv into it with
//! `clap`, and ships ready-made flag groups (base, benchmark, performance,
//! image and a worked example) that entry points combine.
//!
//! Registration functions are usually reachable from several call sites, and
//! defining a flag twice is an error. [`CallOnce`] and
//! [`call_only_once!`] make such functions run their body at most once per
//! process.
//!
//! ```
//! use model_flags::{
//!     BaseFlags, FlagRegistry, adopt_core_key_flags, define_base, set_defaults,
//!     try_parse_flags_from,
//! };
//!
//! let mut registry = FlagRegistry::new();
//! define_base(&mut registry, BaseFlags::default())?;
//! adopt_core_key_flags(&mut registry)?;
//! set_defaults(&mut registry, [("batch_size", 64), ("train_epochs", 10)])?;
//! try_parse_flags_from(&mut registry, ["train", "--bs", "128"])?;
//! assert_eq!(registry.get_int("batch_size")?, Some(128));
//! assert_eq!(registry.get_int("train_epochs")?, Some(10));
//! # Ok::<(), model_flags::FlagError>(())
//! ```

mod core_flags;
mod defaults;
mod error;
pub mod groups;
mod once;
mod registry;

pub use core_flags::{
    CORE_MODULE, adopt_core_key_flags, define_base, define_benchmark, define_example,
    define_image, define_in_core, define_performance, get_dtype, get_loss_scale, help_wrap,
    parse_flags, parse_flags_from, set_defaults, to_choices_str, try_parse_flags,
    try_parse_flags_from,
};
pub use defaults::DefaultsLoader;
pub use error::{FlagError, FlagResult, is_display_request, write_parse_failure};
pub use groups::{BaseFlags, BenchmarkFlags, Dtype, ExampleFlags, ImageFlags, PerformanceFlags};
pub use once::{CallOnce, OnceClaim, OnceGuard, SkippedCall};
pub use registry::{
    Flag, FlagKind, FlagRegistry, FlagSnapshot, FlagSpec, FlagValue, HELPFULL_FLAG, MAIN_MODULE,
};
