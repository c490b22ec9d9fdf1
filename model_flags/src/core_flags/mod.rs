//! Entry-point helpers: defaults, re-parsing and core-declared flag groups.
//!
//! Key flags are declared for [`CORE_MODULE`] rather than for the module that
//! defines them, so an entry point can make every group it registered show
//! up in `--help` with a single
//! [`adopt_module_key_flags`](FlagRegistry::adopt_module_key_flags) call (or
//! [`adopt_core_key_flags`]).

use std::ffi::OsString;
use std::{env, io, process};

use tracing::error;

use crate::groups::{self, BaseFlags, BenchmarkFlags, ExampleFlags, ImageFlags, PerformanceFlags};
use crate::{
    FlagError, FlagRegistry, FlagResult, FlagValue, MAIN_MODULE, is_display_request,
    write_parse_failure,
};

pub use crate::groups::{get_dtype, get_loss_scale, help_wrap, to_choices_str};

/// Module under which [`define_in_core`] declares key flags.
pub const CORE_MODULE: &str = "model_flags::core";

/// Sets the default of each named flag.
///
/// Pairs are applied in order and application stops at the first error;
/// flags not named keep their defaults.
///
/// # Errors
///
/// Returns [`FlagError::UnknownFlag`] or [`FlagError::InvalidValue`] from
/// [`FlagRegistry::set_default`].
///
/// # Examples
///
/// ```
/// use model_flags::{FlagRegistry, FlagSpec, set_defaults};
///
/// let mut registry = FlagRegistry::new();
/// registry.define(FlagSpec::integer("batch_size", "Batch size.").default_value(64))?;
/// registry.define(FlagSpec::integer("epochs", "Epochs.").default_value(1))?;
/// set_defaults(&mut registry, [("batch_size", 32), ("epochs", 10)])?;
/// assert_eq!(registry.get_int("epochs")?, Some(10));
/// # Ok::<(), model_flags::FlagError>(())
/// ```
pub fn set_defaults<I, K, V>(registry: &mut FlagRegistry, defaults: I) -> FlagResult<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<FlagValue>,
{
    for (name, value) in defaults {
        registry.set_default(name.as_ref(), value)?;
    }
    Ok(())
}

/// Forgets previously parsed values, then parses `argv`.
///
/// `argv` starts with the program name.
///
/// # Errors
///
/// Propagates every error of [`FlagRegistry::parse`], including `--help`
/// display requests.
pub fn try_parse_flags_from<I, T>(registry: &mut FlagRegistry, argv: I) -> FlagResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    registry.unparse();
    registry.parse(argv)
}

/// [`try_parse_flags_from`] over the process arguments.
///
/// # Errors
///
/// As for [`try_parse_flags_from`].
pub fn try_parse_flags(registry: &mut FlagRegistry) -> FlagResult<()> {
    try_parse_flags_from(registry, env::args_os())
}

/// Re-parses the process arguments, exiting on failure.
///
/// See [`parse_flags_from`].
pub fn parse_flags(registry: &mut FlagRegistry) {
    parse_flags_from(registry, env::args_os());
}

/// Forgets previously parsed values and parses `argv`, exiting on failure.
///
/// `--help` and `--helpfull` print the help text and exit with status 0.
/// Any other failure writes
///
/// ```text
/// FATAL Flags parsing error: <error>
/// Pass -h or --helpfull to see help on flags.
/// ```
///
/// to standard error and exits with status 1.
pub fn parse_flags_from<I, T>(registry: &mut FlagRegistry, argv: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    if let Err(err) = try_parse_flags_from(registry, argv) {
        exit_on_parse_failure(&err);
    }
}

fn exit_on_parse_failure(err: &FlagError) -> ! {
    if let FlagError::CliParsing(clap_err) = err
        && is_display_request(clap_err)
    {
        clap_err.exit();
    }
    if let Err(io_err) = write_parse_failure(&mut io::stderr().lock(), err) {
        error!(error = %io_err, "failed to report flag parsing error");
    }
    process::exit(1)
}

/// Runs a group definition, then declares its key flags for [`CORE_MODULE`].
///
/// Declaration happens only after `define` succeeded, so a failed
/// definition declares nothing. Returns the key flags.
///
/// # Errors
///
/// Propagates errors from `define` and
/// [`FlagError::UnknownFlag`] for key flags that were never defined.
///
/// # Examples
///
/// ```
/// use model_flags::{CORE_MODULE, FlagRegistry, FlagResult, FlagSpec, define_in_core};
///
/// fn define_steps(registry: &mut FlagRegistry, default: i64) -> FlagResult<Vec<String>> {
///     registry.define(FlagSpec::integer("steps", "Steps.").default_value(default))?;
///     Ok(vec![String::from("steps")])
/// }
///
/// let mut registry = FlagRegistry::new();
/// define_in_core(&mut registry, define_steps, 100)?;
/// assert_eq!(registry.key_flags(CORE_MODULE), ["steps"]);
/// # Ok::<(), model_flags::FlagError>(())
/// ```
pub fn define_in_core<F, O>(
    registry: &mut FlagRegistry,
    define: F,
    options: O,
) -> FlagResult<Vec<String>>
where
    F: FnOnce(&mut FlagRegistry, O) -> FlagResult<Vec<String>>,
{
    let key_flags = define(registry, options)?;
    for name in &key_flags {
        registry.declare_key_flag(name, CORE_MODULE)?;
    }
    Ok(key_flags)
}

/// Makes every key flag declared for [`CORE_MODULE`] key for
/// [`MAIN_MODULE`], so `--help` lists them.
///
/// # Errors
///
/// Propagates [`FlagError::UnknownFlag`] from
/// [`FlagRegistry::adopt_module_key_flags`].
pub fn adopt_core_key_flags(registry: &mut FlagRegistry) -> FlagResult<()> {
    registry.adopt_module_key_flags(CORE_MODULE, MAIN_MODULE)
}

/// [`groups::define_base`] with its key flags declared in core.
///
/// # Errors
///
/// As for [`define_in_core`].
pub fn define_base(registry: &mut FlagRegistry, flags: BaseFlags) -> FlagResult<Vec<String>> {
    define_in_core(registry, groups::define_base, flags)
}

/// [`groups::define_benchmark`] with its key flags declared in core.
///
/// # Errors
///
/// As for [`define_in_core`].
pub fn define_benchmark(
    registry: &mut FlagRegistry,
    flags: BenchmarkFlags,
) -> FlagResult<Vec<String>> {
    define_in_core(registry, groups::define_benchmark, flags)
}

/// [`groups::define_example`] with its key flags declared in core.
///
/// # Errors
///
/// As for [`define_in_core`].
pub fn define_example(registry: &mut FlagRegistry, flags: ExampleFlags) -> FlagResult<Vec<String>> {
    define_in_core(registry, groups::define_example, flags)
}

/// [`groups::define_image`] with its key flags declared in core.
///
/// # Errors
///
/// As for [`define_in_core`].
pub fn define_image(registry: &mut FlagRegistry, flags: ImageFlags) -> FlagResult<Vec<String>> {
    define_in_core(registry, groups::define_image, flags)
}

/// [`groups::define_performance`] with its key flags declared in core.
///
/// # Errors
///
/// As for [`define_in_core`].
pub fn define_performance(
    registry: &mut FlagRegistry,
    flags: PerformanceFlags,
) -> FlagResult<Vec<String>> {
    define_in_core(registry, groups::define_performance, flags)
}

#[cfg(test)]
mod tests;
