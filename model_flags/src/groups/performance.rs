//! Flags tuning input pipelines, threading and numeric precision.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::thread;

use super::{GroupBuilder, help_wrap};
use crate::{FlagError, FlagRegistry, FlagResult, FlagSpec, FlagValue};

/// Numeric precision used for calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dtype {
    /// Half precision.
    Fp16,
    /// Single precision.
    #[default]
    Fp32,
}

impl Dtype {
    /// Every supported precision, in `--dtype` choice order.
    pub const ALL: [Self; 2] = [Self::Fp16, Self::Fp32];

    /// Name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fp16 => "fp16",
            Self::Fp32 => "fp32",
        }
    }

    /// Loss scale applied when `--loss_scale` is not supplied.
    #[must_use]
    pub const fn default_loss_scale(self) -> i64 {
        match self {
            Self::Fp16 => 128,
            Self::Fp32 => 1,
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dtype {
    type Err = FlagError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dtype| dtype.as_str() == raw)
            .ok_or_else(|| FlagError::InvalidValue {
                name: String::from("dtype"),
                value: raw.to_owned(),
                reason: String::from("expected one of: fp16, fp32"),
            })
    }
}

/// Selects which performance flags [`define_performance`] registers.
#[expect(
    clippy::struct_excessive_bools,
    reason = "each field toggles one optional flag"
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceFlags {
    /// `--num_parallel_calls`.
    pub num_parallel_calls: bool,
    /// `--inter_op_parallelism_threads`.
    pub inter_op: bool,
    /// `--intra_op_parallelism_threads`.
    pub intra_op: bool,
    /// `--use_synthetic_data`.
    pub synthetic_data: bool,
    /// `--max_train_steps`.
    pub max_train_steps: bool,
    /// `--dtype` and `--loss_scale`.
    pub dtype: bool,
    /// `--all_reduce_alg`.
    pub all_reduce_alg: bool,
}

impl Default for PerformanceFlags {
    fn default() -> Self {
        Self {
            num_parallel_calls: true,
            inter_op: true,
            intra_op: true,
            synthetic_data: true,
            max_train_steps: true,
            dtype: true,
            all_reduce_alg: true,
        }
    }
}

/// Registers the performance flags selected by `flags`.
///
/// `--num_parallel_calls` defaults to the available parallelism of the
/// host. `--loss_scale` must be positive when supplied.
///
/// # Errors
///
/// Propagates [`FlagError::DuplicateFlag`] when a flag already exists.
pub fn define_performance(
    registry: &mut FlagRegistry,
    flags: PerformanceFlags,
) -> FlagResult<Vec<String>> {
    let mut group = GroupBuilder::new(registry);

    if flags.num_parallel_calls {
        group.key_flag(
            FlagSpec::integer(
                "num_parallel_calls",
                help_wrap(
                    "The number of records that are processed in parallel during input \
                     processing. This can be optimized per data set but for generally \
                     homogeneous data sets, should be approximately the number of available \
                     CPU cores. (default behavior)",
                ),
            )
            .short_name("npc")
            .default_value(available_cores()),
        )?;
    }
    if flags.inter_op {
        group.key_flag(
            FlagSpec::integer(
                "inter_op_parallelism_threads",
                help_wrap("Number of inter_op_parallelism_threads to use for CPU."),
            )
            .short_name("inter")
            .default_value(0),
        )?;
    }
    if flags.intra_op {
        group.key_flag(
            FlagSpec::integer(
                "intra_op_parallelism_threads",
                help_wrap("Number of intra_op_parallelism_threads to use for CPU."),
            )
            .short_name("intra")
            .default_value(0),
        )?;
    }
    if flags.synthetic_data {
        group.key_flag(
            FlagSpec::boolean(
                "use_synthetic_data",
                help_wrap(
                    "If set, use fake data (zeroes) instead of a real dataset. This mode is \
                     useful for performance debugging, as it removes input processing steps, \
                     but will not learn anything.",
                ),
            )
            .short_name("synth")
            .default_value(false),
        )?;
    }
    if flags.max_train_steps {
        group.key_flag(
            FlagSpec::integer(
                "max_train_steps",
                help_wrap(
                    "The model will stop training if the global_step reaches this value. If \
                     not set, training will run until the specified number of epochs have \
                     run as usual. It is generally recommended to set --train_epochs=1 when \
                     using this flag.",
                ),
            )
            .short_name("mts"),
        )?;
    }
    if flags.dtype {
        group.key_flag(
            FlagSpec::enumeration(
                "dtype",
                Dtype::ALL.map(Dtype::as_str),
                help_wrap(
                    "The datatype used for calculations. Variables may be cast to a higher \
                     precision on a case-by-case basis for numerical stability.",
                ),
            )
            .short_name("dt")
            .default_value(Dtype::default()),
        )?;
        group.key_flag(
            FlagSpec::integer(
                "loss_scale",
                help_wrap(
                    "The amount to scale the loss by when the model is run. Before gradients \
                     are computed, the loss is multiplied by the loss scale, making all \
                     gradients loss_scale times larger. To adjust for this, gradients are \
                     divided by the loss scale before being applied to variables. This is \
                     mathematically equivalent to training without a loss scale, but the \
                     loss scale helps avoid some intermediate gradients from underflowing to \
                     zero. If not provided the default for fp16 is 128 and 1 for all other \
                     dtypes.",
                ),
            )
            .short_name("ls"),
        )?;
        group.registry().register_validator(
            "loss_scale",
            "loss_scale should be a positive integer.",
            |value| value.is_none_or(|scale| scale.as_int().is_some_and(|ls| ls > 0)),
        )?;
    }
    if flags.all_reduce_alg {
        group.key_flag(
            FlagSpec::string(
                "all_reduce_alg",
                help_wrap("Defines the algorithm to use for performing all-reduce."),
            )
            .short_name("ara"),
        )?;
    }

    Ok(group.finish())
}

fn available_cores() -> i64 {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .ok()
        .and_then(|cores| i64::try_from(cores).ok())
        .unwrap_or(1)
}

/// Precision selected by `--dtype`.
///
/// # Errors
///
/// Returns [`FlagError::UnknownFlag`] when `--dtype` is not defined,
/// [`FlagError::MissingRequired`] when it has no value and
/// [`FlagError::InvalidValue`] when the value names no known precision.
pub fn get_dtype(registry: &FlagRegistry) -> FlagResult<Dtype> {
    registry
        .get_str("dtype")?
        .ok_or_else(|| FlagError::MissingRequired {
            name: String::from("dtype"),
        })?
        .parse()
}

/// Loss scale in effect: `--loss_scale` when supplied, otherwise the
/// default for the selected [`Dtype`].
///
/// # Errors
///
/// Propagates the errors of [`get_dtype`] and of reading `--loss_scale`.
///
/// # Examples
///
/// ```
/// use model_flags::{FlagRegistry, PerformanceFlags, define_performance, get_loss_scale};
///
/// let mut registry = FlagRegistry::new();
/// define_performance(&mut registry, PerformanceFlags::default())?;
/// registry.parse(["train", "--dtype", "fp16"])?;
/// assert_eq!(get_loss_scale(&registry)?, 128);
/// registry.parse(["train", "--dtype", "fp16", "--ls", "8"])?;
/// assert_eq!(get_loss_scale(&registry)?, 8);
/// # Ok::<(), model_flags::FlagError>(())
/// ```
pub fn get_loss_scale(registry: &FlagRegistry) -> FlagResult<i64> {
    registry.get_int("loss_scale")?.map_or_else(
        || get_dtype(registry).map(Dtype::default_loss_scale),
        Ok,
    )
}

impl From<Dtype> for FlagValue {
    fn from(dtype: Dtype) -> Self {
        Self::String(dtype.as_str().to_owned())
    }
}
