//! Flags every training entry point shares.

use super::{GroupBuilder, help_wrap};
use crate::{FlagRegistry, FlagResult, FlagSpec};

/// Selects which base flags [`define_base`] registers.
#[expect(
    clippy::struct_excessive_bools,
    reason = "each field toggles one optional flag"
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseFlags {
    /// `--data_dir`.
    pub data_dir: bool,
    /// `--model_dir`.
    pub model_dir: bool,
    /// `--clean`.
    pub clean: bool,
    /// `--train_epochs`.
    pub train_epochs: bool,
    /// `--epochs_between_evals`.
    pub epochs_between_evals: bool,
    /// `--stop_threshold`.
    pub stop_threshold: bool,
    /// `--batch_size`.
    pub batch_size: bool,
    /// `--num_gpus`.
    pub num_gpus: bool,
    /// `--hooks`.
    pub hooks: bool,
    /// `--export_dir`.
    pub export_dir: bool,
}

impl Default for BaseFlags {
    fn default() -> Self {
        Self {
            data_dir: true,
            model_dir: true,
            clean: true,
            train_epochs: true,
            epochs_between_evals: true,
            stop_threshold: true,
            batch_size: true,
            num_gpus: true,
            hooks: true,
            export_dir: true,
        }
    }
}

/// Registers the base flags selected by `flags`.
///
/// Every defined flag is key.
///
/// # Errors
///
/// Propagates [`FlagError::DuplicateFlag`](crate::FlagError::DuplicateFlag)
/// when a flag already exists.
pub fn define_base(registry: &mut FlagRegistry, flags: BaseFlags) -> FlagResult<Vec<String>> {
    let mut group = GroupBuilder::new(registry);

    if flags.data_dir {
        group.key_flag(
            FlagSpec::string("data_dir", help_wrap("The location of the input data."))
                .short_name("dd")
                .default_value("/tmp"),
        )?;
    }
    if flags.model_dir {
        group.key_flag(
            FlagSpec::string(
                "model_dir",
                help_wrap("The location of the model checkpoint files."),
            )
            .short_name("md")
            .default_value("/tmp"),
        )?;
    }
    if flags.clean {
        group.key_flag(
            FlagSpec::boolean(
                "clean",
                help_wrap("If set, model_dir will be removed if it exists."),
            )
            .default_value(false),
        )?;
    }
    if flags.train_epochs {
        group.key_flag(
            FlagSpec::integer("train_epochs", help_wrap("The number of epochs used to train."))
                .short_name("te")
                .default_value(1),
        )?;
    }
    if flags.epochs_between_evals {
        group.key_flag(
            FlagSpec::integer(
                "epochs_between_evals",
                help_wrap("The number of training epochs to run between evaluations."),
            )
            .short_name("ebe")
            .default_value(1),
        )?;
    }
    if flags.stop_threshold {
        group.key_flag(
            FlagSpec::float(
                "stop_threshold",
                help_wrap(
                    "If passed, training will stop at the earlier of train_epochs and when \
                     the evaluation metric is greater than or equal to stop_threshold.",
                ),
            )
            .short_name("st"),
        )?;
    }
    if flags.batch_size {
        group.key_flag(
            FlagSpec::integer(
                "batch_size",
                help_wrap("Batch size for training and evaluation."),
            )
            .short_name("bs")
            .default_value(32),
        )?;
    }
    if flags.num_gpus {
        group.key_flag(
            FlagSpec::integer(
                "num_gpus",
                help_wrap("How many GPUs to use with the DistributionStrategies API."),
            )
            .short_name("ng")
            .default_value(0),
        )?;
    }
    if flags.hooks {
        group.key_flag(
            FlagSpec::list(
                "hooks",
                help_wrap(
                    "A list of (case insensitive) strings to specify the names of training \
                     hooks.\n\u{feff}  Example: `--hooks ProfilerHook,ExamplesPerSecondHook`",
                ),
            )
            .short_name("hk")
            .default_value("LoggingTensorHook"),
        )?;
    }
    if flags.export_dir {
        group.key_flag(
            FlagSpec::string(
                "export_dir",
                help_wrap(
                    "If set, a SavedModel serialization of the model will be exported to \
                     this directory at the end of training.",
                ),
            )
            .short_name("ed"),
        )?;
    }

    Ok(group.finish())
}
