//! Flags specific to image models.

use super::{GroupBuilder, help_wrap};
use crate::{FlagRegistry, FlagResult, FlagSpec};

/// Layouts accepted by `--data_format`.
pub const DATA_FORMATS: [&str; 2] = ["channels_first", "channels_last"];

/// Selects which image flags [`define_image`] registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFlags {
    /// `--data_format`.
    pub data_format: bool,
}

impl Default for ImageFlags {
    fn default() -> Self {
        Self { data_format: true }
    }
}

/// Registers the image flags selected by `flags`.
///
/// `--data_format` has no default; models pick a layout themselves when it
/// is left unset.
///
/// # Errors
///
/// Propagates [`FlagError::DuplicateFlag`](crate::FlagError::DuplicateFlag)
/// when a flag already exists.
pub fn define_image(registry: &mut FlagRegistry, flags: ImageFlags) -> FlagResult<Vec<String>> {
    let mut group = GroupBuilder::new(registry);
    if flags.data_format {
        group.key_flag(
            FlagSpec::enumeration(
                "data_format",
                DATA_FORMATS,
                help_wrap(
                    "A flag to override the data format used in the model. channels_first \
                     provides a performance boost on GPU but is not always compatible with \
                     CPU. If left unspecified, the data format will be chosen automatically \
                     based on the available hardware.",
                ),
            )
            .short_name("df"),
        )?;
    }
    Ok(group.finish())
}
