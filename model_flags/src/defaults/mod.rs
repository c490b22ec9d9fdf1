//! Flag defaults sourced from configuration files and the environment.
//!
//! [`DefaultsLoader`] layers TOML files and prefixed environment variables
//! with `figment`, later sources overriding earlier ones, and feeds the
//! result to [`set_defaults`](crate::set_defaults). Keys are flag names.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use tracing::debug;

use crate::{FlagError, FlagRegistry, FlagResult, FlagValue, set_defaults};

#[derive(Debug, Clone, PartialEq, Eq)]
struct DefaultsFile {
    path: Utf8PathBuf,
    required: bool,
}

/// Collects default overrides for registered flags.
///
/// # Examples
///
/// ```
/// use model_flags::{DefaultsLoader, FlagRegistry, FlagSpec};
///
/// let mut registry = FlagRegistry::new();
/// registry.define(FlagSpec::integer("batch_size", "Batch size.").default_value(32))?;
///
/// let loader = DefaultsLoader::new().optional_file("does-not-exist.toml");
/// assert_eq!(loader.apply(&mut registry)?, 0);
/// assert_eq!(registry.get_int("batch_size")?, Some(32));
/// # Ok::<(), model_flags::FlagError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultsLoader {
    files: Vec<DefaultsFile>,
    env_prefix: Option<String>,
}

impl DefaultsLoader {
    /// Creates a loader with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TOML file that must exist.
    #[must_use]
    pub fn file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.files.push(DefaultsFile {
            path: path.into(),
            required: true,
        });
        self
    }

    /// Adds a TOML file that is skipped when absent.
    #[must_use]
    pub fn optional_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.files.push(DefaultsFile {
            path: path.into(),
            required: false,
        });
        self
    }

    /// Reads variables starting with `prefix`; the remainder, lower-cased,
    /// names the flag (`MODEL_BATCH_SIZE` sets `batch_size` for prefix
    /// `MODEL_`).
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Builds the layered figment.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Config`] when a required file is missing.
    pub fn figment(&self) -> FlagResult<Figment> {
        let mut figment = Figment::new();
        for file in &self.files {
            if !file.path.is_file() {
                if file.required {
                    return Err(FlagError::from(figment::Error::from(format!(
                        "required defaults file '{}' not found",
                        file.path
                    ))));
                }
                debug!(path = %file.path, "skipping missing defaults file");
                continue;
            }
            figment = figment.merge(Toml::file_exact(&file.path));
        }
        if let Some(prefix) = &self.env_prefix {
            figment = figment.merge(Env::prefixed(prefix));
        }
        Ok(figment)
    }

    /// Reads every source into a map from flag name to default.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Config`] when a required file is missing or a
    /// source cannot be read as flat key/value pairs.
    pub fn load(&self) -> FlagResult<BTreeMap<String, FlagValue>> {
        let values: BTreeMap<String, FlagValue> = self.figment()?.extract()?;
        debug!(count = values.len(), "loaded flag defaults");
        Ok(values)
    }

    /// Loads every source and applies the result as flag defaults.
    ///
    /// Returns the number of defaults applied.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`load`](Self::load) and
    /// [`set_defaults`](crate::set_defaults); keys naming no flag fail with
    /// [`FlagError::UnknownFlag`].
    pub fn apply(&self, registry: &mut FlagRegistry) -> FlagResult<usize> {
        let values = self.load()?;
        let count = values.len();
        set_defaults(registry, values)?;
        Ok(count)
    }
}
