//! Flag descriptors.

use super::value::{FlagKind, FlagValue};

/// Declarative description of a flag, consumed by
/// [`FlagRegistry::define`](super::FlagRegistry::define).
///
/// # Examples
///
/// ```
/// use model_flags::{FlagKind, FlagSpec};
///
/// let spec = FlagSpec::integer("batch_size", "Batch size for training.")
///     .short_name("bs")
///     .default_value(32);
/// assert_eq!(spec.name(), "batch_size");
/// assert_eq!(spec.kind(), &FlagKind::Integer);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    name: String,
    kind: FlagKind,
    help: String,
    short_name: Option<String>,
    default: Option<FlagValue>,
}

impl FlagSpec {
    /// Creates a flag of `kind` with no default and no short name.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FlagKind, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            help: help.into(),
            short_name: None,
            default: None,
        }
    }

    /// Shorthand for a [`FlagKind::Bool`] flag.
    #[must_use]
    pub fn boolean(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Bool, help)
    }

    /// Shorthand for a [`FlagKind::Integer`] flag.
    #[must_use]
    pub fn integer(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Integer, help)
    }

    /// Shorthand for a [`FlagKind::Float`] flag.
    #[must_use]
    pub fn float(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Float, help)
    }

    /// Shorthand for a [`FlagKind::String`] flag.
    #[must_use]
    pub fn string(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, FlagKind::String, help)
    }

    /// Shorthand for a [`FlagKind::List`] flag.
    #[must_use]
    pub fn list(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, FlagKind::List, help)
    }

    /// Shorthand for a [`FlagKind::Enum`] flag.
    #[must_use]
    pub fn enumeration<I, S>(name: impl Into<String>, choices: I, help: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FlagKind::choices(choices), help)
    }

    /// Sets the abbreviation accepted as `--<short>`.
    #[must_use]
    pub fn short_name(mut self, short: impl Into<String>) -> Self {
        self.short_name = Some(short.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<FlagValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Flag name, used as `--<name>`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flag kind.
    #[must_use]
    pub const fn kind(&self) -> &FlagKind {
        &self.kind
    }

    /// Help text.
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Optional abbreviation.
    #[must_use]
    pub fn short(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    /// Declared default, before coercion.
    #[must_use]
    pub const fn declared_default(&self) -> Option<&FlagValue> {
        self.default.as_ref()
    }
}

/// A defined flag together with its parse state.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    spec: FlagSpec,
    required: bool,
    parsed: Option<FlagValue>,
}

impl Flag {
    pub(crate) const fn new(spec: FlagSpec) -> Self {
        Self {
            spec,
            required: false,
            parsed: None,
        }
    }

    /// Flag name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Flag kind.
    #[must_use]
    pub const fn kind(&self) -> &FlagKind {
        self.spec.kind()
    }

    /// Help text.
    #[must_use]
    pub fn help(&self) -> &str {
        self.spec.help()
    }

    /// Optional abbreviation.
    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.spec.short()
    }

    /// Current default.
    #[must_use]
    pub const fn default(&self) -> Option<&FlagValue> {
        self.spec.declared_default()
    }

    /// Whether the flag must hold a value after parsing.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the most recent parse supplied this flag on the command line.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.parsed.is_some()
    }

    /// Effective value: the parsed value when present, otherwise the default.
    #[must_use]
    pub fn value(&self) -> Option<&FlagValue> {
        self.parsed.as_ref().or_else(|| self.spec.declared_default())
    }

    pub(crate) fn set_default(&mut self, value: FlagValue) {
        self.spec.default = Some(value);
    }

    pub(crate) const fn mark_required(&mut self) {
        self.required = true;
    }

    pub(crate) fn set_parsed(&mut self, value: FlagValue) {
        self.parsed = Some(value);
    }

    pub(crate) fn clear_parsed(&mut self) {
        self.parsed = None;
    }
}
