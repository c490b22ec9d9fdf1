//! The flag registry: definitions, defaults, key flags and parsed values.
//!
//! [`FlagRegistry`] is the store every flag group registers into. Parsing is
//! delegated to `clap`; the registry keeps the definitions, tracks which
//! flags are *key* for a module (and therefore shown by `--help`), runs
//! validators after each parse and answers typed lookups.
//!
//! A process-wide instance is available through [`FlagRegistry::global`].
//!
//! # Examples
//!
//! ```
//! use model_flags::{FlagRegistry, FlagSpec};
//!
//! let mut registry = FlagRegistry::new();
//! registry.define(FlagSpec::integer("epochs", "Epochs to train.").default_value(1))?;
//! registry.parse(["train", "--epochs", "10"])?;
//! assert_eq!(registry.get_int("epochs")?, Some(10));
//! # Ok::<(), model_flags::FlagError>(())
//! ```

mod command;
mod flag;
mod validate;
mod value;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::sync::LazyLock;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{FlagError, FlagResult};

pub use command::HELPFULL_FLAG;
pub use flag::{Flag, FlagSpec};
pub use validate::FlagSnapshot;
pub use value::{FlagKind, FlagValue};

use validate::Validator;

/// Module whose key flags are shown by `--help`.
///
/// Entry points chain the flags they care about into this module with
/// [`FlagRegistry::adopt_module_key_flags`].
pub const MAIN_MODULE: &str = "main";

const RESERVED_NAMES: &[&str] = &["help", "h", HELPFULL_FLAG];
const DEFAULT_PROGRAM: &str = "model";

static GLOBAL: LazyLock<Mutex<FlagRegistry>> = LazyLock::new(|| Mutex::new(FlagRegistry::new()));

/// Store of defined flags and their current values.
#[derive(Debug, Default)]
pub struct FlagRegistry {
    flags: BTreeMap<String, Flag>,
    order: Vec<String>,
    aliases: BTreeMap<String, String>,
    key_flags: BTreeMap<String, Vec<String>>,
    validators: Vec<Validator>,
    positional: Vec<String>,
    parsed: bool,
}

impl FlagRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use model_flags::FlagRegistry;
    ///
    /// let registry = FlagRegistry::global().lock();
    /// let _ = registry.len();
    /// ```
    #[must_use]
    pub fn global() -> &'static Mutex<Self> {
        &GLOBAL
    }

    /// Defines a new flag.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::DuplicateFlag`] when the name or short name is
    /// already taken, and [`FlagError::InvalidValue`] when the declared
    /// default does not fit the flag's kind.
    pub fn define(&mut self, spec: FlagSpec) -> FlagResult<()> {
        let name = spec.name().to_owned();
        if name.is_empty() {
            return Err(FlagError::Definition(String::from(
                "flag names must not be empty",
            )));
        }
        self.ensure_available(&name)?;
        if matches!(spec.kind(), FlagKind::Bool) {
            self.ensure_available(&command::negation_id(&name))?;
        }
        if let Some(short) = spec.short() {
            if short == name {
                return Err(FlagError::DuplicateFlag { name });
            }
            self.ensure_available(short)?;
        }

        let default = spec
            .declared_default()
            .cloned()
            .map(|value| coerce_for(&name, spec.kind(), value))
            .transpose()?;
        let short = spec.short().map(str::to_owned);
        let mut flag = Flag::new(spec);
        if let Some(value) = default {
            flag.set_default(value);
        }

        debug!(flag = %name, kind = flag.kind().describe(), "defined flag");
        if let Some(alias) = short {
            self.aliases.insert(alias, name.clone());
        }
        self.order.push(name.clone());
        self.flags.insert(name, flag);
        Ok(())
    }

    fn ensure_available(&self, candidate: &str) -> FlagResult<()> {
        let taken = RESERVED_NAMES.contains(&candidate)
            || self.flags.contains_key(candidate)
            || self.aliases.contains_key(candidate)
            || self.flags.values().any(|flag| {
                matches!(flag.kind(), FlagKind::Bool)
                    && command::negation_id(flag.name()) == candidate
            });
        if taken {
            Err(FlagError::DuplicateFlag {
                name: candidate.to_owned(),
            })
        } else {
            Ok(())
        }
    }

    /// Replaces the default of an existing flag.
    ///
    /// Flags not supplied on the command line immediately report the new
    /// default as their value.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] for undefined names and
    /// [`FlagError::InvalidValue`] when `value` does not fit the flag.
    pub fn set_default(&mut self, name: &str, value: impl Into<FlagValue>) -> FlagResult<()> {
        let flag = self.flag_mut(name)?;
        let coerced = coerce_for(name, flag.kind(), value.into())?;
        debug!(flag = %name, default = %coerced, "updated flag default");
        flag.set_default(coerced);
        Ok(())
    }

    /// Marks `name` as a key flag of `module`.
    ///
    /// Declaring the same flag twice for a module is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] when `name` is not defined.
    pub fn declare_key_flag(&mut self, name: &str, module: &str) -> FlagResult<()> {
        self.flag(name)?;
        let keys = self.key_flags.entry(module.to_owned()).or_default();
        if !keys.iter().any(|existing| existing == name) {
            debug!(flag = %name, module, "declared key flag");
            keys.push(name.to_owned());
        }
        Ok(())
    }

    /// Key flags declared for `module`, in declaration order.
    #[must_use]
    pub fn key_flags(&self, module: &str) -> &[String] {
        self.key_flags
            .get(module)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Declares every key flag of `from` as a key flag of `into`.
    ///
    /// # Errors
    ///
    /// Propagates [`FlagError::UnknownFlag`] from
    /// [`declare_key_flag`](Self::declare_key_flag).
    pub fn adopt_module_key_flags(&mut self, from: &str, into: &str) -> FlagResult<()> {
        let adopted = self.key_flags(from).to_vec();
        for name in &adopted {
            self.declare_key_flag(name, into)?;
        }
        Ok(())
    }

    /// Requires `name` to hold a value after every parse.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] when `name` is not defined.
    pub fn mark_required(&mut self, name: &str) -> FlagResult<()> {
        self.flag_mut(name)?.mark_required();
        Ok(())
    }

    /// Registers a check on a single flag's effective value.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] when `name` is not defined.
    pub fn register_validator<F>(
        &mut self,
        name: &str,
        message: impl Into<String>,
        check: F,
    ) -> FlagResult<()>
    where
        F: Fn(Option<&FlagValue>) -> bool + Send + Sync + 'static,
    {
        let key = name.to_owned();
        self.register_multi_validator([name], message, move |snapshot| {
            check(snapshot.get(&key).and_then(Option::as_ref))
        })
    }

    /// Registers a check across several flags.
    ///
    /// The check receives a [`FlagSnapshot`] containing exactly `names`.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] when any name is not defined.
    pub fn register_multi_validator<I, S, F>(
        &mut self,
        names: I,
        message: impl Into<String>,
        check: F,
    ) -> FlagResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&FlagSnapshot) -> bool + Send + Sync + 'static,
    {
        let flags: Vec<String> = names.into_iter().map(Into::into).collect();
        for name in &flags {
            self.flag(name)?;
        }
        self.validators
            .push(Validator::new(flags, message.into(), Box::new(check)));
        Ok(())
    }

    /// Forgets every parsed value; flags revert to their defaults.
    pub fn unparse(&mut self) {
        for flag in self.flags.values_mut() {
            flag.clear_parsed();
        }
        self.positional.clear();
        self.parsed = false;
    }

    /// Parses `argv`, whose first element is the program name.
    ///
    /// Flags may be written `--name`, `-name`, `--name=value` or
    /// `-name=value`, using either the flag name or its short name. Supplied
    /// values are stored, then required flags and validators are checked. A
    /// failed parse leaves every flag at its default. `--help` and
    /// `--helpfull` surface as [`FlagError::CliParsing`] display requests (see
    /// [`is_display_request`](crate::is_display_request)).
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::CliParsing`] for syntax errors and unknown flags,
    /// [`FlagError::MissingRequired`] and [`FlagError::Validation`] for
    /// semantic failures.
    pub fn parse<I, T>(&mut self, argv: I) -> FlagResult<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = command::double_single_dashes(
            argv.into_iter().map(Into::into).collect(),
            self.ordered(),
        );
        let program = args.first().map_or_else(
            || DEFAULT_PROGRAM.to_owned(),
            |arg| arg.to_string_lossy().into_owned(),
        );
        match self.apply_args(&program, args) {
            Ok(supplied) => {
                self.parsed = true;
                debug!(program = %program, supplied, "parsed flags");
                Ok(())
            }
            Err(err) => {
                self.unparse();
                Err(err)
            }
        }
    }

    fn apply_args(&mut self, program: &str, args: Vec<OsString>) -> FlagResult<usize> {
        let full = args.iter().skip(1).any(|arg| arg == "--helpfull");
        let matches = self.command(program, full).try_get_matches_from(args)?;
        let extracted = command::extract(&matches, self.ordered())?;
        let supplied = extracted.values.len();
        for (name, value) in extracted.values {
            if let Some(flag) = self.flags.get_mut(&name) {
                flag.set_parsed(value);
            }
        }
        self.positional = extracted.positional;

        self.check_required()?;
        self.run_validators()?;
        Ok(supplied)
    }

    fn check_required(&self) -> FlagResult<()> {
        match self
            .ordered()
            .find(|flag| flag.is_required() && flag.value().is_none())
        {
            Some(flag) => {
                warn!(flag = %flag.name(), "required flag has no value");
                Err(FlagError::MissingRequired {
                    name: flag.name().to_owned(),
                })
            }
            None => Ok(()),
        }
    }

    fn run_validators(&self) -> FlagResult<()> {
        for validator in &self.validators {
            let snapshot = self.snapshot(validator.flags());
            if !validator.passes(&snapshot) {
                warn!(flags = ?validator.flags(), message = validator.message(), "flag validation failed");
                return Err(FlagError::Validation {
                    flags: validator.flags().to_vec(),
                    message: validator.message().to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Effective values of `names`, ready for a multi-flag validator.
    #[must_use]
    pub fn snapshot(&self, names: &[String]) -> FlagSnapshot {
        names
            .iter()
            .map(|name| {
                let value = self.flags.get(name).and_then(Flag::value).cloned();
                (name.clone(), value)
            })
            .collect()
    }

    /// Renders the help text; `full` includes non-key flags.
    #[must_use]
    pub fn render_help(&self, full: bool) -> String {
        self.command(DEFAULT_PROGRAM, full).render_help().to_string()
    }

    fn command(&self, program: &str, full: bool) -> clap::Command {
        command::build(program, self.ordered(), self.key_flags(MAIN_MODULE), full)
    }

    fn ordered(&self) -> impl Iterator<Item = &Flag> {
        self.order.iter().filter_map(|name| self.flags.get(name))
    }

    /// Looks up a flag by name.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] when `name` is not defined.
    pub fn flag(&self, name: &str) -> FlagResult<&Flag> {
        self.flags.get(name).ok_or_else(|| unknown(name))
    }

    fn flag_mut(&mut self, name: &str) -> FlagResult<&mut Flag> {
        self.flags.get_mut(name).ok_or_else(|| unknown(name))
    }

    /// Defined flags in definition order.
    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.ordered()
    }

    /// Returns `true` when `name` is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Number of defined flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` when no flags are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether the last call to [`parse`](Self::parse) succeeded and has not
    /// been undone by [`unparse`](Self::unparse).
    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Positional arguments left over by the last parse.
    #[must_use]
    pub fn positional_args(&self) -> &[String] {
        &self.positional
    }

    /// Whether `name` was supplied on the command line in the last parse.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] when `name` is not defined.
    pub fn is_present(&self, name: &str) -> FlagResult<bool> {
        self.flag(name).map(Flag::is_present)
    }

    /// Effective value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] when `name` is not defined.
    pub fn value(&self, name: &str) -> FlagResult<Option<&FlagValue>> {
        self.flag(name).map(Flag::value)
    }

    /// Effective value of a boolean flag.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] or [`FlagError::WrongKind`].
    pub fn get_bool(&self, name: &str) -> FlagResult<Option<bool>> {
        self.typed(name, "boolean", |kind| matches!(kind, FlagKind::Bool), FlagValue::as_bool)
    }

    /// Effective value of an integer flag.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] or [`FlagError::WrongKind`].
    pub fn get_int(&self, name: &str) -> FlagResult<Option<i64>> {
        self.typed(name, "integer", |kind| matches!(kind, FlagKind::Integer), FlagValue::as_int)
    }

    /// Effective value of a float flag.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] or [`FlagError::WrongKind`].
    pub fn get_float(&self, name: &str) -> FlagResult<Option<f64>> {
        self.typed(name, "float", |kind| matches!(kind, FlagKind::Float), FlagValue::as_float)
    }

    /// Effective value of a string or enumeration flag.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] or [`FlagError::WrongKind`].
    pub fn get_str(&self, name: &str) -> FlagResult<Option<&str>> {
        self.typed(
            name,
            "string",
            |kind| matches!(kind, FlagKind::String | FlagKind::Enum { .. }),
            FlagValue::as_str,
        )
    }

    /// Effective value of a list flag.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] or [`FlagError::WrongKind`].
    pub fn get_list(&self, name: &str) -> FlagResult<Option<&[String]>> {
        self.typed(name, "list", |kind| matches!(kind, FlagKind::List), FlagValue::as_list)
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: &'static str,
        accepts: fn(&FlagKind) -> bool,
        project: fn(&'a FlagValue) -> Option<T>,
    ) -> FlagResult<Option<T>> {
        let flag = self.flag(name)?;
        if !accepts(flag.kind()) {
            return Err(FlagError::WrongKind {
                name: name.to_owned(),
                expected,
            });
        }
        Ok(flag.value().and_then(project))
    }
}

fn coerce_for(name: &str, kind: &FlagKind, value: FlagValue) -> FlagResult<FlagValue> {
    let rendered = value.to_string();
    kind.coerce(value).map_err(|reason| FlagError::InvalidValue {
        name: name.to_owned(),
        value: rendered,
        reason,
    })
}

fn unknown(name: &str) -> FlagError {
    FlagError::UnknownFlag {
        name: name.to_owned(),
    }
}
