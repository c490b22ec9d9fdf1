//! Translation between registry flags and the `clap` parser.
//!
//! The registry owns flag definitions; `clap` owns tokenisation, value
//! validation and help rendering. Each parse builds a fresh
//! [`clap::Command`] from the current definitions so defaults changed via
//! `set_default` are reflected in the help text.
//!
//! Flags may be spelled with one dash or two (`-bs=8`, `--bs=8`). `clap`
//! reserves single dashes for one-letter switches, so argv is rewritten with
//! [`double_single_dashes`] before matching.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};

use clap::{Arg, ArgAction, ArgMatches, Command, parser::ValueSource};

use super::flag::Flag;
use super::value::{FlagKind, FlagValue};
use crate::{FlagError, FlagResult};

/// Long option that renders help for every defined flag.
pub const HELPFULL_FLAG: &str = "helpfull";

const POSITIONAL_ID: &str = "__positional";

/// Builds the parser for `flags`.
///
/// When `full` is false only flags in `visible` are shown by `--help`; the
/// rest still parse but are hidden until `--helpfull` is requested.
pub(crate) fn build<'a, I>(program: &str, flags: I, visible: &[String], full: bool) -> Command
where
    I: IntoIterator<Item = &'a Flag>,
{
    let mut command = Command::new(program.to_owned())
        .args_override_self(true)
        .arg(
            Arg::new(HELPFULL_FLAG)
                .long(HELPFULL_FLAG)
                .help("Show help for every defined flag")
                .action(ArgAction::Help),
        )
        .arg(
            Arg::new(POSITIONAL_ID)
                .action(ArgAction::Append)
                .num_args(0..)
                .hide(true),
        );

    for flag in flags {
        let hidden = !full && !visible.iter().any(|name| name == flag.name());
        command = command.arg(flag_arg(flag, hidden));
        if matches!(flag.kind(), FlagKind::Bool) {
            command = command.arg(negation_arg(flag));
        }
    }
    command
}

fn flag_arg(flag: &Flag, hidden: bool) -> Arg {
    let name = flag.name().to_owned();
    let kind = flag.kind().clone();
    let mut arg = Arg::new(name.clone())
        .long(name)
        .help(help_text(flag))
        .value_name(flag.kind().value_name())
        .action(ArgAction::Set)
        .hide(hidden)
        .value_parser(move |raw: &str| kind.parse_str(raw));
    if let Some(short) = flag.short_name() {
        arg = arg.visible_alias(short.to_owned());
    }
    if matches!(flag.kind(), FlagKind::Integer | FlagKind::Float) {
        arg = arg.allow_negative_numbers(true);
    }
    if matches!(flag.kind(), FlagKind::Bool) {
        arg = arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .overrides_with(negation_id(flag.name()));
    }
    arg
}

fn negation_arg(flag: &Flag) -> Arg {
    let id = negation_id(flag.name());
    Arg::new(id.clone())
        .long(id)
        .action(ArgAction::SetTrue)
        .hide(true)
        .overrides_with(flag.name().to_owned())
}

pub(crate) fn negation_id(name: &str) -> String {
    format!("no{name}")
}

/// Rewrites `-name` and `-name=value` to their double-dash form when `name`
/// is a defined flag, short name, boolean negation or help flag.
///
/// Other arguments, such as negative numbers or a lone `-`, pass through.
/// Nothing after a bare `--` is rewritten.
pub(crate) fn double_single_dashes<'a, I>(args: Vec<OsString>, flags: I) -> Vec<OsString>
where
    I: IntoIterator<Item = &'a Flag>,
{
    let known = long_names(flags);
    let mut escaped = false;
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || escaped {
                return arg;
            }
            if arg == "--" {
                escaped = true;
                return arg;
            }
            if names_known_flag(&arg, &known) {
                with_extra_dash(&arg)
            } else {
                arg
            }
        })
        .collect()
}

fn long_names<'a, I>(flags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Flag>,
{
    let mut known: BTreeSet<String> = ["help", HELPFULL_FLAG]
        .into_iter()
        .map(str::to_owned)
        .collect();
    for flag in flags {
        known.insert(flag.name().to_owned());
        if let Some(short) = flag.short_name() {
            known.insert(short.to_owned());
        }
        if matches!(flag.kind(), FlagKind::Bool) {
            known.insert(negation_id(flag.name()));
        }
    }
    known
}

fn names_known_flag(arg: &OsStr, known: &BTreeSet<String>) -> bool {
    arg.to_str()
        .and_then(|text| text.strip_prefix('-'))
        .filter(|rest| !rest.starts_with('-'))
        .map(|rest| rest.split_once('=').map_or(rest, |(name, _)| name))
        .is_some_and(|name| known.contains(name))
}

fn with_extra_dash(arg: &OsStr) -> OsString {
    let mut doubled = OsString::from("-");
    doubled.push(arg);
    doubled
}

fn help_text(flag: &Flag) -> String {
    let mut help = flag.help().to_owned();
    if let FlagKind::Enum { choices } = flag.kind() {
        help.push_str(&format!("\n(choices: {})", choices.join(", ")));
    }
    let default = flag
        .default()
        .map_or_else(|| String::from("None"), |value| format!("'{value}'"));
    help.push_str(&format!("\n(default: {default})"));
    help
}

/// Values extracted from a successful parse.
#[derive(Debug, Default)]
pub(crate) struct Extracted {
    pub(crate) values: Vec<(String, FlagValue)>,
    pub(crate) positional: Vec<String>,
}

/// Reads every command-line supplied flag out of `matches`.
pub(crate) fn extract<'a, I>(matches: &ArgMatches, flags: I) -> FlagResult<Extracted>
where
    I: IntoIterator<Item = &'a Flag>,
{
    let mut extracted = Extracted::default();
    for flag in flags {
        if let Some(value) = supplied_value(matches, flag)? {
            extracted.values.push((flag.name().to_owned(), value));
        }
    }
    extracted.positional = matches
        .try_get_many::<String>(POSITIONAL_ID)
        .map_err(|err| FlagError::Definition(err.to_string()))?
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    Ok(extracted)
}

fn supplied_value(matches: &ArgMatches, flag: &Flag) -> FlagResult<Option<FlagValue>> {
    let name = flag.name();
    if matches.value_source(name) == Some(ValueSource::CommandLine) {
        return matches
            .try_get_one::<FlagValue>(name)
            .map(|value| value.cloned())
            .map_err(|err| FlagError::Definition(err.to_string()));
    }
    if matches!(flag.kind(), FlagKind::Bool) {
        let negated = matches
            .try_get_one::<bool>(&negation_id(name))
            .map_err(|err| FlagError::Definition(err.to_string()))?;
        if negated == Some(&true) {
            return Ok(Some(FlagValue::Bool(false)));
        }
    }
    Ok(None)
}
