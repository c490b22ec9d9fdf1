//! A worked example of a flag group.
//!
//! `--foo` picks a mode and `--bar` a number that must suit it. The group
//! shows the pieces most groups need: choices rendered into help text,
//! indented help lines, a required flag and a validator spanning two flags.

use super::{GroupBuilder, INDENT_MARKER, help_wrap, to_choices_str};
use crate::{FlagError, FlagRegistry, FlagResult, FlagSnapshot, FlagSpec, FlagValue};

const FOO_CHOICES: [&str; 2] = ["fizz", "bang"];
const FIZZ_BARS: [i64; 3] = [1, 2, 3];
const BANG_BARS: [i64; 3] = [4, 5, 6];

/// Selects which example flags [`define_example`] registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleFlags {
    /// `--foo`.
    pub foo: bool,
    /// `--bar`; requires `foo`.
    pub bar: bool,
}

impl Default for ExampleFlags {
    fn default() -> Self {
        Self {
            foo: true,
            bar: true,
        }
    }
}

/// Values of `--bar` valid for the given `--foo` choice.
///
/// Unknown choices allow nothing.
#[must_use]
pub fn bar_choices(foo: &str) -> &'static [i64] {
    match foo {
        "fizz" => &FIZZ_BARS,
        "bang" => &BANG_BARS,
        _ => &[],
    }
}

/// Registers `--foo` and `--bar` as selected by `flags`.
///
/// `--bar` is required once defined and must be one of the
/// [`bar_choices`] of the selected `--foo`.
///
/// # Errors
///
/// Returns [`FlagError::Definition`] when `bar` is requested without `foo`,
/// before anything is defined, and propagates
/// [`FlagError::DuplicateFlag`] when a flag already exists.
pub fn define_example(
    registry: &mut FlagRegistry,
    flags: ExampleFlags,
) -> FlagResult<Vec<String>> {
    if flags.bar && !flags.foo {
        return Err(FlagError::Definition(String::from("--bar depends on --foo")));
    }
    let mut group = GroupBuilder::new(registry);

    if flags.foo {
        group.key_flag(
            FlagSpec::enumeration(
                "foo",
                FOO_CHOICES,
                help_wrap(&format!(
                    "A flag of no particular note\n{}",
                    to_choices_str(FOO_CHOICES)
                )),
            )
            .short_name("f")
            .default_value("fizz"),
        )?;
    }

    if flags.bar {
        let help = format!(
            "Specify a number to go along with --foo.\n\
             {INDENT_MARKER}  if --foo=fizz:\n{INDENT_MARKER}    {}\n\
             {INDENT_MARKER}  if --foo=bang:\n{INDENT_MARKER}    {}",
            to_choices_str(FIZZ_BARS),
            to_choices_str(BANG_BARS),
        );
        group.key_flag(FlagSpec::integer("bar", help_wrap(&help)).short_name("b"))?;
        group.registry().mark_required("bar")?;
        group.registry().register_multi_validator(
            ["foo", "bar"],
            "--bar must be one of the values listed for the selected --foo",
            bar_suits_foo,
        )?;
    }

    Ok(group.finish())
}

fn bar_suits_foo(snapshot: &FlagSnapshot) -> bool {
    let value = |name: &str| snapshot.get(name).and_then(Option::as_ref);
    match (
        value("foo").and_then(FlagValue::as_str),
        value("bar").and_then(FlagValue::as_int),
    ) {
        (Some(foo), Some(bar)) => bar_choices(foo).contains(&bar),
        _ => false,
    }
}
