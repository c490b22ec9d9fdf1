//! Step definitions for the once-guard scenarios.

use anyhow::{Result, anyhow, ensure};
use model_flags::{CallOnce, FlagError, FlagRegistry, FlagSpec};
use rstest_bdd_macros::{given, then, when};

use crate::fixtures::{OnceGuardState, RegisterFn};

fn registration(name: String, default: i64) -> CallOnce<RegisterFn> {
    CallOnce::new(Box::new(move |registry: &mut FlagRegistry| {
        registry.define(
            FlagSpec::integer(name.clone(), "Defined by a scenario.").default_value(default),
        )
    }))
}

fn take_registry(once_state: &OnceGuardState) -> Result<FlagRegistry> {
    once_state
        .registry
        .take()
        .ok_or_else(|| anyhow!("the flag registry was not initialised"))
}

#[given("an empty flag registry")]
fn empty_registry(once_state: &OnceGuardState) {
    once_state.registry.set(FlagRegistry::new());
}

#[given("a once-guarded registration of {name} with default {default:i64}")]
fn guarded_registration(once_state: &OnceGuardState, name: String, default: i64) {
    once_state.registration.set(registration(name, default));
}

#[when("the registration is invoked {count:usize} times")]
fn invoke_registration(once_state: &OnceGuardState, count: usize) -> Result<()> {
    let mut registry = take_registry(once_state)?;
    let outcome = once_state
        .registration
        .with_ref(|register| {
            (0..count).try_for_each(|_| register.invoke_with(&mut registry))
        })
        .ok_or_else(|| anyhow!("no registration function was configured"))?;
    once_state.registry.set(registry);
    outcome.map_err(anyhow::Error::new)
}

#[when("a separately guarded registration of {name} is invoked")]
fn invoke_separate_guard(once_state: &OnceGuardState, name: String) -> Result<()> {
    let mut registry = take_registry(once_state)?;
    let outcome = registration(name, 0).invoke_with(&mut registry);
    once_state.registry.set(registry);
    let err = outcome
        .err()
        .ok_or_else(|| anyhow!("a separate guard should run its body and fail"))?;
    ensure!(
        matches!(err, FlagError::DuplicateFlag { .. }),
        "expected a duplicate definition, got {err:?}"
    );
    once_state.last_error.set(err.to_string());
    Ok(())
}

#[then("the flag {name} is defined exactly once")]
fn defined_once(once_state: &OnceGuardState, name: String) -> Result<()> {
    let count = once_state
        .registry
        .with_ref(|registry| registry.flags().filter(|flag| flag.name() == name).count())
        .ok_or_else(|| anyhow!("the flag registry was not initialised"))?;
    ensure!(count == 1, "expected {name} once, found {count} definitions");
    Ok(())
}

#[then("the default of {name} is {expected:i64}")]
fn default_is(once_state: &OnceGuardState, name: String, expected: i64) -> Result<()> {
    let actual = once_state
        .registry
        .with_ref(|registry| registry.get_int(&name).ok().flatten())
        .ok_or_else(|| anyhow!("the flag registry was not initialised"))?;
    ensure!(
        actual == Some(expected),
        "expected {name} to default to {expected}, found {actual:?}"
    );
    Ok(())
}

#[then("registration failed because {name} is already defined")]
fn failed_as_duplicate(once_state: &OnceGuardState, name: String) -> Result<()> {
    let message = once_state
        .last_error
        .get()
        .ok_or_else(|| anyhow!("no registration failure was recorded"))?;
    ensure!(
        message == format!("flag '--{name}' is already defined"),
        "unexpected error message: {message}"
    );
    Ok(())
}
