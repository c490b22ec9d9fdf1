//! Tests for the global registry scope.

use model_flags::{FlagRegistry, FlagSpec};
use rstest::rstest;

use super::isolate;

fn define_foo() {
    FlagRegistry::global()
        .lock()
        .define(FlagSpec::integer("foo", "Example.").default_value(1))
        .expect("define foo");
}

#[rstest]
fn scope_starts_and_ends_empty() {
    {
        let _scope = isolate();
        assert!(FlagRegistry::global().lock().is_empty());
        define_foo();
        assert_eq!(FlagRegistry::global().lock().len(), 1);
    }
    let _scope = isolate();
    assert!(FlagRegistry::global().lock().is_empty());
}

#[rstest]
fn nested_scopes_do_not_deadlock() {
    let _outer = isolate();
    define_foo();
    let _inner = isolate();
    assert!(FlagRegistry::global().lock().is_empty());
}
