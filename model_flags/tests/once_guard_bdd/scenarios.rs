//! Binds the once-guard feature file to the shared fixtures.

use crate::fixtures::{OnceGuardState, once_state};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/once_guard.feature",
    fixtures = [once_state: OnceGuardState]
);
