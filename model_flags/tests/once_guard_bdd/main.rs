//! `rstest-bdd` scenarios for once-guarded flag registration.
//!
//! Fixtures live in [`fixtures`], step implementations in [`steps`], and
//! [`scenarios`] binds `tests/features/once_guard.feature` to them.

mod fixtures;
mod scenarios;
mod steps;
