//! Test helpers shared across the workspace.
//!
//! The process-wide [`FlagRegistry`](model_flags::FlagRegistry) outlives any
//! single test, so tests that touch it take a [`registry::isolate`] scope
//! first.

pub mod registry;
