//! Shared scenario state for the once-guard behaviour tests.

use model_flags::{CallOnce, FlagRegistry, FlagResult};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Registration body wrapped by a [`CallOnce`] guard.
pub type RegisterFn = Box<dyn Fn(&mut FlagRegistry) -> FlagResult<()> + Send + Sync>;

/// State shared between the steps of one scenario.
#[derive(Default, ScenarioState)]
pub struct OnceGuardState {
    /// Registry the registration functions define into.
    pub registry: Slot<FlagRegistry>,
    /// The guarded registration under test.
    pub registration: Slot<CallOnce<RegisterFn>>,
    /// Rendered error from the most recent failing registration.
    pub last_error: Slot<String>,
}

/// Creates empty scenario state.
#[fixture]
pub fn once_state() -> OnceGuardState {
    OnceGuardState::default()
}
