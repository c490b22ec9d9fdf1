//! Exactly-once invocation guards for flag registration functions.
//!
//! Registering a flag twice is an error, yet registration is commonly
//! triggered from several places: the production entry point and every test
//! module that needs the same flags. Wrapping the registration function in a
//! guard makes every call after the first a silent no-op, so later callers
//! simply rely on the flags already being in place.
//!
//! Three shapes are provided:
//!
//! - [`OnceGuard`]: the bare call state, for hand-written wrappers.
//! - [`CallOnce`]: a function paired with its guard, usable in a `static`.
//! - [`call_only_once!`](crate::call_only_once): declares a guarded function
//!   whose signature is unchanged.
//!
//! The call state is claimed with a single atomic compare-and-set before the
//! body runs, so concurrent callers cannot both execute it. The function only
//! counts as called once its body completes successfully: a body that returns
//! `Err` or panics releases the guard and the next call runs it again.
//! Callers arriving while the body is still running are skipped.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const DONE: u8 = 2;

/// Per-function "already called" state.
///
/// # Examples
///
/// ```
/// use model_flags::OnceGuard;
///
/// static GUARD: OnceGuard = OnceGuard::new();
///
/// // An unfinished claim is released when dropped.
/// drop(GUARD.claim());
/// assert!(!GUARD.has_run());
///
/// if let Some(claim) = GUARD.claim() {
///     claim.complete();
/// }
/// assert!(GUARD.has_run());
/// assert!(GUARD.claim().is_none());
/// ```
#[derive(Default)]
pub struct OnceGuard {
    state: AtomicU8,
}

impl OnceGuard {
    /// Creates a guard in the "not yet called" state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
        }
    }

    /// Claims the right to run the guarded body.
    ///
    /// Returns `None` when the body already completed or another caller is
    /// running it.
    #[must_use]
    pub fn claim(&self) -> Option<OnceClaim<'_>> {
        self.state
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| OnceClaim {
                guard: self,
                completed: false,
            })
    }

    /// Whether the guarded body has completed successfully.
    #[must_use]
    pub fn has_run(&self) -> bool {
        self.state.load(Ordering::Acquire) == DONE
    }
}

impl fmt::Debug for OnceGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnceGuard")
            .field("has_run", &self.has_run())
            .finish()
    }
}

/// An in-progress run of a guarded body.
///
/// Dropping the claim without [`complete`](Self::complete), including while
/// unwinding from a panic, returns the guard to "not yet called".
#[must_use = "dropping a claim releases the guard"]
pub struct OnceClaim<'a> {
    guard: &'a OnceGuard,
    completed: bool,
}

impl OnceClaim<'_> {
    /// Marks the body as called for good.
    pub fn complete(mut self) {
        self.completed = true;
    }

    /// Completes the claim when `succeeded`, otherwise releases it.
    pub fn settle(self, succeeded: bool) {
        if succeeded {
            self.complete();
        }
    }
}

impl Drop for OnceClaim<'_> {
    fn drop(&mut self) {
        let next = if self.completed { DONE } else { IDLE };
        self.guard.state.store(next, Ordering::Release);
    }
}

impl fmt::Debug for OnceClaim<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnceClaim")
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

/// Return types that have a natural "nothing happened" value.
///
/// Signature-preserving wrappers return this value from every call after
/// the first.
pub trait SkippedCall {
    /// Value reported when the wrapped body is not executed.
    fn skipped() -> Self;

    /// Whether a value returned by the body marks the call as done.
    ///
    /// Failed calls leave the function uncalled so it can be retried.
    fn succeeded(&self) -> bool {
        true
    }
}

impl SkippedCall for () {
    fn skipped() -> Self {}
}

impl<T> SkippedCall for Option<T> {
    fn skipped() -> Self {
        None
    }
}

impl<T> SkippedCall for Vec<T> {
    fn skipped() -> Self {
        Self::new()
    }
}

impl<T: SkippedCall, E> SkippedCall for Result<T, E> {
    fn skipped() -> Self {
        Ok(T::skipped())
    }

    fn succeeded(&self) -> bool {
        self.is_ok()
    }
}

/// A function that executes its body at most once.
///
/// Arguments passed to calls after the first successful one are dropped
/// unused.
///
/// # Examples
///
/// ```
/// use model_flags::{CallOnce, FlagRegistry, FlagResult, FlagSpec};
///
/// fn register(registry: &mut FlagRegistry) -> FlagResult<()> {
///     registry.define(FlagSpec::integer("foo", "An example.").default_value(1))
/// }
///
/// let define_flags = CallOnce::new(register);
/// let mut registry = FlagRegistry::new();
/// for _ in 0..3 {
///     define_flags.invoke_with(&mut registry)?;
/// }
/// assert_eq!(registry.get_int("foo")?, Some(1));
/// # Ok::<(), model_flags::FlagError>(())
/// ```
pub struct CallOnce<F> {
    guard: OnceGuard,
    func: F,
}

impl<F> CallOnce<F> {
    /// Wraps `func` in the "not yet called" state.
    pub const fn new(func: F) -> Self {
        Self {
            guard: OnceGuard::new(),
            func,
        }
    }

    /// Whether the body has completed.
    #[must_use]
    pub fn has_run(&self) -> bool {
        self.guard.has_run()
    }

    /// Runs a zero-argument body on the first call; `None` afterwards.
    ///
    /// Any returned value completes the call; only a panic releases it.
    pub fn call<R>(&self) -> Option<R>
    where
        F: Fn() -> R,
    {
        let claim = self.guard.claim()?;
        let outcome = (self.func)();
        claim.complete();
        Some(outcome)
    }

    /// Runs the body with `args` on the first call; `None` afterwards.
    ///
    /// Use a tuple to pass several arguments.
    pub fn call_with<A, R>(&self, args: A) -> Option<R>
    where
        F: Fn(A) -> R,
    {
        let claim = self.guard.claim()?;
        let outcome = (self.func)(args);
        claim.complete();
        Some(outcome)
    }

    /// Like [`call`](Self::call) but keeps the wrapped return type,
    /// reporting [`SkippedCall::skipped`] on repeat calls.
    ///
    /// A result that is not [`SkippedCall::succeeded`] releases the guard.
    pub fn invoke<R>(&self) -> R
    where
        F: Fn() -> R,
        R: SkippedCall,
    {
        let Some(claim) = self.guard.claim() else {
            return R::skipped();
        };
        let outcome = (self.func)();
        claim.settle(outcome.succeeded());
        outcome
    }

    /// Like [`call_with`](Self::call_with) but keeps the wrapped return type,
    /// reporting [`SkippedCall::skipped`] on repeat calls.
    ///
    /// A result that is not [`SkippedCall::succeeded`] releases the guard.
    pub fn invoke_with<A, R>(&self, args: A) -> R
    where
        F: Fn(A) -> R,
        R: SkippedCall,
    {
        let Some(claim) = self.guard.claim() else {
            return R::skipped();
        };
        let outcome = (self.func)(args);
        claim.settle(outcome.succeeded());
        outcome
    }
}

impl<F> fmt::Debug for CallOnce<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOnce")
            .field("guard", &self.guard)
            .field("func", &"<fn>")
            .finish()
    }
}

/// Declares a function whose body runs at most once per process.
///
/// The declared function keeps its signature. Calls after the first
/// successful one return [`SkippedCall::skipped`] for the return type, so the
/// return type must implement [`SkippedCall`] (`()`, `Option`, `Vec` and
/// `Result` of those). An `Err` or a panic leaves the function uncalled.
/// Generic parameters are not supported.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// static RUNS: AtomicUsize = AtomicUsize::new(0);
///
/// model_flags::call_only_once! {
///     /// Counts how often the body actually runs.
///     fn register(step: usize) -> Option<usize> {
///         RUNS.fetch_add(1, Ordering::SeqCst);
///         Some(step)
///     }
/// }
///
/// assert_eq!(register(1), Some(1));
/// assert_eq!(register(2), None);
/// assert_eq!(RUNS.load(Ordering::SeqCst), 1);
/// ```
#[macro_export]
macro_rules! call_only_once {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident($($arg:ident : $ty:ty),* $(,)?) $(-> $ret:ty)? $body:block
    ) => {
        $(#[$meta])*
        $vis fn $name($($arg: $ty),*) $(-> $ret)? {
            fn guarded_body($($arg: $ty),*) $(-> $ret)? $body

            static GUARD: $crate::OnceGuard = $crate::OnceGuard::new();
            let Some(claim) = GUARD.claim() else {
                return $crate::SkippedCall::skipped();
            };
            let outcome = guarded_body($($arg),*);
            claim.settle($crate::SkippedCall::succeeded(&outcome));
            outcome
        }
    };
}
