//! Serialised, reset-on-entry access to the global flag registry.
//!
//! [`isolate`] acquires a process-wide re-entrant lock and replaces the
//! global registry with an empty one. Dropping the returned scope empties it
//! again before releasing the lock, so no test observes flags another test
//! defined.
//!
//! Once-guarded registration functions keep their state across scopes: a
//! function guarded by [`call_only_once!`](model_flags::call_only_once) that
//! already ran will not define its flags again in a later scope.
//!
//! # Examples
//!
//! ```
//! use model_flags::{FlagRegistry, FlagSpec};
//! use test_helpers::registry;
//!
//! let _scope = registry::isolate();
//! FlagRegistry::global()
//!     .lock()
//!     .define(FlagSpec::integer("foo", "Example.").default_value(1))?;
//! assert!(FlagRegistry::global().lock().contains("foo"));
//! # Ok::<(), model_flags::FlagError>(())
//! ```

use std::fmt;
use std::sync::LazyLock;

use model_flags::FlagRegistry;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static REGISTRY_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII scope granting exclusive use of the global registry.
#[must_use = "dropping releases the registry lock"]
pub struct RegistryScope {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for RegistryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryScope").finish_non_exhaustive()
    }
}

impl Drop for RegistryScope {
    fn drop(&mut self) {
        reset();
    }
}

/// Locks the global registry for the current test and empties it.
///
/// Nested calls on the same thread succeed; the registry is emptied on every
/// entry and exit.
pub fn isolate() -> RegistryScope {
    let guard = REGISTRY_MUTEX.lock();
    reset();
    RegistryScope { _guard: guard }
}

/// Replaces the global registry with an empty one.
///
/// Callers should hold an [`isolate`] scope.
pub fn reset() {
    *FlagRegistry::global().lock() = FlagRegistry::new();
}

#[cfg(test)]
mod tests;
