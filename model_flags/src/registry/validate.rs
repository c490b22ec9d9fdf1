//! Post-parse validators.

use std::collections::BTreeMap;
use std::fmt;

use super::value::FlagValue;

/// Snapshot of effective values handed to multi-flag validators, keyed by
/// flag name.
pub type FlagSnapshot = BTreeMap<String, Option<FlagValue>>;

type Check = Box<dyn Fn(&FlagSnapshot) -> bool + Send + Sync>;

/// A check run after every successful parse.
pub(crate) struct Validator {
    flags: Vec<String>,
    message: String,
    check: Check,
}

impl Validator {
    pub(crate) const fn new(flags: Vec<String>, message: String, check: Check) -> Self {
        Self {
            flags,
            message,
            check,
        }
    }

    pub(crate) fn flags(&self) -> &[String] {
        &self.flags
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn passes(&self, snapshot: &FlagSnapshot) -> bool {
        (self.check)(snapshot)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("flags", &self.flags)
            .field("message", &self.message)
            .field("check", &"<fn>")
            .finish()
    }
}
