//! `From` impls linking [`FlagError`] with the clap and figment error types.

use super::FlagError;

impl From<clap::Error> for FlagError {
    fn from(err: clap::Error) -> Self {
        Self::CliParsing(Box::new(err))
    }
}

impl From<figment::Error> for FlagError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Lets `figment::Jail` closures apply `?` to registry operations.
///
/// Configuration failures hand back the wrapped figment error; every other
/// variant becomes a message-only error.
impl From<FlagError> for figment::Error {
    fn from(err: FlagError) -> Self {
        match err {
            FlagError::Config(source) => *source,
            flag_err => Self::from(flag_err.to_string()),
        }
    }
}
