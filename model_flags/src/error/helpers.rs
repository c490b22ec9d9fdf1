//! Helpers for classifying and rendering parse failures.

use std::io::{self, Write};

use clap::{Error as ClapError, error::ErrorKind};

use super::FlagError;

/// Returns `true` when a [`clap::Error`] corresponds to `--help`,
/// `--helpfull` or `--version`.
///
/// Clap surfaces these requests via specialised [`ErrorKind`] variants so
/// entry points can delegate to [`clap::Error::exit`] and preserve the
/// expected zero exit status.
#[must_use]
pub fn is_display_request(err: &ClapError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

/// Writes the fatal two-line diagnostic emitted when flag parsing fails.
///
/// Clap errors are reduced to their first line with the `error: ` prefix
/// removed, so the output stays a fixed two-line report.
///
/// # Errors
///
/// Returns any I/O error raised by `out`.
///
/// # Examples
///
/// ```
/// use model_flags::{FlagError, write_parse_failure};
///
/// let err = FlagError::UnknownFlag { name: "bogus".into() };
/// let mut buf = Vec::new();
/// write_parse_failure(&mut buf, &err)?;
/// let text = String::from_utf8(buf).unwrap_or_default();
/// assert!(text.starts_with("FATAL Flags parsing error: unknown flag '--bogus'\n"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_parse_failure<W: Write>(out: &mut W, err: &FlagError) -> io::Result<()> {
    writeln!(out, "FATAL Flags parsing error: {}", failure_summary(err))?;
    writeln!(out, "Pass -h or --helpfull to see help on flags.")
}

fn failure_summary(err: &FlagError) -> String {
    match err {
        FlagError::CliParsing(clap_err) => {
            let rendered = clap_err.to_string();
            let first_line = rendered.lines().next().unwrap_or_default();
            first_line
                .strip_prefix("error: ")
                .unwrap_or(first_line)
                .to_owned()
        }
        other => other.to_string(),
    }
}
