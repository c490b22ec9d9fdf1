//! Process-level behaviour of `parse_flags_from` on bad input.
//!
//! The exiting paths run in a child copy of this test binary: the parent
//! re-invokes itself filtered to [`child_process`] with the argv to parse in
//! an environment variable, then inspects the exit status and output.

use std::env;
use std::process::{Command, Output};

use anyhow::{Context, Result, ensure};
use model_flags::{
    BaseFlags, FlagRegistry, FlagSpec, adopt_core_key_flags, define_base, parse_flags_from,
};
use rstest::rstest;

const CHILD_ARGS: &str = "MODEL_FLAGS_CHILD_ARGS";

#[rstest]
fn child_process() -> Result<()> {
    let Some(raw) = env::var_os(CHILD_ARGS) else {
        return Ok(());
    };
    let args = raw.to_string_lossy().into_owned();
    let mut registry = FlagRegistry::new();
    define_base(&mut registry, BaseFlags::default())?;
    adopt_core_key_flags(&mut registry)?;
    registry.define(FlagSpec::string("profile_dir", "Where to write traces."))?;
    parse_flags_from(
        &mut registry,
        std::iter::once("train").chain(args.split_whitespace()),
    );
    Ok(())
}

fn run_child(args: &str) -> Result<Output> {
    let exe = env::current_exe().context("locate test binary")?;
    Command::new(exe)
        .args(["child_process", "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ARGS, args)
        .output()
        .context("spawn child test process")
}

#[rstest]
#[case::unknown_flag("--learning_rate 0.1")]
#[case::bad_integer("--batch_size many")]
fn parse_failures_are_fatal(#[case] args: &str) -> Result<()> {
    let output = run_child(args)?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    ensure!(
        output.status.code() == Some(1),
        "expected exit status 1, got {:?}; stderr: {stderr}",
        output.status.code()
    );
    ensure!(
        stderr.contains("FATAL Flags parsing error: "),
        "missing fatal report in stderr: {stderr}"
    );
    ensure!(
        stderr.contains("Pass -h or --helpfull to see help on flags.\n"),
        "missing help hint in stderr: {stderr}"
    );
    Ok(())
}

#[rstest]
#[case::double_dash("--bs 64 --clean")]
#[case::single_dash("-bs 64 -clean -profile_dir=/tmp/traces")]
fn valid_arguments_do_not_exit(#[case] args: &str) -> Result<()> {
    let output = run_child(args)?;
    ensure!(
        output.status.success(),
        "child failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(())
}

#[rstest]
#[case::help("--help", false)]
#[case::single_dash_help("-help", false)]
#[case::helpfull("--helpfull", true)]
#[case::single_dash_helpfull("-helpfull", true)]
fn help_requests_exit_successfully(#[case] args: &str, #[case] full: bool) -> Result<()> {
    let output = run_child(args)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    ensure!(output.status.code() == Some(0), "help should exit with status 0");
    ensure!(stdout.contains("--batch_size"), "help lacks key flags: {stdout}");
    ensure!(
        stdout.contains("--profile_dir") == full,
        "non-key flag shown only by --helpfull; full={full}: {stdout}"
    );
    Ok(())
}
