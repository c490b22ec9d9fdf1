//! Unit tests for error classification and the fatal parse report.

use clap::{Command, error::ErrorKind};
use rstest::rstest;

use super::{FlagError, is_display_request, write_parse_failure};

fn build_error(kind: ErrorKind) -> clap::Error {
    Command::new("demo").error(kind, "demo output")
}

fn report(err: &FlagError) -> String {
    let mut buf = Vec::new();
    write_parse_failure(&mut buf, err).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("report is valid UTF-8")
}

#[rstest]
#[case(ErrorKind::DisplayHelp)]
#[case(ErrorKind::DisplayVersion)]
fn recognises_display_requests(#[case] kind: ErrorKind) {
    let err = build_error(kind);
    assert!(is_display_request(&err));
}

#[rstest]
#[case(ErrorKind::UnknownArgument)]
#[case(ErrorKind::InvalidValue)]
fn rejects_regular_errors(#[case] kind: ErrorKind) {
    let err = build_error(kind);
    assert!(!is_display_request(&err));
}

#[rstest]
fn parse_failure_report_has_two_fixed_lines() {
    let text = report(&FlagError::MissingRequired {
        name: "bar".into(),
    });
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "FATAL Flags parsing error: flag '--bar' must have a value other than None",
            "Pass -h or --helpfull to see help on flags.",
        ]
    );
}

#[rstest]
fn clap_errors_are_reduced_to_their_first_line() {
    let err = FlagError::from(build_error(ErrorKind::UnknownArgument));
    let text = report(&err);
    assert!(
        text.starts_with("FATAL Flags parsing error: demo output\n"),
        "unexpected report: {text}"
    );
    assert_eq!(text.lines().count(), 2);
}

#[rstest]
fn validation_errors_list_every_flag() {
    let err = FlagError::Validation {
        flags: vec!["foo".into(), "bar".into()],
        message: "bar must match foo".into(),
    };
    assert_eq!(
        err.to_string(),
        "flag validation failed for --foo, --bar: bar must match foo"
    );
}

#[rstest]
fn config_errors_round_trip_through_figment() {
    let original = figment::Error::from(String::from("boom"));
    let err = FlagError::from(original);
    let back: figment::Error = err.into();
    assert_eq!(back.to_string(), "boom");
}

#[rstest]
fn other_errors_become_figment_messages() {
    let err = FlagError::UnknownFlag {
        name: String::from("learning_rate"),
    };
    let expected = err.to_string();
    let converted: figment::Error = err.into();
    assert_eq!(converted.to_string(), expected);
}
