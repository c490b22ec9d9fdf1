//! Flags controlling benchmark logging and upload.

use super::{GroupBuilder, help_wrap};
use crate::{FlagRegistry, FlagResult, FlagSnapshot, FlagSpec, FlagValue};

/// Loggers accepted by `--benchmark_logger_type`.
pub const BENCHMARK_LOGGERS: [&str; 3] = [
    "BaseBenchmarkLogger",
    "BenchmarkFileLogger",
    "BenchmarkBigQueryLogger",
];

const DEFAULT_LOGGER: &str = "BaseBenchmarkLogger";
const FILE_LOGGER: &str = "BenchmarkFileLogger";

/// Selects which optional benchmark flags [`define_benchmark`] registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkFlags {
    /// `--benchmark_log_dir`, plus the check that the file logger has one.
    pub benchmark_log_dir: bool,
    /// The `BigQuery` destination flags.
    pub bigquery_uploader: bool,
}

impl Default for BenchmarkFlags {
    fn default() -> Self {
        Self {
            benchmark_log_dir: true,
            bigquery_uploader: true,
        }
    }
}

/// Registers the benchmark flags selected by `flags`.
///
/// `--benchmark_logger_type` and `--benchmark_test_id` are always defined.
/// When `--benchmark_log_dir` is defined, choosing `BenchmarkFileLogger`
/// without a log directory fails validation.
///
/// # Errors
///
/// Propagates [`FlagError::DuplicateFlag`](crate::FlagError::DuplicateFlag)
/// when a flag already exists.
pub fn define_benchmark(
    registry: &mut FlagRegistry,
    flags: BenchmarkFlags,
) -> FlagResult<Vec<String>> {
    let mut group = GroupBuilder::new(registry);

    group.key_flag(
        FlagSpec::enumeration(
            "benchmark_logger_type",
            BENCHMARK_LOGGERS,
            help_wrap(
                "The type of benchmark logger to use. Defaults to using BaseBenchmarkLogger \
                 which logs to STDOUT. Different loggers will require other flags to be \
                 able to work.",
            ),
        )
        .short_name("blt")
        .default_value(DEFAULT_LOGGER),
    )?;
    group.key_flag(
        FlagSpec::string(
            "benchmark_test_id",
            help_wrap(
                "The unique test ID of the benchmark run. It could be the combination of key \
                 parameters. It is hardware independent and could be used to compare the \
                 performance between different test runs. This flag is designed for human \
                 consumption, and does not have any impact within the system.",
            ),
        )
        .short_name("bti"),
    )?;

    if flags.benchmark_log_dir {
        group.key_flag(
            FlagSpec::string(
                "benchmark_log_dir",
                help_wrap("The location of the benchmark logging."),
            )
            .short_name("bld"),
        )?;
        group.registry().register_multi_validator(
            ["benchmark_logger_type", "benchmark_log_dir"],
            format!("--benchmark_logger_type={FILE_LOGGER} will require --benchmark_log_dir being set"),
            file_logger_has_dir,
        )?;
    }

    if flags.bigquery_uploader {
        for (name, short, default, help) in BIGQUERY_FLAGS {
            let mut spec = FlagSpec::string(name, help_wrap(help)).short_name(short);
            if let Some(value) = default {
                spec = spec.default_value(value);
            }
            group.key_flag(spec)?;
        }
    }

    Ok(group.finish())
}

type BigQueryFlag = (&'static str, &'static str, Option<&'static str>, &'static str);

const BIGQUERY_FLAGS: [BigQueryFlag; 5] = [
    (
        "gcp_project",
        "gp",
        None,
        "The GCP project name where the benchmark will be uploaded.",
    ),
    (
        "bigquery_data_set",
        "bds",
        Some("test_benchmark"),
        "The Bigquery dataset name where the benchmark will be uploaded.",
    ),
    (
        "bigquery_run_table",
        "brt",
        Some("benchmark_run"),
        "The Bigquery table name where the benchmark run information will be uploaded.",
    ),
    (
        "bigquery_run_status_table",
        "brst",
        Some("benchmark_run_status"),
        "The Bigquery table name where the benchmark run status information will be \
         uploaded.",
    ),
    (
        "bigquery_metric_table",
        "bmt",
        Some("benchmark_metric"),
        "The Bigquery table name where the benchmark metric information will be uploaded.",
    ),
];

fn file_logger_has_dir(snapshot: &FlagSnapshot) -> bool {
    let text = |name: &str| {
        snapshot
            .get(name)
            .and_then(Option::as_ref)
            .and_then(FlagValue::as_str)
    };
    text("benchmark_logger_type") != Some(FILE_LOGGER)
        || text("benchmark_log_dir").is_some_and(|dir| !dir.is_empty())
}
