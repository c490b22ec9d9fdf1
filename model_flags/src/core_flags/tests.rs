//! Unit tests for the entry-point helpers.

use rstest::{fixture, rstest};

use super::{
    CORE_MODULE, adopt_core_key_flags, define_base, define_example, define_image, define_in_core,
    define_performance, set_defaults, try_parse_flags_from,
};
use crate::groups::{BaseFlags, ExampleFlags, ImageFlags, PerformanceFlags};
use crate::{FlagError, FlagRegistry, FlagResult, FlagSpec, FlagValue, MAIN_MODULE};

#[fixture]
fn training() -> FlagRegistry {
    let mut registry = FlagRegistry::new();
    define_base(&mut registry, BaseFlags::default()).expect("define base");
    registry
        .define(FlagSpec::integer("epochs", "Epochs.").default_value(1))
        .expect("define epochs");
    registry
}

#[rstest]
fn set_defaults_updates_only_named_flags(mut training: FlagRegistry) {
    set_defaults(&mut training, [("batch_size", 32), ("epochs", 10)]).expect("set defaults");
    assert_eq!(training.get_int("batch_size").expect("int"), Some(32));
    assert_eq!(training.get_int("epochs").expect("int"), Some(10));
    assert_eq!(training.get_int("train_epochs").expect("int"), Some(1));
    assert_eq!(training.get_str("model_dir").expect("str"), Some("/tmp"));
}

#[rstest]
fn set_defaults_accepts_mixed_kinds(mut training: FlagRegistry) {
    set_defaults(
        &mut training,
        [
            ("clean", FlagValue::from(true)),
            ("model_dir", FlagValue::from("/srv/models")),
            ("stop_threshold", FlagValue::from(0.75)),
        ],
    )
    .expect("set defaults");
    assert_eq!(training.get_bool("clean").expect("bool"), Some(true));
    assert_eq!(training.get_str("model_dir").expect("str"), Some("/srv/models"));
    assert_eq!(training.get_float("stop_threshold").expect("float"), Some(0.75));
}

#[rstest]
fn set_defaults_stops_at_the_first_unknown_flag(mut training: FlagRegistry) {
    let err = set_defaults(
        &mut training,
        [("epochs", 4), ("learning_rate", 1), ("batch_size", 8)],
    )
    .expect_err("unknown flag");
    assert!(matches!(err, FlagError::UnknownFlag { ref name } if name == "learning_rate"));
    assert_eq!(training.get_int("epochs").expect("int"), Some(4));
    assert_eq!(training.get_int("batch_size").expect("int"), Some(32));
}

#[rstest]
fn new_defaults_apply_after_reparse(mut training: FlagRegistry) {
    try_parse_flags_from(&mut training, ["train"]).expect("parse");
    set_defaults(&mut training, [("epochs", 7)]).expect("set defaults");
    try_parse_flags_from(&mut training, ["train"]).expect("reparse");
    assert_eq!(training.get_int("epochs").expect("int"), Some(7));
}

#[rstest]
fn reparse_forgets_earlier_values(mut training: FlagRegistry) {
    try_parse_flags_from(&mut training, ["train", "--epochs", "5", "--clean"]).expect("parse");
    assert_eq!(training.get_int("epochs").expect("int"), Some(5));

    try_parse_flags_from(&mut training, ["train", "--bs", "16"]).expect("reparse");
    assert_eq!(training.get_int("epochs").expect("int"), Some(1));
    assert_eq!(training.get_bool("clean").expect("bool"), Some(false));
    assert_eq!(training.get_int("batch_size").expect("int"), Some(16));
}

#[rstest]
fn reparse_rejects_unknown_flags(mut training: FlagRegistry) {
    let err = try_parse_flags_from(&mut training, ["train", "--learning_rate", "0.1"])
        .expect_err("unknown flag");
    assert!(matches!(err, FlagError::CliParsing(_)), "got {err:?}");
    assert!(!training.is_parsed());
}

#[rstest]
fn core_groups_declare_key_flags_in_core() {
    let mut registry = FlagRegistry::new();
    let base = define_base(&mut registry, BaseFlags::default()).expect("base");
    let image = define_image(&mut registry, ImageFlags::default()).expect("image");
    let performance =
        define_performance(&mut registry, PerformanceFlags::default()).expect("performance");

    let expected: Vec<String> = base.into_iter().chain(image).chain(performance).collect();
    assert_eq!(registry.key_flags(CORE_MODULE), expected.as_slice());
    assert!(registry.key_flags(MAIN_MODULE).is_empty());

    adopt_core_key_flags(&mut registry).expect("adopt");
    assert_eq!(registry.key_flags(MAIN_MODULE), expected.as_slice());
    let help = registry.render_help(false);
    assert!(help.contains("--data_format"), "help: {help}");
}

#[rstest]
fn failed_definitions_declare_nothing() {
    let mut registry = FlagRegistry::new();
    let err = define_example(
        &mut registry,
        ExampleFlags {
            foo: false,
            bar: true,
        },
    )
    .expect_err("bar needs foo");
    assert!(matches!(err, FlagError::Definition(_)));
    assert!(registry.key_flags(CORE_MODULE).is_empty());
}

fn define_ghost(registry: &mut FlagRegistry, _options: ()) -> FlagResult<Vec<String>> {
    registry.define(FlagSpec::boolean("real", "Defined."))?;
    Ok(vec![String::from("real"), String::from("ghost")])
}

#[rstest]
fn undefined_key_flags_are_reported() {
    let mut registry = FlagRegistry::new();
    let err = define_in_core(&mut registry, define_ghost, ()).expect_err("ghost is undefined");
    assert!(matches!(err, FlagError::UnknownFlag { ref name } if name == "ghost"));
    assert_eq!(registry.key_flags(CORE_MODULE), ["real"]);
}
