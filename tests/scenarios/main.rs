use std::{cell::RefCell, rc::Rc};

use pretty_assertions::assert_eq;
use quickdemo::{
    Error, args,
    action::Action,
    arguments::{Bindings, lazy},
    demo::{Builder, Configuration},
    formatter::{
        FormatterRef,
        template::{VERBOSE_ERROR_FORMAT, VERBOSE_OUTPUT_FORMAT},
    },
    group::{GroupBuilder, GroupRegistry},
    kind::Kind,
    options::key,
    outcome::Counters,
    runtime::{FAILURE_EXIT_CODE, Settings},
    shorthand,
    value::Value,
};

mod lib;

use lib::*;

#[test]
fn invoking_prints_the_result() {
    let (mut runtime, buffer, _) = runtime(Settings::default());
    shorthand::run(&f(), args![1], &mut runtime).unwrap();

    assert_eq!(buffer.contents(), "f(1) -> 2\n");
    assert_eq!(runtime.counters(), Counters::default());
}

#[test]
fn expected_error_passes() {
    let (mut runtime, buffer, _) = runtime(Settings::default());
    let pairwise = pairwise();
    let pairwise =
        shorthand::expect_error(&pairwise, Kind::value_error(), args![Vec::<Value>::new()], &mut runtime)
            .unwrap();
    shorthand::expect_error(pairwise, Kind::value_error(), args![vec![1]], &mut runtime).unwrap();

    assert_eq!(buffer.contents(), "Passed: pairwise([])\nPassed: pairwise([1])\n");
    assert_eq!(runtime.counters(), Counters { passed: 2, failed: 0 });
}

#[test]
fn missing_error_fails() {
    let (mut runtime, buffer, exits) = runtime(Settings::default());
    shorthand::expect_error(&pairwise(), Kind::value_error(), args![vec![1, 2, 3]], &mut runtime)
        .unwrap();

    assert_eq!(
        buffer.contents(),
        "Failed: pairwise([1, 2, 3]) should raise ValueError, but no error was raised\n"
    );
    assert_eq!(runtime.counters(), Counters { passed: 0, failed: 1 });
    assert!(exits.borrow().is_empty());
}

#[test]
fn groups_resolve_without_deduplication() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let (a, b) = (recording("in_a", &calls), recording("in_b", &calls));
    let mut registry = GroupRegistry::new();
    registry.register(&a, ["a"]).register(&b, ["b"]);
    let (mut runtime, buffer, _) = runtime(Settings::default());

    let builder = GroupBuilder::new()
        .with_groups(["a", "b"])
        .with_option(key::OUTPUT_NONE, true);
    builder.build().run(&registry, &mut runtime).unwrap();
    assert_eq!(*calls.borrow(), ["in_a", "in_b"]);

    calls.borrow_mut().clear();
    builder.with_function(a.clone()).build().run(&registry, &mut runtime).unwrap();
    assert_eq!(*calls.borrow(), ["in_a", "in_a", "in_b"]);
    assert_eq!(buffer.contents().lines().count(), 5);
}

#[test]
fn stored_configuration_runs_on_another_function() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.qdc");

    Builder::new()
        .with_action(Action::invoke(args![vec![1, 2, 3], 5]))
        .with_action(Action::invoke(args![vec![1], 1]))
        .with_action(Action::expect(vec![1, 2], args![vec![0, 1], 1]))
        .with_option(key::OUTPUT_FORMAT, VERBOSE_OUTPUT_FORMAT)
        .with_option(key::ERROR_FORMAT, VERBOSE_ERROR_FORMAT)
        .build()
        .store_to(&path)
        .unwrap();

    let (mut runtime, buffer, _) = runtime(Settings::default());
    shorthand::from_file(&add_to_list(), &path, &mut runtime).unwrap();

    assert_eq!(
        buffer.contents(),
        "add_to_list with arguments ([1, 2, 3], 5) produced result [6, 7, 8]\n\
         add_to_list with arguments ([1], 1) produced result [2]\n\
         Passed: add_to_list([0, 1], 1)\n"
    );

    let reloaded = Configuration::load_from(&path).unwrap();
    assert_eq!(reloaded.mismatch, None);
    let merged = reloaded
        .into_inner()
        .builder()
        .with_action(Action::invoke(args!["x"; number = 1]))
        .build();
    merged.run_on(&add_to_list(), &mut runtime).unwrap();
    assert!(buffer
        .contents()
        .ends_with("add_to_list with arguments (x, number=1) failed with TypeError: expected list, got str\n"));
}

#[test]
fn failures_escalate_to_exit() {
    let (mut runtime, buffer, exits) = runtime(Settings {
        exit_on_test_failure: true,
        ..Default::default()
    });

    let err = Builder::new()
        .with_action(Action::expect(2, args![1]))
        .with_action(Action::expect(0, args![1]))
        .with_action(Action::invoke(args![10]))
        .build()
        .run_on(&f(), &mut runtime)
        .unwrap_err();

    assert!(matches!(err, Error::ExitRequested { code } if code == FAILURE_EXIT_CODE));
    assert_eq!(*exits.borrow(), [FAILURE_EXIT_CODE]);
    assert_eq!(
        buffer.contents(),
        "Passed: f(1)\nFailed: f(1) = 2, expected 0\n"
    );
    assert_eq!(runtime.counters(), Counters { passed: 1, failed: 1 });
}

#[test]
fn silent_runtime_still_counts() {
    let (mut runtime, buffer, _) = runtime(Settings {
        disable_output: true,
        ..Default::default()
    });
    let configuration = Builder::new()
        .with_action(Action::expect(2, args![1]))
        .with_action(Action::expect_any(args!["nope"]))
        .build();

    configuration.run_on(&f(), &mut runtime).unwrap();
    runtime.print_test_summary().unwrap();
    assert_eq!(buffer.contents(), "");
    assert_eq!(runtime.counters(), Counters { passed: 1, failed: 1 });

    runtime.disable_output(false);
    runtime.print_test_summary().unwrap();
    runtime.reset_test_summary();
    runtime.print_test_summary().unwrap();
    assert_eq!(
        buffer.contents(),
        "1 tests passed, 1 tests failed.\n0 tests passed, 0 tests failed.\n"
    );
}

#[test]
fn deferred_arguments_resolve_once_per_container() {
    let evaluations = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&evaluations);
    let bindings = Bindings::new().with("start", move || {
        *counter.borrow_mut() += 1;
        Value::from(40)
    });
    let (runtime, buffer, _) = runtime(Settings::default());
    let mut runtime = runtime.with_bindings(bindings);

    let configuration = Builder::new()
        .with_action(Action::invoke(args![lazy("start")]))
        .with_action(Action::expect(41, args![lazy("start")]))
        .build();
    configuration.run_on(&f(), &mut runtime).unwrap();
    configuration.run_on(&f(), &mut runtime).unwrap();

    assert_eq!(*evaluations.borrow(), 2);
    assert_eq!(
        buffer.contents(),
        "f(40) -> 41\nPassed: f(40)\nf(40) -> 41\nPassed: f(40)\n"
    );
}

#[test]
fn group_outcomes_use_the_configured_formatter() {
    let (runtime, buffer, _) = runtime(Settings::default());
    let mut runtime = runtime.with_formatter(
        "arrow",
        |outcome: &quickdemo::outcome::CallOutcome<'_>, w: &mut dyn std::io::Write| {
            let result = outcome.return_value.as_ref().map_err(|raised| raised.kind.name());
            writeln!(w, "{} => {:?}", outcome.target.name(), result.map(ToString::to_string))
        },
    );
    let mut registry = GroupRegistry::new();
    registry.register(&f(), ["math"]).register(&pairwise(), ["math", "lists"]);

    GroupBuilder::new()
        .with_group("math")
        .with_argument_sets([args![1], args![vec![1, 2]]])
        .with_formatter(FormatterRef::Named("arrow".into()))
        .build()
        .run(&registry, &mut runtime)
        .unwrap();

    assert_eq!(
        buffer.contents(),
        "f => Ok(\"2\")\n\
         f => Err(\"TypeError\")\n\
         pairwise => Err(\"TypeError\")\n\
         pairwise => Ok(\"[(1, 2)]\")\n"
    );
}

#[test]
fn version_mismatch_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.qdc");
    std::fs::write(&path, r#"[1, [[{"Invoke": {"arguments": {"positional": [{"Literal": {"Int": 1}}], "keywords": []}}}], {}]]"#)
        .unwrap();

    let logs = Buffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let decoded = tracing::subscriber::with_default(subscriber, || Configuration::load_from(&path)).unwrap();

    assert_eq!(decoded.mismatch.map(|mismatch| mismatch.found), Some(1));
    assert_eq!(decoded.value.actions().len(), 1);
    assert_eq!(
        sanitize_log_output(&logs.contents(), dir.path()),
        "<time> DEBUG quickdemo::codec: loaded configuration path=<tmp>/old.qdc version=1\n\
         <time> WARN quickdemo::codec: configuration was stored with format version 1, expected version 2, results may be inconsistent\n"
    );
}
