use quickdemo::{
    args,
    action::Action,
    demo::Builder,
    formatter::template::{VERBOSE_ERROR_FORMAT, VERBOSE_OUTPUT_FORMAT},
    kind::Kind,
    options::key,
    runtime::Runtime,
    shorthand,
    target::{CallResult, Raised, Target},
    value::Value,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quickdemo=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).compact())
        .init();
}

fn add_to_list(args: quickdemo::target::Args<'_>) -> CallResult {
    let number = args.named("number", 1)?.as_int()?;
    args.named("input_list", 0)?
        .as_seq()?
        .iter()
        .map(|item| -> CallResult { Ok(Value::from(item.as_int()? + number)) })
        .collect::<Result<Vec<_>, Raised>>()
        .map(Value::List)
}

fn add_to_list_alt(args: quickdemo::target::Args<'_>) -> CallResult {
    let number = args.named("number", 1)?.as_int()?;
    let input = args.named("input_list", 0)?.as_seq()?;
    let mut output = Vec::with_capacity(input.len());
    for item in input {
        output.push(Value::from(item.as_int()? + number));
    }
    Ok(Value::List(output))
}

fn main() -> quickdemo::Result<()> {
    init_logging();
    let mut runtime = Runtime::from_env();

    // Attach a few demos and checks directly to a function ...
    let add = Target::new("add_to_list", add_to_list);
    let add = shorthand::run(&add, args![vec![1, 2, 3], 5], &mut runtime)?;
    let add = shorthand::run(add, args![vec![1], 1], &mut runtime)?;
    let add = shorthand::expect(add, vec![1, 2], args![vec![0, 1], 1], &mut runtime)?;
    shorthand::expect_error(add, Kind::type_error(), args!["not a list", 1], &mut runtime)?;

    // ... or prepare a configuration with the builder and store it for later.
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("test.qdc");
    Builder::new()
        .with_action(Action::invoke(args![vec![1, 2, 3], 5]))
        .with_action(Action::invoke(args![vec![1], 1]))
        .with_action(Action::expect(vec![1, 2], args![vec![0, 1], 1]))
        .with_option(key::OUTPUT_FORMAT, VERBOSE_OUTPUT_FORMAT)
        .with_option(key::ERROR_FORMAT, VERBOSE_ERROR_FORMAT)
        .build()
        .store_to(&path)?;

    let alt = Target::new("add_to_list_alt", add_to_list_alt);
    shorthand::from_file(&alt, &path, &mut runtime)?;

    runtime.print_test_summary()
}
