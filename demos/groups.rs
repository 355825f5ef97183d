use quickdemo::{
    args,
    arguments::{Bindings, lazy},
    debug::{Indenter, catch},
    formatter::FormatterRef,
    group::{GroupBuilder, GroupRegistry},
    kind::Kind,
    runtime::Runtime,
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

fn sum(args: quickdemo::target::Args<'_>) -> CallResult {
    let mut total = 0;
    for value in args.positional() {
        total += value.as_int()?;
    }
    Ok(Value::from(total))
}

fn mean(args: quickdemo::target::Args<'_>) -> CallResult {
    let values = args.positional();
    if values.is_empty() {
        return Err(Raised::new(Kind::zero_division_error(), "mean of no values"));
    }
    let mut total = 0.0;
    for value in values {
        total += value.as_float()?;
    }
    Ok(Value::from(total / values.len() as f64))
}

fn main() -> quickdemo::Result<()> {
    init_logging();
    let bindings = Bindings::new().with("seven", || Value::from(7));
    let mut runtime = Runtime::from_env().with_bindings(bindings);

    let mut registry = GroupRegistry::new();
    registry
        .register(&Target::new("sum", sum), ["math", "aggregate"])
        .register(&Target::new("mean", mean), ["aggregate"]);

    let aggregate = GroupBuilder::new()
        .with_group("aggregate")
        .with_argument_sets([args![], args![1, 2, 3], args![lazy("seven"), 1]])
        .build();
    aggregate.run(&registry, &mut runtime)?;

    aggregate
        .builder()
        .with_formatter(FormatterRef::Template("{name} = {result}".into()))
        .build()
        .run(&registry, &mut runtime)?;

    let mut indenter = Indenter::default();
    let mut out = std::io::stderr();
    indenter.show(&mut out, "parsing")?;
    indenter.indent();
    indenter.show(&mut out, catch(|| "12".parse::<i32>()))?;
    indenter.show(&mut out, catch(|| "twelve".parse::<i32>()))?;
    indenter.dedent();
    indenter.show(&mut out, "done")?;
    Ok(())
}
