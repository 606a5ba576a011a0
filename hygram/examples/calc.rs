use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use hygram::prelude::*;
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Evaluate an arithmetic tree with a recursive grammar
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Tree to evaluate, e.g. "(plus 1 (negate 2))"
    #[arg(short, long)]
    pub code: Option<String>,

    /// Engine configuration (TOML). Defaults to $HYGRAM_CONFIG, then built-in defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also print the grammar
    #[arg(short, long, default_value_t = false)]
    pub grammar: bool,
}

/// Integer calculator: terminals are their value, the arithmetic tags recurse into their
/// operands and apply the builtin operator.
fn calculator(config: EngineConfig) -> Algorithm {
    let arith = |op: Op| {
        Grammar::binary(op, Grammar::recurse(), Grammar::recurse()).case_call(
            Action::op(op),
            [
                Action::invoke(Action::recurse(), Action::left()),
                Action::invoke(Action::recurse(), Action::right()),
            ],
        )
    };

    Algorithm::with_config(
        Grammar::switch([
            Grammar::terminal_of(LiteralKind::Int).case(Action::value()),
            arith(Op::Plus),
            arith(Op::Minus),
            arith(Op::Multiplies),
            arith(Op::Divides),
            arith(Op::Modulus),
            Grammar::unary(Op::Negate, Grammar::recurse())
                .case(Action::evaluate_with(Action::recurse())),
        ]),
        config,
    )
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_toml(path),
        None => EngineConfig::from_env(),
    }
    .expect("Failed to load the engine configuration");
    let calc = calculator(config);

    let src = args
        .code
        .unwrap_or_else(|| "(multiplies (plus 1 2) (negate (modulus 17 5)))".to_string());

    let mut error_color = ColorSpec::new();
    error_color.set_fg(Some(termcolor::Color::Red));
    error_color.set_intense(true);

    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut stdout = stdout.lock();

    if args.grammar {
        calc.grammar().pretty_render_to(80, &mut stdout).unwrap();
        writeln!(stdout).unwrap();
    }

    let expr = match parse(&src) {
        Ok(expr) => expr,
        Err(errors) => {
            stdout.set_color(&error_color).unwrap();
            for e in errors {
                writeln!(stdout, "{e}").unwrap();
            }
            stdout.reset().unwrap();
            std::process::exit(1);
        }
    };

    expr.pretty_render_to(80, &mut stdout).unwrap();
    writeln!(stdout).unwrap();
    match calc.call(&expr) {
        Ok(value) => writeln!(stdout, "= {value}").unwrap(),
        Err(e) => {
            stdout.set_color(&error_color).unwrap();
            writeln!(stdout, "error: {e}").unwrap();
            stdout.reset().unwrap();
            std::process::exit(1);
        }
    }
}
