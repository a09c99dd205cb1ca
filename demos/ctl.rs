//! # CTL model checking on small hand-built Kripke structures
//!
//! Builds one of a few built-in models, checks a fixed batch of formulas and
//! prints the satisfaction set of each one.
//!
//! ```text
//! lecture:                       mutex (two processes, one critical section):
//!   s1 {p}    -> s1, s2, s3        n1n2 -> t1n2, n1t2
//!   s2 {p,q}  -> s1, s2, s3        t1n2 -> c1n2, t1t2
//!   s3 {p,q}  -> s4, s5            c1n2 -> n1n2, c1t2
//!   s4 {}     -> s1, s6
//!   s5 {q}    -> s4, s6
//!   s6 {q}    -> s1, s2
//! ```
//!
//! With `--broken-ef`, `EF` is replaced by an operator that returns no states,
//! which shows how a custom operator changes the result of every formula that
//! uses it (and of no other).
//!
//! Run with: `cargo run --example ctl -- --model mutex --debug`

use std::collections::HashSet;

use clap::{Parser, ValueEnum};
use log::info;

use ctl_rs::{CheckOptions, Checker, CtlFormula, Model, SatSet, State};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelKind {
    Lecture,
    Mutex,
}

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Model to check.
    #[arg(long, value_enum, default_value = "lecture")]
    model: ModelKind,

    /// Log every fixpoint round.
    #[clap(long)]
    debug: bool,

    /// Cap on changing fixpoint passes.
    #[clap(long, value_name = "INT")]
    max_rounds: Option<usize>,

    /// Replace EF with an operator that returns the empty set.
    #[clap(long)]
    broken_ef: bool,

    /// Log level.
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn lecture() -> ctl_rs::Result<Model> {
    Model::new(
        [
            State::new("s1", ["p"]),
            State::new("s2", ["p", "q"]),
            State::new("s3", ["p", "q"]),
            State::new("s4", Vec::<String>::new()),
            State::new("s5", ["q"]),
            State::new("s6", ["q"]),
        ],
        [
            ("s1", vec!["s1", "s2", "s3"]),
            ("s2", vec!["s1", "s2", "s3"]),
            ("s3", vec!["s4", "s5"]),
            ("s4", vec!["s1", "s6"]),
            ("s5", vec!["s4", "s6"]),
            ("s6", vec!["s1", "s2"]),
        ],
    )
}

/// Two processes cycling through non-critical, trying and critical.
/// A process may enter only while the other one is not critical.
fn mutex() -> ctl_rs::Result<Model> {
    let phases = ["n", "t", "c"];
    let mut states = Vec::new();
    let mut transitions = Vec::new();

    for a in phases {
        for b in phases {
            if a == "c" && b == "c" {
                continue;
            }
            let name = format!("{}1{}2", a, b);
            states.push(State::new(name.clone(), [format!("{}1", a), format!("{}2", b)]));

            let step = |x: &str, other: &str| match x {
                "n" => Some("t"),
                "t" if other != "c" => Some("c"),
                "t" => None,
                _ => Some("n"),
            };
            let mut succ = Vec::new();
            if let Some(a2) = step(a, b) {
                if !(a2 == "c" && b == "c") {
                    succ.push(format!("{}1{}2", a2, b));
                }
            }
            if let Some(b2) = step(b, a) {
                if !(a == "c" && b2 == "c") {
                    succ.push(format!("{}1{}2", a, b2));
                }
            }
            transitions.push((name, succ));
        }
    }

    Model::new(states, transitions)
}

fn formulas(kind: ModelKind) -> Vec<CtlFormula> {
    let var = CtlFormula::var;
    match kind {
        ModelKind::Lecture => vec![
            var("p").ef(),
            var("p").eg(),
            var("q").af(),
            var("q").au(var("p")),
            var("p").eu(var("q").not()),
            var("p").ex().ax(),
            var("p").implies(var("q").af()).ag(),
        ],
        ModelKind::Mutex => vec![
            // Safety: never both critical.
            var("c1").and(var("c2")).not().ag(),
            // Liveness: fails, process 2 can overtake forever.
            var("t1").implies(var("c1").af()).ag(),
            // Non-blocking: a process can always try.
            var("n1").implies(var("t1").ex()).ag(),
            var("c1").ef().ag(),
        ],
    }
}

fn show(set: &HashSet<String>) -> String {
    let mut names: Vec<&str> = set.iter().map(String::as_str).collect();
    names.sort_unstable();
    format!("{{{}}}", names.join(", "))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    println!("args = {:?}", args);

    let model = match args.model {
        ModelKind::Lecture => lecture()?,
        ModelKind::Mutex => mutex()?,
    };
    info!("model has {} states", model.len());

    let mut checker = Checker::new(&model);
    if args.broken_ef {
        checker.set_custom("EF", |_, _| Ok(SatSet::new()))?;
    }
    let custom: Vec<_> = checker.registry().installed().map(|op| op.to_string()).collect();
    info!("custom operators: [{}], modified: {}", custom.join(", "), checker.is_modified());
    let initial = checker.model().states().next().map(|s| s.name().to_string()).unwrap_or_default();

    let options = CheckOptions {
        debug: args.debug,
        max_rounds: args.max_rounds,
    };

    for f in formulas(args.model) {
        let sat = checker.check_with(&f, &options)?;
        let holds = sat.contains(&initial);
        println!("{:<40} {} (holds in {}: {})", f.to_string(), show(&sat), initial, holds);
    }

    println!("Done in {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
