use env_logger::Env;
use log::{debug, error};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::io::{self, IsTerminal, Read};
use stepwise_simplify::{
    parse_text,
    print,
    step_through,
    Callback,
    Dialect,
    PrintOptions,
    PrintOptionsBuilder,
    SimplifyOptions,
    SimplifyOptionsBuilder,
    Step,
};

/// Command-line settings.
#[derive(Debug, Default)]
struct Config {
    print: PrintOptions,
    simplify: SimplifyOptions,
    debug: bool,

    /// Expressions given on the command line, simplified instead of reading input.
    expressions: Vec<String>,
}

impl Config {
    fn from_args(args: impl Iterator<Item = String>) -> Self {
        let mut print = PrintOptionsBuilder::new();
        let mut simplify = SimplifyOptionsBuilder::new();
        let mut debug = false;
        let mut expressions = Vec::new();

        for arg in args {
            match arg.as_str() {
                "--latex" => print = print.dialect(Dialect::Latex),
                "--show-plus-minus" => print = print.show_plus_minus(true),
                "--decimal" => simplify = simplify.decimal_output(true),
                "--debug" => debug = true,
                _ => expressions.push(arg),
            }
        }

        Self {
            print: print.build(),
            simplify: simplify.debug(debug).build(),
            debug,
            expressions,
        }
    }
}

/// Prints a step and its substeps, indenting substeps under their parent.
fn print_step(step: &Step, options: &PrintOptions, depth: usize) {
    println!("{:indent$}{}: {}", "", step.change_type, options.render(&step.root), indent = depth * 4);
    for substep in &step.substeps {
        print_step(substep, options, depth + 1);
    }
}

/// Parses and simplifies the input, printing every step as it is made, or the error that stopped
/// it.
fn run(input: &str, config: &Config) {
    let node = match parse_text(input) {
        Ok(node) => node,
        Err(err) => {
            if let Err(io_err) = err.report_to_stderr("input", input) {
                error!("could not print the error: {}", io_err);
            }
            return;
        },
    };

    // errors from the simplifier point into the rendering of the input
    let source = print::ascii(&node);
    let mut steps = Callback(|step: Step| print_step(&step, &config.print, 0));
    match step_through(node, &config.simplify, &mut steps) {
        Ok(result) => debug!("simplified `{}` to `{}`", input.trim(), result),
        Err(err) => {
            if let Err(io_err) = err.report_to_stderr("input", &source) {
                error!("could not print the error: {}", io_err);
            }
        },
    }
}

fn main() {
    let config = Config::from_args(std::env::args().skip(1));
    let filter = if config.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    if !config.expressions.is_empty() {
        for (i, expression) in config.expressions.iter().enumerate() {
            if i > 0 {
                println!();
            }
            run(expression, &config);
        }
    } else if !io::stdin().is_terminal() {
        // one expression per line
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            error!("could not read stdin: {}", err);
            return;
        }

        for line in input.lines().filter(|line| !line.trim().is_empty()) {
            run(line, &config);
        }
    } else {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                error!("could not start the editor: {}", err);
                return;
            },
        };

        fn process_line(rl: &mut DefaultEditor, config: &Config) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            run(&input, config);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &config) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
