use std::{
    fs,
    io::{self, BufReader},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use calcline::{
    repl::{self, ReplConfig, DEFAULT_PROMPT},
    CalcError, Repl, Scanner,
};

#[derive(Parser)]
#[command(author, version, about = "Evaluate `INTEGER OPERATOR INTEGER` one line at a time")]
struct Args {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive session
    Repl {
        #[arg(long, default_value = DEFAULT_PROMPT)]
        prompt: String,
        /// Do not record entered lines in the session history
        #[arg(long)]
        no_history: bool,
    },
    /// Evaluate a single expression
    Eval { source: String },
    /// Evaluate every line of a file
    Run { script: PathBuf },
    /// Print the token stream for a line
    Tokens { source: String },
}

fn main() -> Result<ExitCode, CalcError> {
    let args = Args::parse();
    init_logging(args.verbose);

    let command = args.command.unwrap_or(Command::Repl {
        prompt: DEFAULT_PROMPT.to_string(),
        no_history: false,
    });
    match command {
        Command::Repl { prompt, no_history } => {
            let mut repl = Repl::with_config(ReplConfig {
                prompt,
                history: !no_history,
            });
            repl.run()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Eval { source } => match calcline::evaluate(&source) {
            Ok(value) => {
                println!("{value}");
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("{}", err.diagnostic().render(&source));
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Run { script } => {
            let file = fs::File::open(&script)?;
            let summary = repl::run_lines(
                BufReader::new(file),
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            )?;
            if summary.failed > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Tokens { source } => {
            for token in Scanner::new(&source) {
                match token {
                    Ok(token) => println!("{token}"),
                    Err(err) => {
                        eprintln!("{}", calcline::EvalError::from(err).diagnostic().render(&source));
                        return Ok(ExitCode::FAILURE);
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(level)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}
