use clap::{Parser as ClapParser, Subcommand};
use simchange::cli::{self, CliError, CompileOptions, CompileOutcome};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::Level;

#[derive(ClapParser)]
#[command(name = "simchange")]
#[command(about = "simchange - Generate experiment-document changes and ranges from a compilation unit")]
#[command(version)]
struct Cli {
    /// Log every emitted node to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a unit and print the emitted document as JSON
    Compile {
        /// Compilation unit file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Finalize the changes of a unit without emitting anything
    Check {
        /// Compilation unit file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print every change of a unit in source form
    Show {
        /// Compilation unit file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Compile { input, pretty } => run_compile(input, pretty, false),
        Commands::Check { input } => run_compile(input, false, true),
        Commands::Show { input } => run_show(input),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_input(path: Option<PathBuf>) -> Result<Option<String>, CliError> {
    match path {
        Some(path) => Ok(Some(fs::read_to_string(path)?)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_compile(input: Option<PathBuf>, pretty: bool, check_only: bool) -> Result<(), CliError> {
    let options = CompileOptions {
        input: read_input(input)?,
        pretty,
        check_only,
    };

    // Warnings already reach stderr through the log subscriber
    match cli::execute_compile(&options)? {
        CompileOutcome::Valid { .. } => println!("Changes are valid"),
        CompileOutcome::Compiled { json, .. } => println!("{}", json),
    }
    Ok(())
}

fn run_show(input: Option<PathBuf>) -> Result<(), CliError> {
    let text = read_input(input)?.ok_or(CliError::NoInput)?;
    for line in cli::render_sources(&text)? {
        println!("{}", line);
    }
    Ok(())
}
