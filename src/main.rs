use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use env_logger::Builder;
use log::{debug, info};

use sbml::ast_printer;
use sbml::interpreter::Interpreter;
use sbml::parser::Parser;
use sbml::scanner;
use sbml::SbmlError;

/// Exit status after a syntax error.
const EXIT_SYNTAX: u8 = 65;

/// Exit status after a semantic error.
const EXIT_SEMANTIC: u8 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "SBML language interpreter", long_about = None)]
pub struct Cli {
    /// Source file to run
    filename: PathBuf,

    /// Enable logging to app.log
    #[arg(long)]
    log: bool,

    /// Print the token stream as JSON lines instead of running
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the parsed tree instead of running
    #[arg(long)]
    ast: bool,
}

/// Reads the whole file as UTF‑8 text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    let text = String::from_utf8(buf)
        .map_err(SbmlError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))?;

    Ok(text)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'sbml::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("sbml::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Prints the fixed diagnostic for a halted run and picks the exit status.
fn report(err: &SbmlError) -> ExitCode {
    debug!("Run halted: {}", err);

    println!("{}", err.diagnostic());

    if err.is_syntax() {
        ExitCode::from(EXIT_SYNTAX)
    } else {
        ExitCode::from(EXIT_SEMANTIC)
    }
}

fn dump_tokens(source: &str) -> std::result::Result<(), SbmlError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for token in scanner::tokenize(source)? {
        let json = serde_json::to_string(&token).map_err(io::Error::from)?;
        writeln!(out, "{}", json)?;
    }

    Ok(())
}

fn run(args: &Cli, source: &str) -> std::result::Result<(), SbmlError> {
    if args.tokens {
        info!("Dumping tokens");
        return dump_tokens(source);
    }

    let tokens = scanner::tokenize(source)?;
    let sections = Parser::new(&tokens).parse()?;

    info!("Parsed {} sections", sections.len());

    if args.ast {
        print!("{}", ast_printer::render_program(&sections));
        return Ok(());
    }

    let mut interpreter = Interpreter::new();
    interpreter.interpret(&sections)
}

fn main() -> Result<ExitCode> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let source = read_file(&args.filename)?;

    match sbml::with_run_stack(|| run(&args, &source))? {
        Ok(()) => {
            info!("Program executed successfully");
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ (SbmlError::Syntax { .. } | SbmlError::Semantic { .. })) => Ok(report(&e)),
        Err(e) => Err(e.into()),
    }
}
