use clap::Parser; // clap crate for CLI argument parsing
use log::{LevelFilter, Metadata, Record, info};
use model::Diagnostics;
use semantic::SymbolTable;
use std::{fs, path::PathBuf, process::ExitCode};

/*
Exit status:
  0  source analysed without any diagnostics
  1  lexical, syntax or semantic errors were reported
  2  the input could not be read or was empty
*/

#[derive(Parser, Debug)]
#[command(version, about = "Lexer and parser front end for a small C subset", long_about = None)]
struct Args {
    /// Path to the source file
    #[arg(short, long)]
    input: PathBuf,

    /// Print the token stream and stop
    #[arg(short, long)]
    tokens: bool,

    /// Print the global symbol table after parsing
    #[arg(short, long)]
    symbols: bool,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Writes log records to stderr as `[LEVEL - SOURCE]: message`, where the
/// source is the crate that emitted the record.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let source = record.target().split("::").next().unwrap_or_default();
        eprintln!("[{} - {}]: {}", record.level(), source.to_uppercase(), record.args());
    }

    fn flush(&self) {}
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let source = match fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", args.input.display(), err);
            return ExitCode::from(2);
        }
    };
    info!("read {} bytes from {}", source.len(), args.input.display());

    if args.tokens {
        return dump_tokens(&source);
    }

    let analysis = match parser::parse_source(&source) {
        Ok(analysis) => analysis,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(2);
        }
    };

    report(&analysis.diagnostics);

    if args.symbols {
        print_symbols(&analysis.symbols);
    }

    if analysis.is_ok() {
        println!(
            "ok: {} items, {} symbols in global scope",
            analysis.program.items.len(),
            analysis.symbols.scope_len(0)
        );
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn dump_tokens(source: &str) -> ExitCode {
    let (tokens, diagnostics) = lexer::lex(source);
    for token in &tokens {
        println!("{}:{} {} ({})", token.line, token.column, token, token.kind.code());
    }
    report(&diagnostics);

    if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.all() {
        eprintln!("{}", diagnostic);
    }
    if !diagnostics.is_empty() {
        eprintln!("{} error(s)", diagnostics.len());
    }
}

fn print_symbols(symbols: &SymbolTable) {
    for symbol in symbols.symbols_in_scope(0) {
        let kind = match symbol.kind {
            semantic::SymbolKind::Variable => "variable",
            semantic::SymbolKind::Parameter => "parameter",
            semantic::SymbolKind::Function => "function",
        };
        println!(
            "{:<16} {:<10} {:<10} line {}",
            symbol.name,
            kind,
            symbol.decl_type.to_string(),
            symbol.line
        );
    }
}
