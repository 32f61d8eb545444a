#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::missing_errors_doc)]

mod diagnostic;
mod logging;

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;
use jsfront_parser::{ParserOptions, SourceType};
use miette::{IntoDiagnostic, Result};

/// Stack reserved per level of `--max-depth`, on top of a fixed base.
const STACK_PER_LEVEL: usize = 64 * 1024;
const STACK_BASE: usize = 8 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "jsfront")]
#[command(author, version, about = "Parse JavaScript and print its ESTree AST as JSON", long_about = None)]
struct Cli {
    /// Source file to parse; `-` or nothing reads stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Parse as a module instead of a script
    #[arg(long)]
    module: bool,

    /// Start in strict mode
    #[arg(long)]
    strict: bool,

    /// Reject legacy octal literals and escapes
    #[arg(long)]
    no_legacy_octal: bool,

    /// Reject `with` statements
    #[arg(long)]
    no_with: bool,

    /// Reject async functions and `await`
    #[arg(long)]
    no_async: bool,

    /// Reject generators and `yield`
    #[arg(long)]
    no_generators: bool,

    /// Accept `return` at the top level
    #[arg(long)]
    allow_return_outside_function: bool,

    /// Maximum nesting depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// JSON file with parser options (camelCase keys); flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the AST on one line
    #[arg(long)]
    compact: bool,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit log lines as JSON on stderr
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    /// Options from `--config`, then the flags on top.
    fn options(&self) -> Result<ParserOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
                serde_json::from_str(&text)
                    .map_err(|e| miette::miette!("Invalid options in {}: {}", path.display(), e))?
            }
            None => ParserOptions::default(),
        };

        if self.module {
            options.source_type = SourceType::Module;
        }
        if self.strict {
            options.strict = true;
        }
        if self.no_legacy_octal {
            options.allow_legacy_octal = false;
        }
        if self.no_with {
            options.allow_with = false;
        }
        if self.no_async {
            options.allow_async = false;
        }
        if self.no_generators {
            options.allow_generators = false;
        }
        if self.allow_return_outside_function {
            options.allow_return_outside_function = true;
        }
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
        Ok(options)
    }

    /// The file's display name and contents.
    fn read_source(&self) -> Result<(String, String)> {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => {
                let source = std::fs::read_to_string(path)
                    .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
                Ok((path.display().to_string(), source))
            }
            _ => {
                let mut source = String::new();
                std::io::stdin()
                    .read_to_string(&mut source)
                    .map_err(|e| miette::miette!("Failed to read stdin: {}", e))?;
                Ok(("<stdin>".to_string(), source))
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let options = cli.options()?;
    let (name, source) = cli.read_source()?;
    tracing::debug!(file = %name, bytes = source.len(), ?options, "parsing");

    let stack_size = STACK_BASE + STACK_PER_LEVEL * options.max_depth as usize;
    let (result, source) = std::thread::Builder::new()
        .name("parse".into())
        .stack_size(stack_size)
        .spawn(move || {
            let result = jsfront_parser::parse(&source, options);
            (result, source)
        })
        .into_diagnostic()?
        .join()
        .map_err(|_| miette::miette!("Parser thread panicked"))?;

    let program = match result {
        Ok(program) => program,
        Err(err) => {
            tracing::debug!(kind = %err.kind, offset = err.offset, "parse failed");
            return Err(diagnostic::report(&err, &name, source));
        }
    };

    let json = if cli.compact {
        serde_json::to_string(&program)
    } else {
        serde_json::to_string_pretty(&program)
    }
    .into_diagnostic()?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").into_diagnostic()?;
    stdout.flush().into_diagnostic()?;
    Ok(())
}
