//! Command-line interface for bnfnorm.
//!
//! Reads a grammar written in extended BNF and prints the equivalent plain
//! production rules.
//!
//! Usage:
//!   bnfnorm grammar.bnf                 - print rules with integer ids
//!   bnfnorm -t -f json grammar.bnf      - print rules as JSON, with names
//!   bnfnorm -v grammar.bnf              - only check the syntax

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use bnfnorm::{render, Format};

#[derive(Parser, Debug)]
#[command(version, about = "Normalize an extended BNF grammar into plain production rules")]
struct Args {
    /// BNF syntax file, `-` for standard input
    file: PathBuf,

    /// Preserve long terminals
    #[arg(short, long)]
    long: bool,

    /// Only verify whether the syntax is correct instead of printing out each rule
    #[arg(short, long)]
    verify: bool,

    /// Translate non-terminals (represented by an integer) to their names
    #[arg(short, long)]
    translate: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Bnf)]
    format: Format,

    /// Output file, standard output if omitted
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read standard input")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let src = read_source(&args.file)?;

    let grammar = match ebnf::parse(&src, args.long) {
        Ok(grammar) => grammar,
        Err(err) => {
            eprintln!("syntax error:\n{}", err.render(&src));
            process::exit(1);
        }
    };
    log::info!(
        "{} rules, {} non-terminals",
        grammar.rules.len(),
        grammar.names.len()
    );

    for (name, id) in grammar.unreachable_non_terminals() {
        log::warn!("no production rule for non-terminal <{}> ({})", name, id);
    }

    if args.verify {
        println!("syntax correct");
        return Ok(());
    }

    let output = render(&grammar, args.format, args.translate)?;
    match args.out {
        Some(path) => fs::write(&path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(output.as_bytes())
            .context("failed to write output")?,
    }
    Ok(())
}
