//! secat - catalog inspection tool

use std::env;
use std::io::{self, Write};
use std::process;

use anyhow::{bail, Context, Result};
use secat::catalog::{Catalog, ReadOptions};
use secat::config;
use tracing_subscriber::EnvFilter;

/// Print help message
fn print_help() {
    println!(
        r#"
Usage: secat [options] <command> <args>

Commands:
  info <catalog>               Rows, columns and per-column type/format
  schema <catalog>             Column specs as JSON
  header <catalog>             Header rebuilt from the column declarations
  cat <catalog>                Reformatted catalog on stdout
  copy <in> <out> [--force]    Read a catalog and write it back
  config <file.sex>            Parsed SExtractor configuration

Options:
  --preserve-case              Keep column names as written
  --sample <N|all>             Rows checked per column for type inference
  --comment <c>                Comment marker (default '#')
  --fs <c>                     Field separator (default: whitespace)
  --indef <text>               Replacement for INDEF values
  -h, --help                   Show this help message
"#
    );
}

/// Parsed command line
struct Args {
    options: ReadOptions,
    force: bool,
    positional: Vec<String>,
}

fn single_char(flag: &str, value: Option<String>) -> Result<char> {
    let value = value.with_context(|| format!("{} needs a value", flag))?;
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("{} takes a single character, got '{}'", flag, value),
    }
}

fn parse_args() -> Result<Args> {
    let mut options = ReadOptions::new();
    let mut force = false;
    let mut positional = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "--preserve-case" => options = options.preserve_case(true),
            "--force" | "-f" => force = true,
            "--sample" => {
                let value = args.next().context("--sample needs a value")?;
                options = if value == "all" {
                    options.check_all_rows()
                } else {
                    let n = value
                        .parse()
                        .with_context(|| format!("invalid sample size '{}'", value))?;
                    options.sample_size(n)
                };
            }
            "--comment" => options = options.comment_marker(single_char("--comment", args.next())?),
            "--fs" => options = options.field_separator(single_char("--fs", args.next())?),
            "--indef" => {
                let value = args.next().context("--indef needs a value")?;
                options = options.indef(value);
            }
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            other => positional.push(other.to_string()),
        }
    }

    Ok(Args {
        options,
        force,
        positional,
    })
}

fn load(path: &str, options: &ReadOptions) -> Result<Catalog> {
    let catalog = Catalog::load_with(path, options)
        .with_context(|| format!("failed to read catalog '{}'", path))?;
    for rename in catalog.renames() {
        eprintln!(
            "--Column '{}' read in as '{}' to avoid conflicts",
            rename.from, rename.to
        );
    }
    Ok(catalog)
}

/// Print a per-column summary
fn print_info(catalog: &Catalog) {
    println!(
        "{} row(s), {} column(s)",
        catalog.row_count(),
        catalog.column_count()
    );

    let width = catalog
        .column_names()
        .iter()
        .map(|n| n.len())
        .max()
        .unwrap_or(4)
        .max(4);
    println!("{:>5}  {:<width$}  {:<6}  {:<8}", "#", "NAME", "TYPE", "FORMAT");
    for spec in catalog.column_specs() {
        println!(
            "{:>5}  {:<width$}  {:<6}  {:<8}",
            spec.index,
            spec.name,
            spec.column_type.to_string(),
            spec.format.to_string()
        );
    }
}

fn run(args: Args) -> Result<()> {
    let Args {
        options,
        force,
        positional,
    } = args;
    let positional: Vec<&str> = positional.iter().map(String::as_str).collect();

    match positional.as_slice() {
        ["info", path] => print_info(&load(path, &options)?),
        ["schema", path] => {
            let catalog = load(path, &options)?;
            let specs: Vec<_> = catalog.column_specs().collect();
            println!("{}", serde_json::to_string_pretty(&specs)?);
        }
        ["header", path] => print!("{}", load(path, &options)?.build_header()),
        ["cat", path] => {
            let catalog = load(path, &options)?;
            let stdout = io::stdout();
            catalog.write_to(stdout.lock())?;
        }
        ["copy", input, output] => {
            let catalog = load(input, &options)?;
            catalog
                .write(output, force)
                .with_context(|| format!("failed to write '{}'", output))?;
            println!("{} row(s) written to {}", catalog.row_count(), output);
        }
        ["config", path] => {
            let settings = config::load_config(path)
                .with_context(|| format!("failed to read configuration '{}'", path))?;
            let mut stdout = io::stdout().lock();
            for (keyword, values) in &settings {
                writeln!(stdout, "{:<20} {}", keyword, values.join(", "))?;
            }
        }
        [] => print_help(),
        [command, ..] => bail!("unknown command or wrong arguments: '{}'", command),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let result = parse_args().and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
