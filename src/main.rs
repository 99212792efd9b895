use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::{self, IsTerminal};
use std::path::{Path as FsPath, PathBuf};
use std::process::ExitCode;

use pathquill::config::{Config, OutputFormat};
use pathquill::file::loader::{load_document, load_document_from_stdin};
use pathquill::file::saver::{render_document, save_document};
use pathquill::path::join_segments;
use pathquill::{Path, Segment};

/// PathQuill - Read, write and match nested YAML/JSON data with path patterns
#[derive(Parser)]
#[command(name = "pathquill")]
#[command(version)]
#[command(about = "Read, write and match nested YAML/JSON data with path patterns", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format: yaml or json (default from config)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value at a path
    Get {
        pattern: String,
        /// Document to read (omit to read from stdin)
        file: Option<PathBuf>,
    },
    /// Set the value at a path; VALUE is parsed as YAML
    Set {
        pattern: String,
        value: String,
        file: Option<PathBuf>,
        /// Write the result back to FILE instead of printing it
        #[arg(short, long)]
        in_place: bool,
    },
    /// Remove the value at a path
    Delete {
        pattern: String,
        file: Option<PathBuf>,
        #[arg(short, long)]
        in_place: bool,
    },
    /// Check whether a path exists (exit status 1 when it does not)
    Exists {
        pattern: String,
        file: Option<PathBuf>,
    },
    /// Match a candidate path against a pattern and print the score
    Match { pattern: String, candidate: String },
    /// Show how a pattern compiles
    Parse { pattern: String },
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}

/// Loads the document from FILE, or from stdin when it is piped.
fn load_input(file: Option<&FsPath>) -> Result<Value> {
    match file {
        Some(path) => {
            load_document(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None if io::stdin().is_terminal() => {
            bail!("No input: pass a FILE or pipe a document on stdin")
        }
        None => load_document_from_stdin(),
    }
}

fn write_output(document: &Value, file: Option<&FsPath>, in_place: bool, config: &Config) -> Result<()> {
    if in_place {
        let Some(path) = file else {
            bail!("--in-place requires a FILE");
        };
        save_document(path, document, config)
            .with_context(|| format!("Failed to save {}", path.display()))
    } else {
        print!("{}", render_document(document, config.output_format, config)?);
        Ok(())
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load();
    if let Some(format) = cli.format {
        config.output_format = format;
    }

    match cli.command {
        Command::Get { pattern, file } => {
            let document = load_input(file.as_deref())?;
            match pathquill::get_in(&document, pattern.as_str())? {
                Some(value) => {
                    print!("{}", render_document(&value, config.output_format, &config)?);
                }
                None => {
                    eprintln!("No value at '{}'", pattern);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Set {
            pattern,
            value,
            file,
            in_place,
        } => {
            let mut document = load_input(file.as_deref())?;
            let value: Value = serde_yaml::from_str(&value).context("Failed to parse VALUE as YAML")?;
            pathquill::set_in(&mut document, pattern.as_str(), value)?;
            write_output(&document, file.as_deref(), in_place, &config)?;
        }
        Command::Delete {
            pattern,
            file,
            in_place,
        } => {
            let mut document = load_input(file.as_deref())?;
            pathquill::delete_in(&mut document, pattern.as_str())?;
            write_output(&document, file.as_deref(), in_place, &config)?;
        }
        Command::Exists { pattern, file } => {
            let document = load_input(file.as_deref())?;
            let exists = pathquill::exist_in(&document, pattern.as_str(), 0)?;
            println!("{}", exists);
            if !exists {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Match { pattern, candidate } => {
            let path = Path::parse(pattern.as_str())?;
            let record = path.match_record(candidate.as_str())?;
            println!("matched: {}", record.matched);
            println!("score: {}", record.score);
        }
        Command::Parse { pattern } => {
            let path = Path::new(pattern.as_str())?;
            println!("entire: {}", path.entire());
            println!("match pattern: {}", path.is_match_pattern());
            println!("wildcard: {}", path.is_wild_match_pattern());
            println!("exclusion: {}", path.have_exclude_pattern());
            if path.is_match_pattern() {
                if let Some(tree) = path.tree() {
                    println!("tree: {:#?}", tree);
                }
            } else {
                let segments: Vec<String> = path.segments().iter().map(|s| format!("{:?}", s)).collect();
                println!("segments: [{}]", segments.join(", "));
                for destructor in path.segments().iter().filter_map(Segment::as_destructor) {
                    println!("destructor {} ({:?}):", destructor.source(), destructor.kind());
                    for rule in destructor.rules() {
                        println!("  {} <- {}", join_segments(&rule.key), join_segments(&rule.path));
                    }
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
