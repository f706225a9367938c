//! qstate - Quantum state repository shell
//! Command-line interface over a JSON-backed collection of named quantum states

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use num_complex::Complex64;
use qstate::{catalog, Operator, QuantumError, RepositoryConfig, StateRepository, Validation};
use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qstate")]
#[command(author, version)]
#[command(about = "qstate - named quantum state repository", long_about = None)]
struct Cli {
    /// JSON file holding the states
    #[arg(short, long, global = true, default_value = "states.json", env = "QSTATE_STORE")]
    store: PathBuf,

    /// Require operators to be unitary
    #[arg(long, global = true)]
    strict: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Save over the store even if some of its entries failed to load
    #[arg(long, global = true)]
    force: bool,

    #[command(subcommand)]
    command: Command,
}

/// A single line typed in the interactive shell
#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a state from its amplitudes (e.g. 0.6 0.8, 0.5+0.5i, -i, h -h)
    ///
    /// `h` and `-h` stand for ±1/√2. Options go before the amplitudes:
    /// `add q -b spin h -h`.
    #[command(disable_help_flag = true)]
    Add {
        /// State identifier
        #[arg(value_name = "ID")]
        id: String,

        /// Basis label
        #[arg(short, long)]
        basis: Option<String>,

        /// Amplitudes
        #[arg(value_name = "AMP", required = true, num_args = 1.., allow_hyphen_values = true)]
        amplitudes: Vec<String>,
    },

    /// Show one state
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Remove a state
    Remove {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List all states
    List,

    /// Apply an operator to a state
    Apply {
        /// Source state
        #[arg(value_name = "ID")]
        id: String,

        /// Built-in operator name, or the name of a custom --matrix
        #[arg(value_name = "OP")]
        operator: String,

        /// Identifier for the result (overwrites an existing state)
        #[arg(long = "as", value_name = "NEW_ID")]
        new_id: Option<String>,

        /// Custom matrix, rows separated by ';' and entries by ','
        #[arg(short, long, allow_hyphen_values = true)]
        matrix: Option<String>,
    },

    /// Show measurement probabilities of a state
    Measure {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List built-in operators
    Operators,

    /// Write all states to another file
    Export {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Replace all states with the contents of a file
    Import {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Interactive shell (one command per line, 'quit' to leave)
    Shell,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = RepositoryConfig::from_env();
    if cli.strict {
        config = config.with_validation(Validation::Unitary);
    }

    let result = Store::open(&cli.store, config, cli.force).and_then(|(store, mut repo)| {
        match cli.command {
            Command::Shell => shell(&mut repo, &store),
            command => {
                if run(&mut repo, command)? {
                    store.save(&repo)?;
                }
                Ok(())
            }
        }
    });

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "qstate=debug" } else { "qstate=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<QuantumError>() {
        Some(q) => eprintln!("{} {}", format!("error[{}]:", q.kind()).red().bold(), e),
        None => eprintln!("{} {:#}", "error:".red().bold(), e),
    }
}

// ============================================================================
// Store
// ============================================================================

/// Store file; read-only when it held entries that failed to load
struct Store {
    path: PathBuf,
    writable: bool,
}

impl Store {
    /// Loads the store (absent file = empty repository)
    fn open(path: &Path, config: RepositoryConfig, force: bool) -> Result<(Self, StateRepository)> {
        let mut repo = StateRepository::with_config(config);
        let mut writable = true;
        if path.exists() {
            let report = repo.load(path)?;
            if !report.is_clean() {
                eprintln!("{} {}", "warning:".yellow().bold(), report);
                if !force {
                    eprintln!(
                        "{} changes will not be saved over {}; pass --force to drop the skipped entries",
                        "warning:".yellow().bold(),
                        path.display()
                    );
                }
                writable = force;
            }
        }
        let store = Self {
            path: path.to_path_buf(),
            writable,
        };
        Ok((store, repo))
    }

    fn save(&self, repo: &StateRepository) -> Result<()> {
        if !self.writable {
            bail!(
                "refusing to overwrite {}: some of its entries failed to load (use --force)",
                self.path.display()
            );
        }
        repo.save(&self.path)?;
        Ok(())
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Runs one command; returns whether the repository changed
fn run(repo: &mut StateRepository, command: Command) -> Result<bool> {
    match command {
        Command::Add {
            id,
            amplitudes,
            basis,
        } => {
            let vector = parse_vector(&amplitudes)?;
            repo.add(&id, vector, basis.as_deref())?;
            println!("{} state '{}'", "Added".green().bold(), id.cyan());
            Ok(true)
        }

        Command::Show { id } => {
            println!("{}", repo.require(&id)?);
            Ok(false)
        }

        Command::Remove { id } => {
            repo.remove(&id)?;
            println!("{} state '{}'", "Removed".green().bold(), id.cyan());
            Ok(true)
        }

        Command::List => {
            match repo.list() {
                Some(lines) => lines.iter().for_each(|line| println!("{line}")),
                None => println!("{}", "No states registered.".dimmed()),
            }
            Ok(false)
        }

        Command::Apply {
            id,
            operator,
            new_id,
            matrix,
        } => {
            let result = match matrix {
                Some(text) => repo.apply_matrix(&id, &operator, parse_matrix(&text)?, new_id.as_deref())?,
                None => {
                    let op = builtin(&operator)?;
                    repo.apply(&id, &op, new_id.as_deref())?
                }
            };
            println!("{} {}", "Stored".green().bold(), result.to_string().cyan());
            Ok(true)
        }

        Command::Measure { id } => {
            print!("{}", repo.measure(&id)?);
            Ok(false)
        }

        Command::Operators => {
            for op in catalog::all() {
                let description = catalog::describe(op.name()).unwrap_or_default();
                println!("{:>3}  {}  {}", op.name().bold(), description.dimmed(), op);
            }
            Ok(false)
        }

        Command::Export { path } => {
            repo.save(&path)?;
            println!(
                "{} {} states to {}",
                "Exported".green().bold(),
                repo.len(),
                path.display().to_string().cyan()
            );
            Ok(false)
        }

        Command::Import { path } => {
            let report = repo.load(&path)?;
            println!("{} {}", "Imported".green().bold(), report);
            Ok(true)
        }

        Command::Shell => bail!("already in the interactive shell"),
    }
}

fn builtin(name: &str) -> Result<Operator> {
    match catalog::builtin(name) {
        Some(op) => Ok(op),
        None => bail!(
            "unknown operator '{}' (built-ins: {}); pass --matrix for a custom one",
            name,
            catalog::names().join(", ")
        ),
    }
}

// ============================================================================
// Interactive shell
// ============================================================================

fn shell(repo: &mut StateRepository, store: &Store) -> Result<()> {
    println!(
        "{} {} ({} states). Type 'help' for commands, 'quit' to leave.",
        "qstate shell".bold(),
        store.path.display().to_string().cyan(),
        repo.len()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", ">".cyan().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line.context("reading from stdin")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.first() {
            None => continue,
            Some(&("quit" | "exit")) => break,
            Some(_) => {}
        }

        let command = match ShellLine::try_parse_from(tokens.iter().copied()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // clap renders help/usage itself
                let _ = e.print();
                continue;
            }
        };

        match run(repo, command) {
            Ok(true) => {
                if let Err(e) = store.save(repo) {
                    report_error(&e);
                }
            }
            Ok(false) => {}
            Err(e) => report_error(&e),
        }
    }
    Ok(())
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses one amplitude: `0.6`, `-0.5+0.5i`, `-i`, `h`, `-h`, `1/sqrt2`, `0.5+0.5j`
fn parse_amplitude(text: &str) -> Result<Complex64> {
    let trimmed = text.trim();
    match trimmed {
        "h" | "+h" => return Ok(Complex64::new(FRAC_1_SQRT_2, 0.0)),
        "-h" => return Ok(Complex64::new(-FRAC_1_SQRT_2, 0.0)),
        _ => {}
    }
    let (number, scale) = match trimmed.strip_suffix("/sqrt2") {
        Some(rest) => (rest, 1.0 / SQRT_2),
        None => (trimmed, 1.0),
    };
    let number = match number.strip_suffix('j') {
        Some(rest) => format!("{rest}i"),
        None => number.to_string(),
    };
    let value: Complex64 = number
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid amplitude '{text}'"))?;
    Ok(value * scale)
}

fn parse_vector(items: &[String]) -> Result<Vec<Complex64>> {
    items.iter().map(|s| parse_amplitude(s)).collect()
}

/// Parses `a,b;c,d` into rows
fn parse_matrix(text: &str) -> Result<Vec<Vec<Complex64>>> {
    text.split(';')
        .map(|row| row.split(',').map(parse_amplitude).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid matrix '{text}'"))
}
