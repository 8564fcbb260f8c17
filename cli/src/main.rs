use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use parg_core::{Command as ParsedCommand, Grammar, check_grammar, simple_parse};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Output format for parse results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "parg")]
#[command(about = "Classify command-line tokens into an action, arguments and flags")]
struct Cli {
    /// Log each classification step to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens without a grammar.
    Simple(SimpleArgs),
    /// Parse tokens against a grammar file.
    Validate(ValidateArgs),
    /// Check a grammar file for declaration mistakes.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct TokenArgs {
    /// Program name placed before the tokens.
    #[arg(long, default_value = "prog")]
    program: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to classify, as the program would receive them.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct SimpleArgs {
    #[command(flatten)]
    tokens: TokenArgs,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Grammar file (JSON or YAML).
    #[arg(long)]
    grammar: PathBuf,
    #[command(flatten)]
    tokens: TokenArgs,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Grammar file (JSON or YAML).
    #[arg(long)]
    grammar: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Simple(args) => run_simple(args),
        Command::Validate(args) => run_validate(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run_simple(args: SimpleArgs) -> Result<(), String> {
    let argv = args.tokens.argv();
    let command = simple_parse(&argv);
    print_command(&command, args.tokens.format)
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let grammar = load_checked_grammar(&args.grammar)?;
    let argv = args.tokens.argv();
    let command = grammar.validate(&argv).map_err(|err| err.to_string())?;
    print_command(&command, args.tokens.format)
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    load_checked_grammar(&args.grammar)?;
    println!("Grammar '{}' is valid.", args.grammar.display());
    Ok(())
}

fn load_checked_grammar(path: &Path) -> Result<Grammar, String> {
    let grammar = Grammar::load(path)
        .map_err(|err| format!("Failed to load grammar '{}': {err}", path.display()))?;

    let errors = check_grammar(&grammar);
    if !errors.is_empty() {
        let details = errors
            .iter()
            .map(|err| format!("  - {err}"))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(format!(
            "Grammar '{}' has {} error(s):\n{details}",
            path.display(),
            errors.len()
        ));
    }

    debug!(
        path = %path.display(),
        commands = grammar.allowed_commands.len(),
        "Grammar checked"
    );
    Ok(grammar)
}

fn print_command(command: &ParsedCommand, format: CliOutputFormat) -> Result<(), String> {
    let rendered = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(command)
            .map_err(|err| format!("Failed to serialize result: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(command)
            .map_err(|err| format!("Failed to serialize result: {err}"))?,
    };
    println!("{rendered}");
    Ok(())
}

impl TokenArgs {
    fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.tokens.iter().map(String::as_str))
            .collect()
    }
}
