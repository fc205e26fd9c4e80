//! regen - compile the unicodeit dataset into `src/data.rs`

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use unicodeit_datagen::{
    diagnostics::{check_dataset, format_diagnostics},
    is_up_to_date, regenerate, DatasetSource, FileDatasetSource, GenResult, RegenOptions,
    RegenOutcome, TableCompiler,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "regen")]
#[command(version)]
#[command(about = "Generate the unicodeit symbol tables from the upstream dataset", long_about = None)]
struct Cli {
    /// Dataset file (.json, .yaml or .toml)
    #[arg(default_value = "data/unicodeit.json")]
    dataset: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "src/data.rs")]
    output: PathBuf,

    /// Exit with an error if the output file is out of date, without writing it
    #[arg(long)]
    check: bool,

    /// Only lint the dataset, do not generate anything
    #[arg(long)]
    lint: bool,

    /// Strict mode: treat lint warnings as errors
    #[arg(long)]
    strict: bool,

    /// Skip parsing the generated file back before writing it
    #[arg(long)]
    no_verify: bool,

    /// Accept a dataset without any `{}`-suffixed replacement
    #[arg(long)]
    allow_missing_bracket_suffix: bool,

    /// Generator name recorded in the file header
    #[arg(long, default_value = "regen")]
    generator: String,

    /// Quiet mode: only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    no_color: bool,
}

#[cfg(feature = "cli")]
impl Cli {
    fn options(&self) -> RegenOptions {
        let mut options = if self.allow_missing_bracket_suffix {
            RegenOptions::lenient()
        } else {
            RegenOptions::default()
        };
        options.verify_round_trip = !self.no_verify;
        options.with_generator(self.generator.clone())
    }
}

#[cfg(feature = "cli")]
fn init_logging(quiet: bool) {
    let level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[cfg(feature = "cli")]
fn run(cli: &Cli) -> GenResult<()> {
    let source = FileDatasetSource::new(&cli.dataset);
    let dataset = source.load()?;

    let result = check_dataset(&dataset);
    let lint_failed = result.has_errors() || (cli.strict && result.warnings > 0);
    if cli.lint {
        println!("{}", format_diagnostics(&result, !cli.no_color));
        if lint_failed {
            std::process::exit(1);
        }
        return Ok(());
    }
    if lint_failed || (result.has_issues() && !cli.quiet) {
        eprintln!("{}", format_diagnostics(&result, !cli.no_color));
    }
    if lint_failed {
        eprintln!(
            "✗ {}: dataset has {}",
            source.describe(),
            result.summary()
        );
        std::process::exit(1);
    }

    if cli.check {
        let output = TableCompiler::new(cli.options()).compile(&dataset)?;
        if is_up_to_date(&cli.output, &output)? {
            eprintln!("✓ {} is up to date", cli.output.display());
            return Ok(());
        }
        eprintln!(
            "✗ {} is out of date; run `regen` to update it",
            cli.output.display()
        );
        std::process::exit(1);
    }

    let outcome = regenerate(&source, &cli.output, cli.options())?;
    match outcome {
        RegenOutcome::Updated(_) => eprintln!("✓ Output written to: {}", cli.output.display()),
        RegenOutcome::Unchanged(_) => {
            eprintln!("✓ Output written to: {} (unchanged)", cli.output.display())
        }
    }
    if !cli.quiet {
        for (table, count) in &outcome.output().counts {
            eprintln!("  {:<34} {:>5}", table, count);
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  regen [OPTIONS] [DATASET]");
    std::process::exit(1);
}
