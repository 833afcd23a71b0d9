//! rf-core - field-name redaction for logged payloads
//!
//! The main entry point for rf-core, handling:
//! - Registry artifact generation from the compiled schema (build time)
//! - Staleness checks of the committed artifact (CI)
//! - Redaction of JSON payloads against the loaded registry
//! - Registry inspection

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use rf_codegen::{GenerateOptions, GenerateReport};
use rf_common::artifact::ArtifactFormat;
use rf_common::config::GeneratorSection;
use rf_common::error::{format_error_human, StructuredError};
use rf_common::{Config, ConfigResolver, Error, OutputFormat, Result, Value};
use rf_core::exit_codes::ExitCode;
use rf_core::logging::{cli_level, init_logging, LogConfig, LogFormat};
use rf_redact::{RedactError, RedactionRegistry, Redactor};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Field-name redaction for logged request and response payloads
#[derive(Parser)]
#[command(name = "rf-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to config file (overrides RF_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the registry artifact from the compiled schema
    Generate(GeneratorArgs),

    /// Check that the committed artifact matches the schema
    Verify(GeneratorArgs),

    /// Redact a JSON payload against the registry
    Redact(RedactArgs),

    /// List the field names in the registry
    Registry(RegistryArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct GeneratorArgs {
    /// Compiled schema document (.json, .yaml or .yml)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Artifact output path
    #[arg(long)]
    out: Option<PathBuf>,

    /// Artifact rendering (inferred from the output path when omitted)
    #[arg(long, value_enum)]
    artifact_format: Option<ArtifactFormat>,

    /// Directive that marks a field as sensitive
    #[arg(long)]
    directive: Option<String>,
}

impl GeneratorArgs {
    /// Merge flags over the config section.
    fn options(&self, section: &GeneratorSection) -> GenerateOptions {
        let mut options = GenerateOptions::from(section);
        if let Some(ref schema) = self.schema {
            options.schema = schema.clone();
        }
        if let Some(ref out) = self.out {
            options.output = out.clone();
            options.format = section
                .format
                .or_else(|| ArtifactFormat::from_path(out))
                .unwrap_or_default();
        }
        if let Some(format) = self.artifact_format {
            options.format = format;
        }
        if let Some(ref directive) = self.directive {
            options.directive = directive.clone();
        }
        options
    }
}

#[derive(Args, Debug)]
struct RedactArgs {
    /// Registry artifact (TOML)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// JSON payload file, or '-' for stdin
    #[arg(long, default_value = "-")]
    input: PathBuf,

    /// Fail instead of printing an empty mapping when the payload cannot be copied
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct RegistryArgs {
    /// Registry artifact (TOML)
    #[arg(long)]
    registry: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Clean,
                _ => ExitCode::ArgsError,
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(
        cli_level(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    init_logging(&log_config);

    let result = match &cli.command {
        Commands::Generate(args) => run_generate(&cli.global, args),
        Commands::Verify(args) => run_verify(&cli.global, args),
        Commands::Redact(args) => run_redact(&cli.global, args),
        Commands::Registry(args) => run_registry(&cli.global, args),
        Commands::Version => print_version(&cli.global),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => output_error(&cli.global, &err),
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn load_config(global: &GlobalOpts) -> Result<Config> {
    let (config, source) = ConfigResolver::new(global.config.clone()).load()?;
    debug!(
        path = ?source.path,
        hash = ?source.hash,
        resolution = %source.resolution,
        "loaded configuration"
    );
    Ok(config)
}

fn run_generate(global: &GlobalOpts, args: &GeneratorArgs) -> Result<ExitCode> {
    let config = load_config(global)?;
    let options = args.options(&config.generator);
    let report = rf_codegen::generate(&options)?;
    output_report(global, "generate", "written", &report)?;
    Ok(ExitCode::Clean)
}

fn run_verify(global: &GlobalOpts, args: &GeneratorArgs) -> Result<ExitCode> {
    let config = load_config(global)?;
    let options = args.options(&config.generator);
    let report = rf_codegen::verify(&options)?;
    output_report(global, "verify", "clean", &report)?;
    Ok(ExitCode::Clean)
}

fn run_redact(global: &GlobalOpts, args: &RedactArgs) -> Result<ExitCode> {
    let config = load_config(global)?;
    let registry_path = args
        .registry
        .clone()
        .unwrap_or_else(|| config.registry.path.clone());
    let registry = RedactionRegistry::load(&registry_path)?;

    let redactor = Redactor::new(registry);

    let input = read_input(&args.input)?;
    let payload: Value = serde_json::from_str(&input)?;
    debug!(
        input = %args.input.display(),
        kind = payload.kind(),
        depth = payload.depth(),
        "decoded payload"
    );

    let redacted = if args.strict {
        redactor
            .try_redact(&payload)
            .map_err(|e| Error::from(RedactError::from(e)))?
    } else {
        redactor.redact(&payload)
    };

    let rendered = match global.format {
        OutputFormat::Compact => serde_json::to_string(&redacted)?,
        OutputFormat::Json | OutputFormat::Text => serde_json::to_string_pretty(&redacted)?,
    };
    println!("{}", rendered);
    Ok(ExitCode::Clean)
}

fn run_registry(global: &GlobalOpts, args: &RegistryArgs) -> Result<ExitCode> {
    let config = load_config(global)?;
    let path = args
        .registry
        .clone()
        .unwrap_or_else(|| config.registry.path.clone());
    let registry = RedactionRegistry::load(&path)?;
    let fields = registry.sorted_names();

    match global.format {
        OutputFormat::Text => {
            for field in &fields {
                println!("{}", field);
            }
        }
        format => {
            let output = serde_json::json!({
                "path": path,
                "count": fields.len(),
                "fields": fields,
            });
            print_json(format, &output)?;
        }
    }
    Ok(ExitCode::Clean)
}

fn print_version(global: &GlobalOpts) -> Result<ExitCode> {
    match global.format {
        OutputFormat::Text => {
            println!("rf-core {}", env!("CARGO_PKG_VERSION"));
        }
        format => {
            let version_info = serde_json::json!({
                "rf_core_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            print_json(format, &version_info)?;
        }
    }
    Ok(ExitCode::Clean)
}

// ============================================================================
// Output helpers
// ============================================================================

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn print_json(format: OutputFormat, value: &serde_json::Value) -> Result<()> {
    let rendered = match format {
        OutputFormat::Compact => serde_json::to_string(value)?,
        OutputFormat::Json | OutputFormat::Text => serde_json::to_string_pretty(value)?,
    };
    println!("{}", rendered);
    Ok(())
}

fn output_report(
    global: &GlobalOpts,
    command: &str,
    status: &str,
    report: &GenerateReport,
) -> Result<()> {
    match global.format {
        OutputFormat::Text => {
            println!(
                "{}: {} ({} redacted fields, {})",
                status,
                report.output.display(),
                report.fields.len(),
                report.format
            );
            Ok(())
        }
        format => {
            let output = serde_json::json!({
                "command": command,
                "status": status,
                "report": report,
            });
            print_json(format, &output)
        }
    }
}

fn output_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    let exit_code = ExitCode::for_error(err);

    match global.format {
        OutputFormat::Text => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(err, use_color));
        }
        OutputFormat::Json | OutputFormat::Compact => {
            let structured = StructuredError::from(err);
            let response = serde_json::json!({
                "status": "error",
                "exit_code": exit_code.as_i32(),
                "exit_code_name": exit_code.code_name(),
                "error": structured,
            });
            let rendered = if global.format == OutputFormat::Compact {
                serde_json::to_string(&response)
            } else {
                serde_json::to_string_pretty(&response)
            };
            eprintln!("{}", rendered.unwrap_or_else(|_| structured.to_json()));
        }
    }

    exit_code
}
