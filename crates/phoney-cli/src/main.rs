mod config;
mod logging;
mod samples;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{
    ConfigError, DEFAULT_SETTINGS_FILE, Settings, init_settings, load_settings, write_bytes_atomic,
};
use logging::{LoggingError, init_logging};
use phoney_core::{ErrorBody, ErrorKind, GenerateRequest, OutputFormat, parse_generate_request};
use phoney_generate::output::documents_to_csv;
use phoney_generate::{GenerationError, TemplateEngine};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid request: {0}")]
    Request(#[from] phoney_core::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("template is invalid")]
    InvalidTemplate,
    #[error("generation timed out after {0} ms")]
    Timeout(u64),
    #[error("unknown example '{0}'")]
    UnknownExample(String),
    #[error("generation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Generation(err) if err.is_client_error() => 2,
            CliError::Config(_)
            | CliError::Request(_)
            | CliError::InvalidTemplate
            | CliError::UnknownExample(_) => 2,
            _ => 1,
        }
    }

    /// Structured body for failures that come out of the engine.
    fn error_body(&self) -> Option<ErrorBody> {
        match self {
            CliError::Generation(err) => Some(err.to_error_body()),
            CliError::Timeout(_) => Some(ErrorBody {
                kind: ErrorKind::Cancelled,
                message: self.to_string(),
                issues: Vec::new(),
            }),
            _ => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "phoney", version, about = "Fill JSON templates with fake data")]
struct Cli {
    /// Settings file (defaults to ./phoney.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log filter, overriding the settings file.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    /// Emit JSON logs.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate documents from a template.
    Generate(GenerateArgs),
    /// Check a template without generating data.
    Validate(ValidateArgs),
    /// List available generators.
    Generators(GeneratorsArgs),
    /// Print built-in sample requests.
    Examples(ExamplesArgs),
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a settings file with default values.
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Template or request file; `-` reads stdin.
    #[arg(value_name = "TEMPLATE")]
    template: String,
    #[arg(long)]
    count: Option<usize>,
    #[arg(long)]
    locale: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// Write output to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Cancel the batch after this many milliseconds.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(value_name = "TEMPLATE")]
    template: String,
}

#[derive(Args, Debug)]
struct GeneratorsArgs {
    /// Only list generators from this provider.
    #[arg(long)]
    provider: Option<String>,
}

#[derive(Args, Debug)]
struct ExamplesArgs {
    /// Print only this sample's request.
    name: Option<String>,
}

#[derive(Args, Debug)]
struct ConfigInitArgs {
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    path: PathBuf,
    #[arg(long, default_value_t = false)]
    force: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            match err.error_body().map(|body| serde_json::to_string_pretty(&body)) {
                Some(Ok(body)) => eprintln!("{body}"),
                _ => eprintln!("error: {err}"),
            }
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config init` must work even when the current settings file is broken.
    if let Command::Config(ConfigCommand::Init(args)) = &cli.command {
        init_settings(&args.path, args.force)?;
        println!("wrote {}", args.path.display());
        return Ok(());
    }

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if cli.log_json {
        settings.logging.json = true;
    }
    init_logging(&settings.logging)?;

    match cli.command {
        Command::Generate(args) => run_generate(args, settings).await,
        Command::Validate(args) => run_validate(args, &settings),
        Command::Generators(args) => run_generators(args, &settings),
        Command::Examples(args) => run_examples(args),
        Command::Config(ConfigCommand::Init(_)) => Ok(()),
    }
}

async fn run_generate(args: GenerateArgs, settings: Settings) -> Result<(), CliError> {
    let payload = read_input(&args.template)?;
    let mut request = parse_generate_request(&payload, 1)?;
    apply_overrides(&mut request, &args);

    let engine = Arc::new(TemplateEngine::new(settings.engine));
    let cancel = Arc::new(AtomicBool::new(false));
    let task = {
        let engine = Arc::clone(&engine);
        let cancel = Arc::clone(&cancel);
        let request = request.clone();
        tokio::task::spawn_blocking(move || engine.generate_request(&request, &cancel))
    };

    let response = match args.timeout_ms {
        Some(timeout_ms) => {
            let mut task = task;
            match tokio::time::timeout(Duration::from_millis(timeout_ms), &mut task).await {
                Ok(joined) => joined??,
                Err(_) => {
                    cancel.store(true, Ordering::Relaxed);
                    // Wait for the workers to observe the flag before returning.
                    let _ = task.await;
                    tracing::warn!(timeout_ms, "generation timed out");
                    return Err(CliError::Timeout(timeout_ms));
                }
            }
        }
        None => task.await??,
    };

    let rendered = match request.format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&response)?;
            json.push('\n');
            json
        }
        OutputFormat::Csv => documents_to_csv(&response.documents)?,
    };
    write_output(args.out.as_deref(), rendered.as_bytes())?;
    tracing::info!(
        generated = response.generated_count,
        execution_time_ms = response.execution_time_ms,
        "generate finished"
    );
    Ok(())
}

fn apply_overrides(request: &mut GenerateRequest, args: &GenerateArgs) {
    if let Some(count) = args.count {
        request.count = count;
    }
    if let Some(locale) = &args.locale {
        request.locale = Some(locale.clone());
    }
    if let Some(seed) = args.seed {
        request.seed = Some(seed);
    }
    if let Some(format) = args.format {
        request.format = format.into();
    }
}

fn run_validate(args: ValidateArgs, settings: &Settings) -> Result<(), CliError> {
    let payload = read_input(&args.template)?;
    let request = parse_generate_request(&payload, 1)?;
    let engine = TemplateEngine::new(settings.engine.clone());
    let response = engine.validate_template(&request.template);
    print_json(&response)?;
    if response.valid {
        Ok(())
    } else {
        Err(CliError::InvalidTemplate)
    }
}

fn run_generators(args: GeneratorsArgs, settings: &Settings) -> Result<(), CliError> {
    let engine = TemplateEngine::new(settings.engine.clone());
    let catalog: Vec<_> = engine
        .registry()
        .catalog()
        .into_iter()
        .filter(|info| {
            args.provider
                .as_deref()
                .is_none_or(|provider| info.provider.eq_ignore_ascii_case(provider))
        })
        .collect();
    print_json(&catalog)
}

#[derive(Serialize)]
struct SampleEntry<'a> {
    name: &'a str,
    description: &'a str,
    request: &'a GenerateRequest,
}

fn run_examples(args: ExamplesArgs) -> Result<(), CliError> {
    match args.name {
        Some(name) => {
            let sample = samples::find_sample(&name).ok_or(CliError::UnknownExample(name))?;
            print_json(&sample.request)
        }
        None => {
            let samples = samples::samples();
            let entries: Vec<_> = samples
                .iter()
                .map(|sample| SampleEntry {
                    name: sample.name,
                    description: sample.description,
                    request: &sample.request,
                })
                .collect();
            print_json(&entries)
        }
    }
}

fn read_input(source: &str) -> Result<String, CliError> {
    if source == "-" {
        let mut payload = String::new();
        io::stdin().read_to_string(&mut payload)?;
        Ok(payload)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<(), CliError> {
    match path {
        Some(path) => {
            write_bytes_atomic(path, data)?;
            tracing::info!(path = %path.display(), bytes = data.len(), "output written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_output(None, json.as_bytes())
}
