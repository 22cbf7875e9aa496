// clvchat CLI - canned-answer chatbot and dashboard summary over CLV records

mod chat;
mod exit_codes;
mod export;
mod report;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};

use clvchat_config::settings::{parse_delimiter, Settings};
use clvchat_engine::{IntentTable, Responder, ResponseTable, Speaker};
use clvchat_io::{LoadError, LoadedTable, TableCache};

use exit_codes::{EXIT_DATA, EXIT_ERROR, EXIT_INTENTS, EXIT_SUCCESS, EXIT_USAGE, EXIT_WRITE};

#[derive(Parser)]
#[command(name = "clvchat")]
#[command(about = "Ask canned questions about insurance customer records (CLV dataset)")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Data source options shared by every command. Flags override settings.
#[derive(Args, Default)]
struct SourceArgs {
    /// Records CSV [default: data.csvPath from settings, then CLV.csv]
    #[arg(long, global = true, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Field delimiter: one character, "tab", or "auto"
    #[arg(long, global = true, value_name = "CHAR")]
    delimiter: Option<String>,

    /// TOML file replacing the built-in trigger phrases
    #[arg(long, global = true, value_name = "PATH")]
    intents: Option<PathBuf>,

    /// Settings file [default: <config dir>/clvchat/settings.json]
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the answer
    #[command(after_help = "\
Examples:
  clvchat ask hola
  clvchat ask coberturas disponibles
  clvchat ask 'canales de ventas' --json
  clvchat --csv data/CLV.csv ask polizas")]
    Ask {
        /// Question text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print {input, intent, answer_key, answer} as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive chat over stdin, one question per line
    #[command(after_help = "\
Commands inside the chat:
  :history   print the transcript so far
  :quit      end the session (EOF works too)

Examples:
  clvchat chat
  printf 'hola\\ncoberturas\\n' | clvchat chat --transcript-json")]
    Chat {
        /// Print the session transcript as JSON when the session ends
        #[arg(long)]
        transcript_json: bool,
    },

    /// Dashboard KPIs: totals, policies per month, coverage and channel mix
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Columns, row count and values that failed numeric/date coercion
    Inspect {
        #[arg(long)]
        json: bool,
    },

    /// List the active trigger phrases and which answer each intent reaches
    Intents {
        #[arg(long)]
        json: bool,
    },

    /// Write the cleaned table
    #[command(after_help = "\
Examples:
  clvchat export -t csv -o clean.csv
  clvchat export -t json | head -20")]
    Export {
        /// Output format
        #[arg(long, short = 't')]
        to: ExportFormat,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Settings file helpers
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file location
    Path,
    /// Write a commented default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective settings as JSON
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  clvchat-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: clvchat <command> [options]");
            eprintln!("       clvchat --help for more information");
            Ok(())
        }
        Some(command) => Context::resolve(cli.source).and_then(|ctx| run(&ctx, command)),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Ask { text, json } => chat::cmd_ask(ctx, &text, json),
        Commands::Chat { transcript_json } => chat::cmd_chat(ctx, transcript_json),
        Commands::Summary { json } => report::cmd_summary(ctx, json),
        Commands::Inspect { json } => report::cmd_inspect(ctx, json),
        Commands::Intents { json } => report::cmd_intents(ctx, json),
        Commands::Export { to, output } => export::cmd_export(ctx, to, output),
        Commands::Config(cmd) => cmd_config(ctx, cmd),
    }
}

// ============================================================================
// Context
// ============================================================================

/// Settings merged with command-line overrides.
pub struct Context {
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub csv_path: PathBuf,
    pub delimiter: Option<u8>,
    pub intents_file: Option<PathBuf>,
}

impl Context {
    fn resolve(args: SourceArgs) -> Result<Self, CliError> {
        let settings_path = args.settings.unwrap_or_else(Settings::config_path);
        let settings = Settings::load_from(&settings_path);

        let delimiter_spec = args.delimiter.as_deref().unwrap_or(&settings.delimiter);
        let delimiter = parse_delimiter(delimiter_spec).map_err(CliError::args)?;

        Ok(Self {
            csv_path: args.csv.unwrap_or_else(|| settings.csv_path.clone()),
            intents_file: args.intents.or_else(|| settings.intents_file.clone()),
            delimiter,
            settings_path,
            settings,
        })
    }

    /// Cleaned records, loaded once per process per file version.
    pub fn load_table(&self) -> Result<Arc<LoadedTable>, CliError> {
        TableCache::global()
            .get_or_load(&self.csv_path, self.delimiter)
            .map_err(|e| CliError::data(e, &self.settings_path))
    }

    pub fn intent_table(&self) -> Result<IntentTable, CliError> {
        let Some(ref path) = self.intents_file else {
            return Ok(IntentTable::builtin());
        };
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::intents(format!("cannot read {}: {e}", path.display()))
        })?;
        IntentTable::from_toml(&contents)
            .map_err(|e| CliError::intents(format!("{}: {e}", path.display())))
    }

    pub fn responder(&self, loaded: &LoadedTable) -> Result<Responder, CliError> {
        let intents = self.intent_table()?;
        Ok(Responder::new(intents, ResponseTable::from_records(&loaded.table)))
    }

    pub fn speaker_label(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::User => &self.settings.user_label,
            Speaker::Bot => &self.settings.bot_label,
        }
    }
}

// ============================================================================
// config
// ============================================================================

fn cmd_config(ctx: &Context, cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Path => {
            println!("{}", ctx.settings_path.display());
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = &ctx.settings_path;
            if path.exists() && !force {
                return Err(CliError::args(format!("{} already exists", path.display()))
                    .with_hint("pass --force to overwrite"));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CliError::write(format!("{}: {e}", parent.display())))?;
            }
            std::fs::write(path, Settings::default_file_contents())
                .map_err(|e| CliError::write(format!("{}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&ctx.settings)
                .map_err(|e| CliError::eval(format!("JSON serialization error: {e}")))?;
            println!("{json}");
            Ok(())
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn eval(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn intents(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INTENTS, message: msg.into(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    /// Records file failure; the startup-aborting path.
    pub fn data(err: LoadError, settings_path: &std::path::Path) -> Self {
        let hint = match err {
            LoadError::Read { .. } => Some(format!(
                "pass --csv PATH or set \"data.csvPath\" in {}",
                settings_path.display()
            )),
            LoadError::Csv { .. } => Some("check --delimiter (\"auto\" detects it)".to_string()),
        };
        Self { code: EXIT_DATA, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
