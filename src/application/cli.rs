#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::DocumentChunk;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::ModelName;
use crate::domain::models::UploadStatus;
use crate::domain::services::actions::help_text;
use crate::domain::services::actions::ActionsService;
use crate::domain::services::AppState;
use crate::infrastructure::backends::BackendManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("DOCMIND_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .unwrap_or_else(|| return env::temp_dir())
        .join("docmind");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn configured_model() -> Result<ModelName> {
    let name = Config::get(ConfigKey::Model);
    if let Some(model) = ModelName::parse(&name) {
        return Ok(model);
    }

    bail!(format!(
        "No model named {name}. Possible values are: {}",
        ModelName::VARIANTS.join(", ")
    ));
}

/// Plain text rendering of a transcript entry for one-shot commands.
pub fn format_message(message: &Message) -> String {
    let mut res = message.text.to_string();
    let sources = message.cited_sources();
    if !sources.is_empty() {
        let list = sources
            .iter()
            .map(|source| return format!("- {source}"))
            .collect::<Vec<String>>()
            .join("\n");
        res = format!("{res}\n\nSources:\n{list}");
    }

    return res;
}

pub fn format_chunk(chunk: &DocumentChunk) -> String {
    let content = chunk.content.replace('\n', " ");
    let mut preview = content.chars().take(200).collect::<String>();
    if content.chars().count() > 200 {
        preview = format!("{preview}...");
    }

    return format!("- {}\n  {preview}", Paint::cyan(chunk.location()));
}

/// Runs `action` against the configured backend to completion.
async fn run_action(app_state: &mut AppState, action: Action) {
    let backend = BackendManager::get();
    ActionsService::drive(app_state, &backend, action).await;
}

fn last_message(app_state: &AppState) -> Result<&Message> {
    if let Some(message) = app_state.conversation.last() {
        return Ok(message);
    }

    bail!("The conversation is empty");
}

async fn upload(file_path: &str) -> Result<()> {
    let mut app_state = AppState::new(configured_model()?);
    let action = match app_state.submit_upload(file_path) {
        Some(action) => action,
        None => bail!("You must specify a file path to upload"),
    };

    run_action(&mut app_state, action).await;

    let message = last_message(&app_state)?;
    if app_state.upload.status == UploadStatus::Error {
        bail!(message.text.to_string());
    }

    println!("{}", format_message(message));
    if let Some(stats) = &app_state.collection_stats {
        println!("Vectors indexed: {}", stats.count);
    }

    return Ok(());
}

async fn ask(question: &str) -> Result<()> {
    let mut app_state = AppState::new(configured_model()?);
    let action = match app_state.submit_question(question) {
        Some(action) => action,
        None => bail!("You must ask a question"),
    };

    run_action(&mut app_state, action).await;

    let message = last_message(&app_state)?;
    if message.message_type() == MessageType::Error {
        bail!(message.text.to_string());
    }

    println!("{}", format_message(message));
    return Ok(());
}

async fn status() -> Result<()> {
    let mut app_state = AppState::default();
    run_action(&mut app_state, Action::RefreshSystemStatus()).await;

    if let Some(status) = &app_state.system_status {
        println!("{}", serde_json::to_string_pretty(status)?);
        return Ok(());
    }

    bail!(format!(
        "Failed to fetch the system status from {}",
        Config::get(ConfigKey::ApiURL)
    ));
}

async fn stats() -> Result<()> {
    let mut app_state = AppState::default();
    run_action(&mut app_state, Action::RefreshCollectionStats()).await;

    if let Some(stats) = &app_state.collection_stats {
        println!("Vectors indexed: {}", stats.count);
        if let Some(name) = &stats.name {
            println!("Collection: {name}");
        }
        if let Some(status) = &stats.status {
            println!("Status: {status}");
        }
        return Ok(());
    }

    bail!(format!(
        "Failed to fetch collection stats from {}",
        Config::get(ConfigKey::ApiURL)
    ));
}

async fn documents() -> Result<()> {
    let mut app_state = AppState::default();
    run_action(&mut app_state, Action::InspectDocuments()).await;

    let chunks = match &app_state.inspected_documents {
        Some(chunks) => chunks,
        None => bail!(app_state.alert.clone().unwrap_or_default()),
    };

    if chunks.is_empty() {
        println!("No documents indexed yet.");
        return Ok(());
    }

    let res = chunks
        .iter()
        .map(format_chunk)
        .collect::<Vec<String>>()
        .join("\n");
    println!("{res}");

    return Ok(());
}

async fn reset(skip_confirmation: bool) -> Result<()> {
    let mut app_state = AppState::default();

    let mut confirmed = skip_confirmation;
    if !confirmed {
        confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Clear the knowledge base? This action cannot be undone.")
            .default(false)
            .interact()?;
    }

    let action = match app_state.reset_knowledge_base(|| return confirmed) {
        Some(action) => action,
        None => {
            println!("Reset cancelled.");
            return Ok(());
        }
    };

    run_action(&mut app_state, action).await;
    if let Some(alert) = &app_state.alert {
        bail!(alert.to_string());
    }

    println!("{}", format_message(last_message(&app_state)?));
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for DocMind")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running DocMind with environment variable RUST_LOG=docmind")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_upload() -> Command {
    return Command::new("upload")
        .about("Uploads a document to the knowledge base and waits for it to be indexed.")
        .arg(
            Arg::new("file")
                .help("Path to the document, usually a PDF.")
                .num_args(1)
                .required(true),
        );
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Asks a single question about the uploaded documents.")
        .arg(
            Arg::new("question")
                .help("The question to ask.")
                .num_args(1..)
                .required(true),
        );
}

fn subcommand_reset() -> Command {
    return Command::new("reset")
        .about("Clears every document from the knowledge base.")
        .arg(
            Arg::new("yes")
                .short('y')
                .long("yes")
                .help("Skip the confirmation prompt.")
                .action(ArgAction::SetTrue),
        );
}

fn arg_api_url() -> Arg {
    return Arg::new(ConfigKey::ApiURL.to_string())
        .long(ConfigKey::ApiURL.to_string())
        .env("DOCMIND_API_URL")
        .num_args(1)
        .help(format!(
            "DocMind API URL. [default: {}]",
            Config::default(ConfigKey::ApiURL)
        ))
        .global(true);
}

fn arg_backend_health_check_timeout() -> Arg {
    return Arg::new(ConfigKey::BackendHealthCheckTimeout.to_string())
        .long(ConfigKey::BackendHealthCheckTimeout.to_string())
        .env("DOCMIND_BACKEND_HEALTH_CHECK_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds before timing out when checking the DocMind API is reachable. [default: {}]",
            Config::default(ConfigKey::BackendHealthCheckTimeout)
        ))
        .global(true);
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.to_string())
        .short('m')
        .long(ConfigKey::Model.to_string())
        .env("DOCMIND_MODEL")
        .num_args(1)
        .help(format!(
            "The model answering questions. [default: {}]",
            Config::default(ConfigKey::Model)
        ))
        .value_parser(PossibleValuesParser::new(ModelName::VARIANTS))
        .global(true);
}

fn arg_poll_interval() -> Arg {
    return Arg::new(ConfigKey::PollInterval.to_string())
        .long(ConfigKey::PollInterval.to_string())
        .env("DOCMIND_POLL_INTERVAL")
        .num_args(1)
        .help(format!(
            "Seconds between collection stats refreshes in the inspector. [default: {}]",
            Config::default(ConfigKey::PollInterval)
        ))
        .global(true);
}

fn arg_request_timeout() -> Arg {
    return Arg::new(ConfigKey::RequestTimeout.to_string())
        .long(ConfigKey::RequestTimeout.to_string())
        .env("DOCMIND_REQUEST_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds for uploads, answers and other API requests. [default: {}]",
            Config::default(ConfigKey::RequestTimeout)
        ))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("docmind")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start the interactive document chat."))
        .subcommand(subcommand_upload())
        .subcommand(subcommand_ask())
        .subcommand(Command::new("status").about("Prints the backend's system status."))
        .subcommand(Command::new("stats").about("Prints the knowledge base collection stats."))
        .subcommand(Command::new("documents").about("Prints a sample of the indexed document chunks."))
        .subcommand(subcommand_reset())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(arg_api_url())
        .arg(arg_backend_health_check_timeout())
        .arg(arg_model())
        .arg(arg_poll_interval())
        .arg(arg_request_timeout())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("DOCMIND_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        );
}

async fn load_config(matches: &ArgMatches, subcmd_matches: &ArgMatches) -> Result<()> {
    return Config::load(build(), vec![matches, subcmd_matches]).await;
}

/// Parses the command line and runs any one-shot command. Returns true
/// when the interactive chat should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = log_dir().join("debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            load_config(&matches, subcmd_matches).await?;
        }
        Some(("upload", subcmd_matches)) => {
            load_config(&matches, subcmd_matches).await?;
            let file_path = subcmd_matches
                .get_one::<String>("file")
                .cloned()
                .unwrap_or_default();
            upload(&file_path).await?;
            return Ok(false);
        }
        Some(("ask", subcmd_matches)) => {
            load_config(&matches, subcmd_matches).await?;
            let question = subcmd_matches
                .get_many::<String>("question")
                .map(|e| return e.cloned().collect::<Vec<String>>().join(" "))
                .unwrap_or_default();
            ask(&question).await?;
            return Ok(false);
        }
        Some(("status", subcmd_matches)) => {
            load_config(&matches, subcmd_matches).await?;
            status().await?;
            return Ok(false);
        }
        Some(("stats", subcmd_matches)) => {
            load_config(&matches, subcmd_matches).await?;
            stats().await?;
            return Ok(false);
        }
        Some(("documents", subcmd_matches)) => {
            load_config(&matches, subcmd_matches).await?;
            documents().await?;
            return Ok(false);
        }
        Some(("reset", subcmd_matches)) => {
            load_config(&matches, subcmd_matches).await?;
            reset(subcmd_matches.get_flag("yes")).await?;
            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
