#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

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
use crate::domain::models::error_detail;
use crate::domain::models::ChatPrompt;
use crate::domain::models::Document;
use crate::domain::models::DocumentUpload;
use crate::domain::models::HistoryEntry;
use crate::domain::models::KnowledgeBaseBox;
use crate::domain::models::QueryResponse;
use crate::domain::services::actions::help_text;
use crate::domain::services::Themes;
use crate::infrastructure::knowledge_bases::KnowledgeBaseManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

/// Replaces transport errors with the backend's `detail` when it sent one.
fn with_detail(err: anyhow::Error) -> anyhow::Error {
    if let Some(detail) = error_detail(&err) {
        return anyhow::anyhow!(detail);
    }

    return err;
}

/// Value parser for numeric config flags. Keeps the value as a string so it
/// loads into `Config` like every other flag.
fn parse_positive_number(val: &str) -> Result<String, String> {
    match val.parse::<u64>() {
        Ok(number) if number > 0 => return Ok(val.to_string()),
        _ => return Err(format!("'{val}' is not a positive number")),
    }
}

fn format_document(position: usize, document: &Document) -> String {
    return format!(
        "- ({position}) {} [ID: {}], {}",
        document.filename,
        document.id,
        document.summary()
    );
}

fn format_answer(response: &QueryResponse) -> String {
    let mut res = response.answer.trim().to_string();
    if response.sources.is_empty() {
        return res;
    }

    res = format!("{res}\n\n{}", Paint::new("Sources:").bold());
    for source in response.sources.iter() {
        res = format!("{res}\n{}", Paint::cyan(source.title()));
        let preview = source.content_preview.trim();
        if !preview.is_empty() {
            res = format!("{res}\n  {}", Paint::new(preview).dimmed());
        }
    }

    return res;
}

fn format_history_entry(entry: &HistoryEntry) -> String {
    let mut res = format!("- {}", entry.question);
    if let Some(timestamp) = &entry.timestamp {
        res = format!("{res} ({timestamp})");
    }

    let answer = entry.answer.split('\n').next().unwrap_or_default();
    if !answer.is_empty() {
        let mut line = answer.to_string();
        if line.chars().count() >= 70 {
            line = format!("{}...", line.chars().take(67).collect::<String>());
        }
        res = format!("{res}\n  {line}");
    }

    return res;
}

async fn print_documents_list(kb: &KnowledgeBaseBox) -> Result<()> {
    let documents = kb.list_documents().await.map_err(with_detail)?;
    if documents.is_empty() {
        println!("No documents uploaded yet. Upload one with `kbchat documents upload FILE`.");
        return Ok(());
    }

    let res = documents
        .iter()
        .enumerate()
        .map(|(idx, document)| {
            return format_document(idx + 1, document);
        })
        .collect::<Vec<String>>();

    println!("{}", res.join("\n"));
    return Ok(());
}

async fn upload_document(kb: &KnowledgeBaseBox, file: &str) -> Result<()> {
    let upload = DocumentUpload::from_path(&path::PathBuf::from(file))?;
    let receipt = kb.upload_document(&upload).await.map_err(with_detail)?;

    let mut res = format!("\"{}\" uploaded successfully", upload.filename);
    if let Some(chunks) = receipt.chunks {
        res = format!("{res} ({chunks} chunks)");
    }
    println!("{}", Paint::green(res));

    return Ok(());
}

async fn delete_document(kb: &KnowledgeBaseBox, id: i64, confirmed: bool) -> Result<()> {
    if !confirmed {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Are you sure you want to delete document {id}?"))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    kb.delete_document(id).await.map_err(with_detail)?;
    println!("{}", Paint::green("Document deleted"));

    return Ok(());
}

async fn ask(kb: &KnowledgeBaseBox, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("You must ask a question.");
    }

    let num_sources = Config::get_number(ConfigKey::NumSources)?;
    let response = kb
        .query(&ChatPrompt::new(question, num_sources))
        .await
        .map_err(with_detail)?;

    println!("{}", format_answer(&response));
    return Ok(());
}

async fn print_history(kb: &KnowledgeBaseBox, limit: usize) -> Result<()> {
    let entries = kb.history(limit).await.map_err(with_detail)?;
    if entries.is_empty() {
        println!("No questions have been asked yet.");
        return Ok(());
    }

    let res = entries
        .iter()
        .map(format_history_entry)
        .collect::<Vec<String>>();

    println!("{}", res.join("\n"));
    return Ok(());
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
        .about("Debug helpers for KBChat")
        .hide(true)
        .subcommand(
            Command::new("themes").about("List all supported code highlighting themes.")
        )
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running KBChat with environment variable RUST_LOG=kbchat")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_documents() -> Command {
    return Command::new("documents")
        .about("Manage the documents stored in the knowledge base.")
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List all uploaded documents."))
        .subcommand(
            Command::new("upload")
                .about("Upload a single PDF, DOCX, TXT or MD file.")
                .arg(
                    clap::Arg::new("file")
                        .help("Path to the file to upload.")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a document by ID.")
                .arg(
                    clap::Arg::new("id")
                        .help("Document ID, as shown by `kbchat documents list`.")
                        .value_parser(value_parser!(i64))
                        .required(true),
                )
                .arg(
                    clap::Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip the confirmation prompt.")
                        .action(ArgAction::SetTrue),
                ),
        );
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Ask a single question and print the answer with its sources.")
        .arg(
            clap::Arg::new("question")
                .help("The question to ask.")
                .num_args(1..)
                .required(true),
        );
}

fn subcommand_history() -> Command {
    return Command::new("history")
        .about("Print questions previously asked, as stored by the knowledge base.")
        .arg(
            clap::Arg::new("limit")
                .short('l')
                .long("limit")
                .help("Number of entries to fetch. Defaults to history-limit.")
                .value_parser(value_parser!(usize)),
        );
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start the terminal UI. This is the default command.");
}

fn arg_api_url() -> Arg {
    return Arg::new(ConfigKey::ApiURL.to_string())
        .short('u')
        .long(ConfigKey::ApiURL.to_string())
        .env("KBCHAT_API_URL")
        .num_args(1)
        .help(format!(
            "Base URL of the knowledge base API. [default: {}]",
            Config::default(ConfigKey::ApiURL)
        ))
        .global(true);
}

fn arg_health_check_timeout() -> Arg {
    return Arg::new(ConfigKey::HealthCheckTimeout.to_string())
        .long(ConfigKey::HealthCheckTimeout.to_string())
        .env("KBCHAT_HEALTH_CHECK_TIMEOUT")
        .num_args(1)
        .value_parser(parse_positive_number)
        .help(format!(
            "Time to wait in milliseconds before timing out when checking the knowledge base is reachable. [default: {}]",
            Config::default(ConfigKey::HealthCheckTimeout)
        ))
        .global(true);
}

fn arg_history_limit() -> Arg {
    return Arg::new(ConfigKey::HistoryLimit.to_string())
        .long(ConfigKey::HistoryLimit.to_string())
        .env("KBCHAT_HISTORY_LIMIT")
        .num_args(1)
        .value_parser(parse_positive_number)
        .help(format!(
            "Number of entries to fetch when showing chat history. [default: {}]",
            Config::default(ConfigKey::HistoryLimit)
        ))
        .global(true);
}

fn arg_num_sources() -> Arg {
    return Arg::new(ConfigKey::NumSources.to_string())
        .short('n')
        .long(ConfigKey::NumSources.to_string())
        .env("KBCHAT_NUM_SOURCES")
        .num_args(1)
        .value_parser(parse_positive_number)
        .help(format!(
            "Number of document chunks to cite when answering a question. [default: {}]",
            Config::default(ConfigKey::NumSources)
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
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    let themes = Themes::list();

    return Command::new("kbchat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_documents())
        .subcommand(subcommand_ask())
        .subcommand(subcommand_history())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(arg_api_url())
        .arg(arg_health_check_timeout())
        .arg(arg_history_limit())
        .arg(arg_num_sources())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("KBCHAT_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::Theme.to_string())
                .short('t')
                .long(ConfigKey::Theme.to_string())
                .env("KBCHAT_THEME")
                .num_args(1)
                .help(format!("Sets code syntax highlighting theme. [default: {}]", Config::default(ConfigKey::Theme)))
                .value_parser(PossibleValuesParser::new(themes))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ThemeFile.to_string())
                .long(ConfigKey::ThemeFile.to_string())
                .env("KBCHAT_THEME_FILE")
                .num_args(1)
                .help(
                    "Absolute path to a TextMate tmTheme to use for code syntax highlighting."
                )
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .long(ConfigKey::Username.to_string())
                .env("KBCHAT_USERNAME")
                .num_args(1)
                .help("Your user name displayed in all chat bubbles. Defaults to $USER.")
                .global(true),
        );
}

async fn parse_documents(matches: &ArgMatches, documents_matches: &ArgMatches) -> Result<()> {
    let subcommand = documents_matches.subcommand();
    let mut config_matches = vec![matches, documents_matches];
    if let Some((_, subcmd_matches)) = subcommand {
        config_matches.push(subcmd_matches);
    }
    Config::load(build(), config_matches).await?;
    let kb = KnowledgeBaseManager::get();

    match subcommand {
        Some(("list", _)) => {
            print_documents_list(&kb).await?;
        }
        Some(("upload", upload_matches)) => {
            let file = match upload_matches.get_one::<String>("file") {
                Some(file) => file,
                None => bail!("You must pass a file path to upload."),
            };
            upload_document(&kb, file).await?;
        }
        Some(("delete", delete_matches)) => {
            let id = match delete_matches.get_one::<i64>("id") {
                Some(id) => *id,
                None => bail!("You must pass a document ID to delete."),
            };
            delete_document(&kb, id, delete_matches.get_flag("yes")).await?;
        }
        _ => {
            subcommand_documents().print_long_help()?;
        }
    }

    return Ok(());
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("themes", _)) => {
                    println!("{}", Themes::list().join("\n"));
                }
                Some(("log-path", _)) => {
                    let log_path = dirs::cache_dir()
                        .unwrap_or_else(|| return path::PathBuf::from("."))
                        .join("kbchat/debug.log");
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
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("documents", subcmd_matches)) => {
            parse_documents(&matches, subcmd_matches).await?;
            return Ok(false);
        }
        Some(("ask", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let question = subcmd_matches
                .get_many::<String>("question")
                .map(|words| return words.cloned().collect::<Vec<String>>().join(" "))
                .unwrap_or_default();
            ask(&KnowledgeBaseManager::get(), &question).await?;
            return Ok(false);
        }
        Some(("history", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let limit = match subcmd_matches.get_one::<usize>("limit") {
                Some(limit) => *limit,
                None => Config::get_number(ConfigKey::HistoryLimit)?,
            };
            print_history(&KnowledgeBaseManager::get(), limit).await?;
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
