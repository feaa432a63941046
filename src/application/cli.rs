use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::log_dir;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::APP_SUBTITLE;
use crate::domain::services::actions::help_text;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
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
        .about("Debug helpers for AOK")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running AOK with environment variable RUST_LOG=aok")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start a new weekly report chat. This is the default command.");
}

fn global_arg(key: ConfigKey, help: String) -> Arg {
    let name = key.to_string();
    let env_name = format!("AOK_{}", name.replace('-', "_").to_uppercase());
    return Arg::new(name.clone())
        .long(name)
        .env(env_name)
        .num_args(1)
        .help(help)
        .global(true);
}

fn global_args() -> Vec<Arg> {
    return vec![
        global_arg(
            ConfigKey::ConfigFile,
            format!(
                "Path to configuration file [default: {}]",
                Config::default(ConfigKey::ConfigFile)
            ),
        )
        .short('c'),
        global_arg(
            ConfigKey::ApiKey,
            "Google Gemini API key used to create chat sessions.".to_string(),
        )
        .hide_env_values(true),
        global_arg(
            ConfigKey::GeminiURL,
            format!(
                "Gemini API URL. Can be swapped to a compatible proxy. [default: {}]",
                Config::default(ConfigKey::GeminiURL)
            ),
        ),
        global_arg(
            ConfigKey::Username,
            "Your user name displayed in all chat bubbles. [default: $USER]".to_string(),
        ),
    ];
}

/// Chat hotkeys and slash commands, formatted for the bottom of `--help`.
fn chat_help() -> String {
    let mut out = vec![];
    for line in help_text().lines() {
        let formatted = if line.starts_with('-') {
            format!("  {line}")
        } else if line.ends_with(':') {
            Paint::new(format!("CHAT {line}"))
                .underline()
                .bold()
                .to_string()
        } else {
            line.to_string()
        };
        out.push(formatted);
    }
    return out.join("\n");
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\n{APP_SUBTITLE}\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("aok")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(chat_help())
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .args(global_args());
}

fn run_debug(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("log-path", _)) => {
            println!("{}", log_dir().join("debug.log").to_string_lossy());
        }
        Some(("enum-config", _)) => {
            println!("{}", ConfigKey::VARIANTS.join("\n"));
        }
        _ => {
            subcommand_debug().print_long_help()?;
        }
    }
    return Ok(());
}

async fn run_config(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("create", _)) => create_config_file().await?,
        Some(("default", _)) => println!("{}", Config::serialize_default(build())),
        Some(("path", _)) => println!("{}", Config::default(ConfigKey::ConfigFile)),
        _ => subcommand_config().print_long_help()?,
    }
    return Ok(());
}

/// Handles every command that doesn't start the chat UI. Returns true when
/// the UI should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("chat", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            return Ok(true);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(shell) = subcmd_matches.get_one::<Shell>("shell").copied() {
                print_completions(shell, &mut build());
            }
        }
        Some(("config", subcmd_matches)) => run_config(subcmd_matches).await?,
        Some(("debug", subcmd_matches)) => run_debug(subcmd_matches)?,
        Some(("manpages", _)) => clap_mangen::Man::new(build()).render(&mut io::stdout())?,
        _ => {
            Config::load(vec![&matches]).await?;
            return Ok(true);
        }
    }

    return Ok(false);
}
