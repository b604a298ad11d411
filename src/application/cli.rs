use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use dialoguer::Password;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::parse_millis;
use crate::configuration::ConfigKey;
use crate::domain::models::AuthenticatedUser;
use crate::domain::models::ThemeName;
use crate::domain::services::AuthService;
use crate::domain::services::CommandRegistry;
use crate::domain::services::Registration;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
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

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn prompt_login(auth: &AuthService) -> Result<AuthenticatedUser> {
    let theme = ColorfulTheme::default();
    loop {
        let email: String = Input::with_theme(&theme)
            .with_prompt("Email")
            .allow_empty(true)
            .interact_text()?;
        let password = Password::with_theme(&theme)
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?;

        match auth.login(&email, &password) {
            Ok(user) => return Ok(user),
            Err(err) => eprintln!("{}", Paint::red(err.to_string())),
        }
    }
}

fn prompt_registration(auth: &AuthService) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        let name: String = Input::with_theme(&theme)
            .with_prompt("Name")
            .allow_empty(true)
            .interact_text()?;
        let email: String = Input::with_theme(&theme)
            .with_prompt("Email")
            .allow_empty(true)
            .interact_text()?;
        let password = Password::with_theme(&theme)
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?;
        let confirm_password = Password::with_theme(&theme)
            .with_prompt("Confirm password")
            .allow_empty_password(true)
            .interact()?;

        let registration = Registration {
            name,
            email,
            password,
            confirm_password,
        };

        match auth.register(registration) {
            Ok(()) => {
                println!("{}", Paint::green("Account created. Please log in."));
                return Ok(());
            }
            Err(err) => eprintln!("{}", Paint::red(err.to_string())),
        }
    }
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
        .about("Debug helpers for chatgate")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running chatgate with environment variable RUST_LOG=chatgate")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn arg_string(key: ConfigKey, env: &'static str, help: String) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let commands_text = CommandRegistry::default()
        .help_text()
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

    return Command::new("chatgate")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Log in and start a new chat session."))
        .subcommand(Command::new("register").about("Create an account, then log in and start chatting."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(arg_string(
            ConfigKey::ApiKey,
            "CHATGATE_API_KEY",
            "API token for the hosted text-generation endpoint.".to_string(),
        ))
        .arg(arg_string(
            ConfigKey::ApiURL,
            "CHATGATE_API_URL",
            format!("Base URL of the hosted text-generation API. [default: {}]", Config::default(ConfigKey::ApiURL)),
        ))
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("CHATGATE_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(arg_string(
            ConfigKey::ExportDir,
            "CHATGATE_EXPORT_DIR",
            format!("Directory chat transcripts are saved to with /save. [default: {}]", Config::default(ConfigKey::ExportDir)),
        ))
        .arg(
            arg_string(
                ConfigKey::Model,
                "CHATGATE_MODEL",
                format!("Model name appended to the API URL for completions. [default: {}]", Config::default(ConfigKey::Model)),
            )
            .short('m'),
        )
        .arg(
            arg_string(
                ConfigKey::RequestTimeout,
                "CHATGATE_REQUEST_TIMEOUT",
                format!("Time to wait in milliseconds before a completion request is abandoned. [default: {}]", Config::default(ConfigKey::RequestTimeout)),
            )
            .value_parser(parse_millis),
        )
        .arg(arg_string(
            ConfigKey::SpeechCommand,
            "CHATGATE_SPEECH_COMMAND",
            "Command that records a single utterance and prints its transcript to stdout.".to_string(),
        ))
        .arg(arg_string(
            ConfigKey::StorageFile,
            "CHATGATE_STORAGE_FILE",
            format!("JSON file storing your theme and pinned messages between runs. [default: {}]", Config::default(ConfigKey::StorageFile)),
        ))
        .arg(
            arg_string(
                ConfigKey::Theme,
                "CHATGATE_THEME",
                "Colour theme for the chat view. Defaults to your last choice, or your terminal's colour scheme.".to_string(),
            )
            .short('t')
            .value_parser(PossibleValuesParser::new(ThemeName::VARIANTS)),
        )
        .arg(
            arg_string(
                ConfigKey::Username,
                "CHATGATE_USERNAME",
                "Name displayed above your chat bubbles. Defaults to the name you log in with.".to_string(),
            )
            .short('u'),
        );
}

/// Parses arguments, runs one-shot subcommands, and walks the user through
/// the login gate. Returns the logged in user when the chat view should start.
pub async fn parse() -> Result<Option<AuthenticatedUser>> {
    let matches = build().get_matches();
    let auth = AuthService::default();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = Config::log_dir().join("debug.log");
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

            return Ok(None);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("register", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            prompt_registration(&auth)?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(None);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    let user = prompt_login(&auth)?;
    return Ok(Some(user));
}
