//! umeng-push - send push notifications through the Umeng API.

mod config;
mod fields;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{WrapErr as _, bail};
use serde_json::Value;
use umeng_core::Platform;
use umeng_push::{Audience, Dispatcher, Endpoints, HttpTransport, PushOutcome};

use crate::config::Config;
use crate::fields::{field_set, parse_field, read_entries};

#[derive(Parser)]
#[command(name = "umeng-push")]
#[command(about = "Send push notifications through the Umeng API", long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "UMENG_PUSH_CONFIG")]
    config: Option<PathBuf>,

    /// Print the signed request instead of sending it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Deliver to registered test devices only
    #[arg(long, global = true)]
    test_mode: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push to every device
    Broadcast {
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Push to one or more device tokens
    Unicast {
        /// Token, or comma-separated tokens
        #[arg(long)]
        device_tokens: String,
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Push to device tokens listed in a file
    Filecast {
        /// One token per line
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Push to devices carrying all given tags
    Groupcast {
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Push to an alias
    Customizedcast {
        #[arg(long)]
        alias: String,
        #[arg(long)]
        alias_type: String,
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Push to aliases listed in a file
    CustomizedcastFile {
        /// One alias per line
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Args)]
struct MessageArgs {
    #[arg(long, default_value = "android")]
    platform: Platform,

    /// Message field, e.g. `--set title=Hello` (JSON values accepted)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_field)]
    values: Vec<(String, Value)>,

    /// Android extra or iOS custom field
    #[arg(long = "extra", value_name = "KEY=VALUE", value_parser = parse_field)]
    extra: Vec<(String, Value)>,
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).wrap_err("failed to load config")?;

    let (audience, message) = match cli.command {
        Commands::Config => {
            cmd_config(&config, cli.config);
            return Ok(());
        }
        Commands::Broadcast { message } => (Audience::All, message),
        Commands::Unicast {
            device_tokens,
            message,
        } => (Audience::Devices(device_tokens), message),
        Commands::Filecast { file, message } => {
            let tokens = read_entries(&file)
                .wrap_err_with(|| format!("failed to read {}", file.display()))?;
            (Audience::DeviceFile(tokens), message)
        }
        Commands::Groupcast { tags, message } => (Audience::Tags(tags), message),
        Commands::Customizedcast {
            alias,
            alias_type,
            message,
        } => (Audience::Alias { alias, alias_type }, message),
        Commands::CustomizedcastFile { file, message } => {
            let aliases = read_entries(&file)
                .wrap_err_with(|| format!("failed to read {}", file.display()))?;
            (Audience::AliasFile(aliases), message)
        }
    };

    let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))
        .wrap_err("failed to create http client")?;
    let mut dispatcher = Dispatcher::new(config.credentials()?, transport)
        .with_endpoints(Endpoints::new(&config.host));
    dispatcher
        .set_production_mode(config.production_mode && !cli.test_mode)
        .set_allow_empty_tag_filter(config.allow_empty_tag_filter)
        .set_dry_run(cli.dry_run);

    let outcome = dispatcher
        .send(
            message.platform,
            audience,
            field_set(message.values),
            field_set(message.extra),
        )
        .await;

    match outcome {
        PushOutcome::Sent(response) => {
            println!("{}", serde_json::to_string_pretty(&response.data)?);
        }
        PushOutcome::Prepared(request) => {
            println!("{} {}", request.method(), request.signed_url());
            println!("{}", request.body());
        }
        PushOutcome::Failed(failure) => bail!("{failure}"),
    }

    Ok(())
}

fn cmd_config(config: &Config, path: Option<PathBuf>) {
    let path = path.unwrap_or_else(Config::config_path);
    println!("Config file: {}", path.display());
    println!("{config:#?}");
}
