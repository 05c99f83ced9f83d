mod platform;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use desk_logging::desk_info;
use publishing_core::WizardStep;

use platform::app::{self, PublishArgs, TranslateArgs};
use platform::config::{self, DEFAULT_CONFIG_PATH};
use platform::logging::{self, LogDestination};

/// Transfer Daily article publishing console.
#[derive(Debug, Parser)]
#[command(name = "transfer-daily-admin", version)]
struct Args {
    /// Config file (RON).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Where log output goes.
    #[arg(long, global = true, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a translation job and watch it until it settles.
    Translate {
        article_id: String,
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Target language code; repeat for several. Defaults to the config list.
        #[arg(long = "lang")]
        languages: Vec<String>,
    },
    /// Fetch the translation status once.
    Status { article_id: String },
    /// Walk the publishing wizard for an article.
    Publish {
        article_id: String,
        #[arg(long, default_value = "edit")]
        step: WizardStep,
        /// Tick the confirmation checklist and publish.
        #[arg(long)]
        confirm: bool,
        #[arg(long)]
        save_draft: bool,
    },
    /// Write a default config file.
    InitConfig {
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::initialize(args.log, args.verbose);

    match dotenvy::dotenv() {
        Ok(path) => desk_info!("Loaded environment from {:?}", path),
        Err(err) if err.not_found() => {}
        Err(err) => desk_info!("Ignoring .env: {}", err),
    }

    if let Command::InitConfig { force } = args.command {
        return app::init_config(&args.config, force);
    }

    let config = config::load(&args.config);
    match args.command {
        Command::Translate {
            article_id,
            title,
            content,
            content_file,
            languages,
        } => {
            app::translate(
                &config,
                TranslateArgs {
                    article_id,
                    title,
                    content,
                    content_file,
                    languages,
                },
            )
            .await
        }
        Command::Status { article_id } => app::status(&config, &article_id).await,
        Command::Publish {
            article_id,
            step,
            confirm,
            save_draft,
        } => {
            app::publish(
                &config,
                PublishArgs {
                    article_id,
                    step,
                    confirm,
                    save_draft,
                },
            )
            .await
        }
        Command::InitConfig { .. } => Ok(()),
    }
}
