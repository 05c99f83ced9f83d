use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Local;
use desk_logging::{desk_info, desk_warn};
use publishing_core::{
    ArticleDraft, ArticleId, PollerPhase, TranslationProgressView, WizardRoute, WizardStep,
    TIMEOUT_MESSAGE,
};
use publishing_engine::{
    AlertSink, ArticleBackend, AuthProvider, ChannelTranslationSink, DiscardSink, EnvTokenProvider,
    HistoryNavigator, Navigator, ReqwestBackend, TranslationEvent, TranslationPoller,
    WizardSession,
};
use tokio::sync::mpsc;

use super::config::{self, AppConfig, TOKEN_ENV_VAR};
use super::render;

pub struct TranslateArgs {
    pub article_id: String,
    pub title: String,
    pub content: Option<String>,
    pub content_file: Option<PathBuf>,
    pub languages: Vec<String>,
}

pub struct PublishArgs {
    pub article_id: String,
    pub step: WizardStep,
    pub confirm: bool,
    pub save_draft: bool,
}

/// Alerts printed to stderr for the operator.
struct TerminalAlerts;

impl AlertSink for TerminalAlerts {
    fn alert(&self, message: &str) {
        desk_warn!("Alert: {}", message);
        eprintln!("{}", message);
    }
}

fn build_backend(config: &AppConfig) -> anyhow::Result<Arc<dyn ArticleBackend>> {
    let auth = EnvTokenProvider::new(TOKEN_ENV_VAR);
    if auth.bearer_token().is_none() {
        desk_warn!("{} is not set; requests go out unauthenticated", TOKEN_ENV_VAR);
    }
    let backend = ReqwestBackend::new(config.backend_settings(), Arc::new(auth))
        .context("building HTTP client")?;
    Ok(Arc::new(backend))
}

fn read_draft(args: &TranslateArgs) -> anyhow::Result<ArticleDraft> {
    let content = match (&args.content, &args.content_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("reading article content from {}", path.display()))?,
        (None, None) => bail!("either --content or --content-file is required"),
    };
    Ok(ArticleDraft::new(args.title.clone(), content))
}

pub async fn translate(config: &AppConfig, args: TranslateArgs) -> anyhow::Result<()> {
    let draft = read_draft(&args)?;
    let languages = if args.languages.is_empty() {
        config.default_languages.clone()
    } else {
        args.languages.clone()
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = TranslationPoller::new(
        build_backend(config)?,
        config.poll_settings(),
        Arc::new(ChannelTranslationSink::new(tx)),
    );

    poller
        .start_translation(&args.article_id, languages.as_slice(), &draft)
        .await
        .with_context(|| format!("starting translation for article {}", args.article_id))?;

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                println!("{}", render::render_event(&event, Local::now()));
                if matches!(event, TranslationEvent::Progress(_)) {
                    for line in render::render_progress(&poller.progress()) {
                        println!("{}", line);
                    }
                }
                if event.is_terminal() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                desk_info!("Interrupted; stopping translation polling");
                poller.stop_translation();
                break;
            }
        }
    }
    poller.wait_until_settled().await;

    let progress = poller.progress();
    for line in render::render_progress(&progress) {
        println!("{}", line);
    }
    settled_result(&progress)
}

/// Maps the final poller phase to the command's result; failures and
/// client-side timeouts both exit non-zero.
fn settled_result(progress: &TranslationProgressView) -> anyhow::Result<()> {
    match progress.phase {
        PollerPhase::Failed => bail!(progress
            .error
            .clone()
            .unwrap_or_else(|| "Translation failed".to_string())),
        PollerPhase::TimedOut => bail!(TIMEOUT_MESSAGE),
        _ => Ok(()),
    }
}

pub async fn status(config: &AppConfig, article_id: &str) -> anyhow::Result<()> {
    let poller = TranslationPoller::new(
        build_backend(config)?,
        config.poll_settings(),
        Arc::new(DiscardSink),
    );

    let Some(snapshot) = poller.check_translation_status(article_id).await else {
        bail!("could not fetch translation status for article {}", article_id);
    };

    println!("Article {}: {}", article_id, snapshot.message);
    if let Some(progress) = snapshot.progress {
        println!(
            "  {}% ({}/{})",
            progress.percentage.min(100),
            progress.completed,
            progress.total
        );
    }
    for record in &snapshot.translations {
        println!("  {}: {}", record.language_code, record.title);
    }
    Ok(())
}

pub async fn publish(config: &AppConfig, args: PublishArgs) -> anyhow::Result<()> {
    let article_id = ArticleId::parse(&args.article_id)?;
    let start = WizardRoute::new(article_id.clone(), args.step);
    let navigator = Arc::new(HistoryNavigator::new(start.to_path()));
    let session = WizardSession::open(
        build_backend(config)?,
        navigator.clone(),
        Arc::new(TerminalAlerts),
    )?;

    if args.save_draft {
        session.handle_save_draft().await;
    }

    if args.confirm {
        while session.current_step() != WizardStep::Confirm {
            let before = session.current_step();
            session.handle_next().await;
            if session.current_step() == before {
                bail!("wizard did not advance past {}", before.label());
            }
        }
        session.handle_confirmation_state_change(true).await;
        session.handle_publish().await;
    }

    for line in render::render_wizard(&session.view()) {
        println!("{}", line);
    }

    if args.confirm {
        if !session.state().is_published() {
            bail!(session
                .view()
                .alert
                .unwrap_or_else(|| "article was not published".to_string()));
        }
        println!("Published. Redirected to {}", navigator.current_path());
    }
    Ok(())
}

pub fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    config::save(path, &AppConfig::default())?;
    desk_info!("Wrote default config to {:?}", path);
    println!("Wrote {}", path.display());
    Ok(())
}
