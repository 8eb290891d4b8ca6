// src/main.rs — CopyBloom entry point

use std::sync::Arc;

use clap::Parser;

use copybloom::cli::{self, Cli, Commands};
use copybloom::generate::Generator;
use copybloom::infra::config::Config;
use copybloom::infra::errors::CopyBloomError;
use copybloom::infra::logger;
use copybloom::infra::paths;
use copybloom::provider::fallback::{FallbackCandidate, FallbackProvider};
use copybloom::provider::google::GoogleProvider;
use copybloom::provider::retry::RetryProvider;
use copybloom::provider::ModelProvider;
use copybloom::store::Store;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG / COPYBLOOM_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };
    if let Some(ref model) = cli.model {
        config.model.id = model.clone();
    }

    // Dispatch subcommands that don't need a provider
    match cli.command {
        Commands::Init => {
            return cli::init::run_init().await;
        }
        Commands::Login { name, email } => {
            return cli::init::run_login(name, email);
        }
        Commands::Logout => {
            return cli::init::run_logout();
        }
        Commands::Campaigns { action } => {
            return cli::campaigns::run_campaigns(Store::open(&paths::db_path()), action);
        }
        _ => {}
    }

    let provider = build_provider(&config)?;
    let generator = Generator::new(provider, &config).with_refine_enabled(!cli.no_refine);

    // History is best effort; generation still works when the database is
    // unavailable.
    let store = Store::open(&paths::db_path());

    match cli.command {
        Commands::Copy {
            campaign_type,
            audience,
            message,
            tone,
            cta,
            no_save,
        } => {
            cli::copy::run_copy(
                &generator,
                store.as_ref(),
                cli::copy::CopyArgs {
                    campaign_type,
                    audience,
                    message,
                    tone,
                    cta,
                    no_save,
                },
                cli.quiet,
            )
            .await
        }

        Commands::Script {
            topic,
            audience,
            tone,
            duration,
            style,
            story,
            key_points,
            hook_question,
            pain_point,
            call_to_action,
            no_save,
        } => {
            cli::script::run_script(
                &generator,
                store.as_ref(),
                cli::script::ScriptArgs {
                    topic,
                    audience,
                    tone,
                    duration,
                    style,
                    story,
                    key_points,
                    hook_question,
                    pain_point,
                    call_to_action,
                    no_save,
                },
                cli.quiet,
            )
            .await
        }

        Commands::Story {
            topic,
            audience,
            tone,
            duration,
            style,
            refine,
        } => {
            cli::script::run_story(
                &generator,
                cli::script::StoryArgs {
                    topic,
                    audience,
                    tone,
                    duration,
                    style,
                    refine,
                },
                cli.quiet,
            )
            .await
        }

        Commands::Ideas { niche } => cli::ideas::run_ideas(&generator, niche, cli.quiet).await,

        Commands::Reels { title } => cli::ideas::run_reels(&generator, title, cli.quiet).await,

        Commands::Chat => cli::chat::run_chat(&generator, &config).await,

        // Handled above
        Commands::Init | Commands::Login { .. } | Commands::Logout | Commands::Campaigns { .. } => {
            unreachable!()
        }
    }
}

/// Build the provider stack: Gemini, optionally chained to a backup model,
/// wrapped in retry with exponential backoff.
fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn ModelProvider>> {
    let api_key = config
        .model
        .resolve_api_key()
        .ok_or(CopyBloomError::NoProvider)?;

    let google: Arc<dyn ModelProvider> = Arc::new(GoogleProvider::new(api_key));

    let base: Arc<dyn ModelProvider> = match config.model.fallback_id {
        Some(ref fallback_model) => Arc::new(FallbackProvider::new(vec![
            FallbackCandidate::new(google.clone()),
            FallbackCandidate::with_model(google, fallback_model.clone()),
        ])),
        None => google,
    };

    Ok(Arc::new(RetryProvider::new(base)))
}
