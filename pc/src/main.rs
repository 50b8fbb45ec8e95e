//! postcraft - content intent to platform drafts
//!
//! CLI entry point for generating, previewing and reviewing drafts.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use postcraft::cli::{Cli, Command, EXAMPLE_INTENTS};
use postcraft::config::Config;
use postcraft::domain::Platform;
use postcraft::export::write_export;
use postcraft::generator::{TemplateEngine, build_steps, extract_hashtags};
use postcraft::render;
use postcraft::repl::{ReviewRepl, follow_reveal};
use postcraft::session::SessionManager;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logging isn't initialized yet, so nothing here can trace
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("postcraft")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("postcraft.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Generate {
            intent,
            platforms,
            seed,
            fast,
            approve_all,
            export,
            reasoning,
        } => {
            cmd_generate(
                config,
                GenerateArgs {
                    intent,
                    platforms,
                    seed,
                    fast,
                    approve_all,
                    export,
                    reasoning,
                },
            )
            .await
        }
        Command::Preview { intent, platform } => cmd_preview(&config, &intent, platform),
        Command::Review { intent, seed } => cmd_review(config, intent, seed).await,
        Command::Platforms => {
            print!("{}", render::platform_table());
            Ok(())
        }
        Command::Examples => {
            for (i, example) in EXAMPLE_INTENTS.iter().enumerate() {
                println!("{} {}", format!("{}.", i + 1).dimmed(), example);
            }
            Ok(())
        }
    }
}

struct GenerateArgs {
    intent: String,
    platforms: Vec<Platform>,
    seed: Option<u64>,
    fast: bool,
    approve_all: bool,
    export: Option<PathBuf>,
    reasoning: bool,
}

async fn cmd_generate(mut config: Config, args: GenerateArgs) -> Result<()> {
    debug!(platforms = ?args.platforms, seed = ?args.seed, fast = args.fast, "cmd_generate: called");
    if args.seed.is_some() {
        config.generation.seed = args.seed;
    }
    if args.fast {
        config.reveal.min_step_delay_ms = 0;
        config.reveal.max_step_delay_ms = 0;
    }
    let platforms = if args.platforms.is_empty() {
        config.generation.platforms()?
    } else {
        args.platforms
    };

    let manager = SessionManager::from_config(&config);
    manager.submit(&args.intent, &platforms).await?;
    follow_reveal(&manager).await?;

    if args.approve_all {
        manager.approve_all().await?;
    }

    let snapshot = manager.snapshot().await?;
    println!("{}", render::review(&snapshot, args.reasoning));

    if let Some(target) = args.export {
        let records = manager.export().await?;
        let path = write_export(&target, Some(&config.export.file_name), &records)?;
        println!("{} exported {} drafts to {}", "✓".green(), records.len(), path.display());
    }

    manager.shutdown().await?;
    Ok(())
}

fn cmd_preview(config: &Config, intent: &str, platform: Platform) -> Result<()> {
    debug!(%platform, "cmd_preview: called");
    let intent = intent.trim();
    if intent.is_empty() {
        return Err(eyre::eyre!("intent is empty"));
    }

    let engine = TemplateEngine::new(config.templates.dir.as_ref());
    let content = engine.render(platform, intent)?;
    let platform_config = platform.config();

    println!("{} {}", platform_config.icon, platform_config.name.bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", content);
    println!();
    println!(
        "{}",
        format!("{} / {} chars", content.chars().count(), platform_config.max_length).dimmed()
    );
    let hashtags = extract_hashtags(&content);
    if !hashtags.is_empty() {
        println!("{}", hashtags.join(" ").cyan());
    }

    println!("\n{}", "Generation Reasoning".dimmed().bold());
    for step in build_steps(platform, intent) {
        print!("{}", render::step_block(&step));
    }
    Ok(())
}

async fn cmd_review(mut config: Config, intent: Option<String>, seed: Option<u64>) -> Result<()> {
    debug!(?seed, "cmd_review: called");
    if seed.is_some() {
        config.generation.seed = seed;
    }
    let platforms = config.generation.platforms()?;
    let manager = SessionManager::from_config(&config);

    let mut repl = ReviewRepl::new(
        manager,
        platforms,
        config.export.dir.clone(),
        config.export.file_name.clone(),
    );
    repl.run(intent).await
}
