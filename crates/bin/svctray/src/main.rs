//! # svctray — service tray helper core
//!
//! Composition root that wires the translation tables and the simulated
//! service together behind a command-line front end.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialize tracing
//! - Load the `.ts` translation tables through the directory adapter
//! - Construct application services, injecting adapters via port traits
//! - Run the requested command and print its report as text or JSON
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod commands;
mod config;

use std::fmt::Display;

use anyhow::{Context as _, bail};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use svctray_adapter_ts::DirectoryTranslationSource;
use svctray_app::services::translator::Translator;

use cli::{Cli, Command};
use commands::Scenario;
use config::{CliOverrides, Config};

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emit<T: Serialize + Display>(json: bool, report: &T) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        translations: cli.translations,
        locale: cli.locale,
    };
    let config = Config::load(cli.config.as_deref(), overrides).context("loading configuration")?;
    init_tracing(&config.logging.filter);

    let source = DirectoryTranslationSource::new(&config.translations.dir);
    let preferred = config.preferred_locales();
    tracing::debug!(dir = %source.dir().display(), ?preferred, "configuration loaded");

    if let Command::Normalize { check } = cli.command {
        let report = commands::normalize(&source, check).await?;
        emit(cli.json, &report)?;
        if report.lossy() > 0 {
            bail!(
                "{} translation file(s) hold content that normalizing would drop",
                report.lossy()
            );
        }
        if check && report.changed() > 0 {
            bail!("{} translation file(s) are not normalized", report.changed());
        }
        return Ok(());
    }

    let mut translator = Translator::load(&source)
        .await
        .with_context(|| format!("loading translations from {}", source.dir().display()))?;

    match cli.command {
        Command::Labels { all } => {
            emit(cli.json, &commands::labels(&mut translator, &preferred, all))?;
        }
        Command::Render { state } => {
            emit(cli.json, &commands::render(&mut translator, &preferred, state.into()))?;
        }
        Command::Audit => {
            let report = commands::AuditOutput(translator.audit());
            emit(cli.json, &report)?;
            if !report.0.is_clean() {
                bail!("translation tables are incomplete");
            }
        }
        Command::Simulate {
            quick_config,
            fail,
            needs_upgrade,
        } => {
            let scenario = Scenario {
                config: quick_config.into(),
                fail: fail.map(Into::into),
                needs_upgrade,
            };
            let report = commands::simulate(&mut translator, &preferred, &scenario).await;
            emit(cli.json, &report)?;
        }
        // Handled before the tables are loaded.
        Command::Normalize { .. } => {}
    }

    Ok(())
}
