// src/main.rs
use anyhow::Context;
use catalog_query::engine::normalize;
use catalog_query::{output, CatalogQueryEngine, CommandLineInput, EngineConfig};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;

/// Sets up logging configuration.
///
/// Console logs go to stderr so stdout carries only the rendered page.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("catalog_query.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Loads reference data, serves one query and prints the page.
async fn execute_query(cli: &CommandLineInput, config: &EngineConfig) -> anyhow::Result<()> {
    let criteria = normalize(&cli.raw_criteria()).context("invalid filter parameters")?;
    log::info!(
        "Querying {} (sort {}, page {}, limit {})",
        config.base_url,
        criteria.sort_key,
        criteria.page,
        criteria.limit
    );

    let engine = CatalogQueryEngine::from_config(config)?;
    let outcome = engine
        .refresh_and_query(&criteria)
        .await
        .context("catalog query failed")?;

    if let Some(cause) = &outcome.degradation {
        log::warn!(
            "{} was unavailable ({}); results come from the recent-products listing",
            outcome.plan,
            cause
        );
    }

    let rendered = output::render(cli.format, &outcome, &engine.snapshot())?;
    println!("{}", rendered);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).context("failed to initialize logging")?;

    let config = EngineConfig::resolve(&cli).context("invalid configuration")?;

    execute_query(&cli, &config).await
}
